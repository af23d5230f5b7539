//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Select};

use impact_core::Theme;
use impact_core::config::{DEFAULT_BACKEND_URL, DEFAULT_PER_PAGE, MAX_PER_PAGE};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Render config as TOML-ish text with profiles in name order.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "per_page = {}", cfg.defaults.per_page);
    let _ = writeln!(out, "theme = \"{}\"", cfg.defaults.theme);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "backend = \"{}\"", p.backend);
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(per_page) = p.per_page {
            let _ = writeln!(out, "per_page = {per_page}");
        }
        if let Some(ms) = p.search_debounce_ms {
            let _ = writeln!(out, "search_debounce_ms = {ms}");
        }
        if let Some(ms) = p.preview_delay_ms {
            let _ = writeln!(out, "preview_delay_ms = {ms}");
        }
        if let Some(secs) = p.refresh_interval_secs {
            let _ = writeln!(out, "refresh_interval_secs = {secs}");
        }
        if let Some(theme) = p.theme {
            let _ = writeln!(out, "theme = \"{theme}\"");
        }
    }

    out.trim().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("Impact Index CLI configuration");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = impact_config::load_config()?;

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    if cfg.profiles.contains_key(&profile_name)
        && !Confirm::new()
            .with_prompt(format!("Profile '{profile_name}' exists. Overwrite it?"))
            .default(false)
            .interact()
            .map_err(prompt_err)?
    {
        return Ok(());
    }

    let backend: String = Input::new()
        .with_prompt("Backend URL")
        .default(
            global
                .backend
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.into()),
        )
        .validate_with(|input: &String| {
            impact_config::parse_backend_url(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let per_page: u32 = Input::new()
        .with_prompt(format!("Rows per page (1-{MAX_PER_PAGE})"))
        .default(DEFAULT_PER_PAGE)
        .validate_with(|n: &u32| {
            if (1..=MAX_PER_PAGE).contains(n) {
                Ok(())
            } else {
                Err(format!("must be between 1 and {MAX_PER_PAGE}"))
            }
        })
        .interact_text()
        .map_err(prompt_err)?;

    let themes = [Theme::Dark, Theme::Light];
    let theme_idx = Select::new()
        .with_prompt("Preview theme")
        .items(&["dark", "light"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let profile = Profile {
        backend: backend.trim().to_owned(),
        insecure: global.insecure.then_some(true),
        per_page: (per_page != DEFAULT_PER_PAGE).then_some(per_page),
        theme: themes.get(theme_idx).copied(),
        ..Profile::default()
    };

    if cfg.profiles.is_empty() {
        cfg.default_profile = Some(profile_name.clone());
    }
    cfg.profiles.insert(profile_name.clone(), profile);
    config::save_config(&cfg)?;

    eprintln!("\nConfiguration written to {}", config_path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Test it: impact sites list");
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = impact_config::load_config()?;
            let out =
                output::render_single(&global.output, &cfg, format_config, |_| "config".into());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: impact config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}
