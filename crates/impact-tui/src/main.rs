//! `impact-tui`: terminal browser for Impact Index leaderboards.
//!
//! Three screens, navigable with 1-3 or Tab: the supported-site list, one
//! site's paginated ranking with live search, and an entity profile.
//!
//! Logs go to a file (default `/tmp/impact-tui.log`) so they never corrupt
//! the terminal. A background data bridge loads the site directory and keeps
//! it revalidated while the app runs.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use impact_config::{Config, Profile};
use impact_core::config::DEFAULT_BACKEND_URL;
use impact_core::{Backend, BackendConfig, TlsVerification};

use crate::app::App;

/// Browse Impact Index leaderboards in the terminal.
#[derive(Parser, Debug)]
#[command(name = "impact-tui", version, about)]
struct Cli {
    /// Open this site's ranking on start
    site: Option<String>,

    /// Config profile to use
    #[arg(short, long, env = "IMPACT_PROFILE")]
    profile: Option<String>,

    /// Backend URL, overriding the profile
    #[arg(short, long, env = "IMPACT_BACKEND")]
    backend: Option<String>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long, env = "IMPACT_INSECURE")]
    insecure: bool,

    /// Site list refresh interval (e.g. "30s", "5m"; "0s" disables)
    #[arg(long, value_parser = humantime::parse_duration)]
    refresh: Option<Duration>,

    /// Log file path
    #[arg(long, default_value = "/tmp/impact-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing; stdout belongs to the terminal UI. Hold the guard
/// for the lifetime of the app so buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("impact_tui={level},impact_core={level}")));

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("impact-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Flags > profile > `[defaults]`. Without an explicit `--profile`, a
/// missing default profile falls back to the local backend.
fn backend_config(cli: &Cli, config: &Config) -> Result<BackendConfig> {
    let name = cli
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    let mut profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if cli.profile.is_some() => bail!(
            "profile '{name}' not found in {}",
            impact_config::config_path().display()
        ),
        None => {
            debug!(profile = %name, "no such profile, using flags and defaults only");
            Profile {
                backend: DEFAULT_BACKEND_URL.into(),
                ..Profile::default()
            }
        }
    };

    if let Some(ref backend) = cli.backend {
        profile.backend.clone_from(backend);
    }

    let mut resolved = impact_config::profile_to_backend_config(&profile, &config.defaults)?;
    if cli.insecure {
        resolved.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(refresh) = cli.refresh {
        resolved.site_refresh_interval = refresh;
    }
    Ok(resolved)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first so a panic while in raw mode still restores the terminal.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = backend_config(&cli, &impact_config::load_config_or_default())?;
    info!(
        backend = %config.url,
        site = cli.site.as_deref().unwrap_or("(none)"),
        "starting impact-tui"
    );

    let backend = Backend::new(config)?;
    let mut app = App::new(backend, cli.site);
    app.run().await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["impact-tui"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn refresh_and_backend_override_the_profile() {
        let args = cli(&["reddit", "--refresh", "5m", "-b", "http://127.0.0.1:9000", "-k"]);
        assert_eq!(args.site.as_deref(), Some("reddit"));

        let resolved = backend_config(&args, &Config::default()).unwrap();
        assert_eq!(resolved.url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(resolved.site_refresh_interval, Duration::from_secs(300));
        assert_eq!(resolved.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn unknown_explicit_profile_fails() {
        let err = backend_config(&cli(&["-p", "staging"]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn missing_default_profile_uses_local_backend() {
        let resolved = backend_config(&cli(&[]), &Config::default()).unwrap();
        assert_eq!(resolved.url.as_str(), "http://localhost:8000/");
    }
}
