//! CLI configuration -- thin wrapper around `impact_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--backend, --insecure, --timeout).

use std::time::Duration;

use tracing::debug;

use impact_core::config::DEFAULT_BACKEND_URL;
use impact_core::{BackendConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use impact_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Build a `BackendConfig` from the config file, active profile, and flags.
///
/// Precedence: flag (or its `IMPACT_*` env var) > profile > `[defaults]`.
/// An explicitly requested profile must exist; without one, a missing
/// default profile falls back to `--backend` or the local default URL.
pub fn resolve_backend_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<BackendConfig, CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(config),
            });
        }
        None => {
            debug!(profile = %name, "no such profile, using flags and defaults only");
            Profile {
                backend: DEFAULT_BACKEND_URL.into(),
                ..Profile::default()
            }
        }
    };

    if let Some(ref backend) = global.backend {
        profile.backend.clone_from(backend);
    }

    let mut resolved = impact_config::profile_to_backend_config(&profile, &config.defaults)?;

    if global.insecure {
        resolved.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        resolved.timeout = Duration::from_secs(secs);
    }

    Ok(resolved)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["impact"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["sites", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config() -> Config {
        let mut cfg = Config {
            default_profile: Some("prod".into()),
            ..Config::default()
        };
        cfg.defaults.timeout = 12;
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                backend: "https://api.impact.example".into(),
                timeout: Some(20),
                ..Profile::default()
            },
        );
        cfg.profiles.insert(
            "local".into(),
            Profile {
                backend: "http://localhost:9000".into(),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let resolved = resolve_backend_config(&global(&[]), &config()).unwrap();
        assert_eq!(resolved.url.as_str(), "https://api.impact.example/");
        assert_eq!(resolved.timeout, Duration::from_secs(20));
        assert_eq!(resolved.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn flags_override_profile() {
        let g = global(&[
            "--backend",
            "http://127.0.0.1:1234",
            "--timeout",
            "3",
            "--insecure",
        ]);
        let resolved = resolve_backend_config(&g, &config()).unwrap();
        assert_eq!(resolved.url.as_str(), "http://127.0.0.1:1234/");
        assert_eq!(resolved.timeout, Duration::from_secs(3));
        assert_eq!(resolved.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn explicit_profile_selects_and_falls_back_to_defaults() {
        let resolved = resolve_backend_config(&global(&["-p", "local"]), &config()).unwrap();
        assert_eq!(resolved.url.as_str(), "http://localhost:9000/");
        assert_eq!(resolved.timeout, Duration::from_secs(12));
    }

    #[test]
    fn unknown_explicit_profile_is_an_error() {
        let err = resolve_backend_config(&global(&["-p", "staging"]), &config()).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "staging");
                assert_eq!(available, "local, prod");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_local_default() {
        let resolved = resolve_backend_config(&global(&[]), &Config::default()).unwrap();
        assert_eq!(resolved.url.as_str(), "http://localhost:8000/");
    }
}
