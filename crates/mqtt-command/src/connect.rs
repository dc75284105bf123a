//! Disambiguates `:connect`'s 0-3 positional arguments against a settings
//! snapshot (spec §4.3).

use mqtt_inspect_types::Settings;

use crate::endpoint::parse_host_port;
use crate::outcome::ConnectRequest;

/// Resolve a `:connect` argument list into a concrete endpoint + credential
/// pair, or a human-readable failure reason.
pub(crate) fn resolve_connect(args: &[String], settings: &Settings) -> Result<ConnectRequest, String> {
    match args {
        [] => {
            let host = settings
                .hostname
                .clone()
                .ok_or_else(|| "Invalid arguments for :connect — no settings host configured".to_string())?;
            Ok(ConnectRequest {
                host,
                port: settings.port,
                username: settings.username.clone(),
                password: settings.password.clone(),
            })
        }
        [only] => {
            if let Some((host, port)) = parse_host_port(only) {
                Ok(ConnectRequest {
                    host,
                    port,
                    username: settings.username.clone(),
                    password: settings.password.clone(),
                })
            } else {
                let host = settings
                    .hostname
                    .clone()
                    .ok_or_else(|| "Invalid arguments for :connect — no settings host configured".to_string())?;
                Ok(ConnectRequest {
                    host,
                    port: settings.port,
                    username: Some(only.clone()),
                    password: settings.password.clone(),
                })
            }
        }
        [first, second] => {
            if let Some((host, port)) = parse_host_port(first) {
                Ok(ConnectRequest {
                    host,
                    port,
                    username: Some(second.clone()),
                    password: settings.password.clone(),
                })
            } else {
                let host = settings
                    .hostname
                    .clone()
                    .ok_or_else(|| "Invalid arguments for :connect — no settings host configured".to_string())?;
                Ok(ConnectRequest {
                    host,
                    port: settings.port,
                    username: Some(first.clone()),
                    password: Some(second.clone()),
                })
            }
        }
        [first, second, third] => {
            let (host, port) = parse_host_port(first)
                .ok_or_else(|| "Invalid arguments for :connect — expected host:port as the first of three arguments".to_string())?;
            Ok(ConnectRequest {
                host,
                port,
                username: Some(second.clone()),
                password: Some(third.clone()),
            })
        }
        _ => Err("Invalid arguments for :connect — too many arguments".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_host() -> Settings {
        Settings {
            hostname: Some("broker.local".to_string()),
            username: Some("carol".to_string()),
            password: Some("secret".to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn zero_args_uses_settings_endpoint_and_credentials() {
        let settings = settings_with_host();
        let resolved = resolve_connect(&[], &settings).unwrap();
        assert_eq!(resolved.host, "broker.local");
        assert_eq!(resolved.port, 1883);
        assert_eq!(resolved.username, Some("carol".to_string()));
    }

    #[test]
    fn zero_args_with_no_settings_host_fails() {
        let settings = Settings::default();
        assert!(resolve_connect(&[], &settings).is_err());
    }

    #[test]
    fn one_arg_host_port_keeps_settings_credentials() {
        let settings = settings_with_host();
        let args = vec!["other.broker:8883".to_string()];
        let resolved = resolve_connect(&args, &settings).unwrap();
        assert_eq!(resolved.host, "other.broker");
        assert_eq!(resolved.port, 8883);
        assert_eq!(resolved.username, Some("carol".to_string()));
    }

    #[test]
    fn one_arg_non_endpoint_is_treated_as_username() {
        let settings = settings_with_host();
        let args = vec!["dave".to_string()];
        let resolved = resolve_connect(&args, &settings).unwrap();
        assert_eq!(resolved.host, "broker.local");
        assert_eq!(resolved.username, Some("dave".to_string()));
        assert_eq!(resolved.password, Some("secret".to_string()));
    }

    #[test]
    fn two_args_host_port_and_username() {
        let settings = settings_with_host();
        let args = vec!["other.broker:8883".to_string(), "dave".to_string()];
        let resolved = resolve_connect(&args, &settings).unwrap();
        assert_eq!(resolved.host, "other.broker");
        assert_eq!(resolved.username, Some("dave".to_string()));
        assert_eq!(resolved.password, Some("secret".to_string()));
    }

    #[test]
    fn two_args_username_and_password() {
        let settings = settings_with_host();
        let args = vec!["dave".to_string(), "hunter2".to_string()];
        let resolved = resolve_connect(&args, &settings).unwrap();
        assert_eq!(resolved.host, "broker.local");
        assert_eq!(resolved.username, Some("dave".to_string()));
        assert_eq!(resolved.password, Some("hunter2".to_string()));
    }

    #[test]
    fn three_args_fully_explicit() {
        let settings = Settings::default();
        let args = vec!["other.broker:8883".to_string(), "dave".to_string(), "hunter2".to_string()];
        let resolved = resolve_connect(&args, &settings).unwrap();
        assert_eq!(resolved.host, "other.broker");
        assert_eq!(resolved.port, 8883);
        assert_eq!(resolved.username, Some("dave".to_string()));
        assert_eq!(resolved.password, Some("hunter2".to_string()));
    }

    #[test]
    fn three_args_without_host_port_first_fails() {
        let settings = Settings::default();
        let args = vec!["dave".to_string(), "x".to_string(), "hunter2".to_string()];
        assert!(resolve_connect(&args, &settings).is_err());
    }

    #[test]
    fn four_args_fails() {
        let settings = settings_with_host();
        let args = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        assert!(resolve_connect(&args, &settings).is_err());
    }
}
