use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::annotation::SchemaMode;
use crate::config::schema::*;
use crate::error::ConfigError;

/// Outcome of looking up one variable.
pub enum Lookup {
    Present(String),
    NotPresent,
    NotUnicode,
}

fn env_lookup(name: &str) -> Lookup {
    match std::env::var(name) {
        Ok(value) => Lookup::Present(value),
        Err(std::env::VarError::NotPresent) => Lookup::NotPresent,
        Err(std::env::VarError::NotUnicode(_)) => Lookup::NotUnicode,
    }
}

/// Builds the configuration from the process environment.
pub fn load_config(overrides: ConfigOverrides) -> Result<Config, ConfigError> {
    load_config_from_lookup(env_lookup, overrides)
}

/// Builds the configuration from an arbitrary variable source.
///
/// Fails with [`ConfigError::MissingCredential`] when the API key is absent
/// or blank; nothing else is required.
pub fn load_config_from_lookup<F>(
    lookup: F,
    overrides: ConfigOverrides,
) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Lookup,
{
    let optional = |name: &str| -> Result<Option<String>, ConfigError> {
        match lookup(name) {
            Lookup::Present(value) if !value.trim().is_empty() => {
                Ok(Some(value.trim().to_string()))
            }
            Lookup::Present(_) | Lookup::NotPresent => Ok(None),
            Lookup::NotUnicode => Err(ConfigError::NotUnicode {
                name: name.to_string(),
            }),
        }
    };

    let api_key = optional(ENV_API_KEY)?
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingCredential {
            name: ENV_API_KEY.to_string(),
        })?;

    let model = optional(ENV_MODEL)?.unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let base_url = optional(ENV_BASE_URL)?.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let max_tokens = match optional(ENV_MAX_TOKENS)? {
        Some(raw) => parse_number::<u32>(ENV_MAX_TOKENS, &raw)?,
        None => DEFAULT_MAX_TOKENS,
    };
    if max_tokens == 0 {
        return Err(ConfigError::InvalidValue {
            name: ENV_MAX_TOKENS.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let request_delay = match overrides.request_delay {
        Some(delay) => delay,
        None => match optional(ENV_REQUEST_DELAY_MS)? {
            Some(raw) => Duration::from_millis(parse_number::<u64>(ENV_REQUEST_DELAY_MS, &raw)?),
            None => DEFAULT_REQUEST_DELAY,
        },
    };

    let schema_mode = if overrides.strict_schema {
        SchemaMode::Strict
    } else {
        SchemaMode::Lenient
    };

    Ok(Config {
        api_key,
        model,
        base_url,
        max_tokens,
        request_delay,
        root: overrides.root.unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT)),
        schema_mode,
    })
}

fn parse_number<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        reason: format!("'{}': {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Lookup {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| match vars.get(name) {
            Some(value) => Lookup::Present(value.clone()),
            None => Lookup::NotPresent,
        }
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = load_config_from_lookup(
            lookup_from(&[(ENV_API_KEY, "sk-test")]),
            ConfigOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.api_key.expose_secret(), "sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.request_delay, Duration::from_secs(1));
        assert_eq!(config.root, PathBuf::from("img"));
        assert_eq!(config.schema_mode, SchemaMode::Lenient);
    }

    #[test]
    fn test_missing_api_key() {
        let result = load_config_from_lookup(lookup_from(&[]), ConfigOverrides::default());
        match result {
            Err(ConfigError::MissingCredential { name }) => assert_eq!(name, ENV_API_KEY),
            other => panic!("Expected MissingCredential, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let result = load_config_from_lookup(
            lookup_from(&[(ENV_API_KEY, "   ")]),
            ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(ConfigError::MissingCredential { .. })));
    }

    #[test]
    fn test_api_key_not_unicode() {
        let result = load_config_from_lookup(
            |name: &str| {
                if name == ENV_API_KEY {
                    Lookup::NotUnicode
                } else {
                    Lookup::NotPresent
                }
            },
            ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(ConfigError::NotUnicode { .. })));
    }

    #[test]
    fn test_model_and_delay_from_environment() {
        let config = load_config_from_lookup(
            lookup_from(&[
                (ENV_API_KEY, "sk-test"),
                (ENV_MODEL, "claude-sonnet-4-5"),
                (ENV_BASE_URL, "http://localhost:8080"),
                (ENV_MAX_TOKENS, "2048"),
                (ENV_REQUEST_DELAY_MS, "250"),
            ]),
            ConfigOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.model, "claude-sonnet-4-5");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.request_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_overrides_win() {
        let config = load_config_from_lookup(
            lookup_from(&[(ENV_API_KEY, "sk-test"), (ENV_REQUEST_DELAY_MS, "250")]),
            ConfigOverrides {
                root: Some(PathBuf::from("/photos")),
                request_delay: Some(Duration::ZERO),
                strict_schema: true,
            },
        )
        .unwrap();

        assert_eq!(config.root, PathBuf::from("/photos"));
        assert_eq!(config.request_delay, Duration::ZERO);
        assert_eq!(config.schema_mode, SchemaMode::Strict);
    }

    #[test]
    fn test_invalid_number() {
        let result = load_config_from_lookup(
            lookup_from(&[(ENV_API_KEY, "sk-test"), (ENV_REQUEST_DELAY_MS, "soon")]),
            ConfigOverrides::default(),
        );
        match result {
            Err(ConfigError::InvalidValue { name, .. }) => assert_eq!(name, ENV_REQUEST_DELAY_MS),
            other => panic!("Expected InvalidValue, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let result = load_config_from_lookup(
            lookup_from(&[(ENV_API_KEY, "sk-test"), (ENV_MAX_TOKENS, "0")]),
            ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    #[serial]
    fn test_load_config_reads_process_environment() {
        std::env::set_var(ENV_API_KEY, "sk-from-env");
        std::env::set_var(ENV_MODEL, "claude-env-model");

        let config = load_config(ConfigOverrides::default()).unwrap();
        assert_eq!(config.api_key.expose_secret(), "sk-from-env");
        assert_eq!(config.model, "claude-env-model");

        std::env::remove_var(ENV_API_KEY);
        std::env::remove_var(ENV_MODEL);
    }

    #[test]
    #[serial]
    fn test_load_config_without_key_in_environment() {
        std::env::remove_var(ENV_API_KEY);

        assert!(matches!(
            load_config(ConfigOverrides::default()),
            Err(ConfigError::MissingCredential { .. })
        ));
    }
}
