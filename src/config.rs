use std::{
    env,
    net::SocketAddr,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    http_bind: SocketAddr,
    vectorizer_path: PathBuf,
    model_path: PathBuf,
    body_limit_bytes: NonZeroUsize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// Reads the service settings from the environment, falling back to defaults for unset
    /// variables.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_bind = parse_socket_addr("REVIEW_TOPICS_HTTP_BIND", "0.0.0.0:5000")?;
        let vectorizer_path = parse_path("REVIEW_TOPICS_VECTORIZER_PATH", "vectorizer.json")?;
        let model_path = parse_path("REVIEW_TOPICS_MODEL_PATH", "lda_model.json")?;
        let body_limit_bytes = parse_non_zero_usize("REVIEW_TOPICS_BODY_LIMIT_BYTES", 65_536)?;

        Ok(Self {
            http_bind,
            vectorizer_path,
            model_path,
            body_limit_bytes,
        })
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn vectorizer_path(&self) -> &Path {
        &self.vectorizer_path
    }

    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    #[must_use]
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_bytes.get()
    }
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());

    raw.parse().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_path(name: &'static str, default: &str) -> Result<PathBuf, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    if raw.trim().is_empty() {
        return Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("path must not be empty"),
        });
    }
    Ok(PathBuf::from(raw))
}

fn parse_non_zero_usize(name: &'static str, default: usize) -> Result<NonZeroUsize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let parsed = raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    NonZeroUsize::new(parsed).ok_or_else(|| ConfigError::Invalid {
        name,
        source: anyhow::anyhow!("must be greater than zero"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 4] = [
        "REVIEW_TOPICS_HTTP_BIND",
        "REVIEW_TOPICS_VECTORIZER_PATH",
        "REVIEW_TOPICS_MODEL_PATH",
        "REVIEW_TOPICS_BODY_LIMIT_BYTES",
    ];

    #[test]
    fn defaults_apply_when_unset() {
        temp_env::with_vars_unset(VARS, || {
            let config = Config::from_env().expect("config should load");

            assert_eq!(
                config.http_bind(),
                "0.0.0.0:5000".parse::<SocketAddr>().expect("addr")
            );
            assert_eq!(config.vectorizer_path(), Path::new("vectorizer.json"));
            assert_eq!(config.model_path(), Path::new("lda_model.json"));
            assert_eq!(config.body_limit_bytes(), 65_536);
        });
    }

    #[test]
    fn overrides_are_respected() {
        temp_env::with_vars(
            [
                ("REVIEW_TOPICS_HTTP_BIND", Some("127.0.0.1:8088")),
                ("REVIEW_TOPICS_VECTORIZER_PATH", Some("/models/vec.json")),
                ("REVIEW_TOPICS_MODEL_PATH", Some("/models/lda.json")),
                ("REVIEW_TOPICS_BODY_LIMIT_BYTES", Some("1024")),
            ],
            || {
                let config = Config::from_env().expect("config should load");

                assert_eq!(config.http_bind().port(), 8088);
                assert_eq!(config.vectorizer_path(), Path::new("/models/vec.json"));
                assert_eq!(config.model_path(), Path::new("/models/lda.json"));
                assert_eq!(config.body_limit_bytes(), 1024);
            },
        );
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        temp_env::with_var("REVIEW_TOPICS_HTTP_BIND", Some("not-an-address"), || {
            let error = Config::from_env().expect_err("invalid bind should fail");
            assert!(matches!(
                error,
                ConfigError::Invalid {
                    name: "REVIEW_TOPICS_HTTP_BIND",
                    ..
                }
            ));
        });
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        temp_env::with_var("REVIEW_TOPICS_BODY_LIMIT_BYTES", Some("0"), || {
            let error = Config::from_env().expect_err("zero limit should fail");
            assert!(error.to_string().contains("must be greater than zero"));
        });
    }

    #[test]
    fn empty_model_path_is_rejected() {
        temp_env::with_var("REVIEW_TOPICS_MODEL_PATH", Some("  "), || {
            let error = Config::from_env().expect_err("empty path should fail");
            assert!(matches!(
                error,
                ConfigError::Invalid {
                    name: "REVIEW_TOPICS_MODEL_PATH",
                    ..
                }
            ));
        });
    }
}
