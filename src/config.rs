use crate::error::ConfigError;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.pokemontcg.io/v2";
pub const DEFAULT_DATA_DIR: &str = ".pokebinder";
pub const DEFAULT_EXPORT_PATH: &str = "data.json";
/// Confirmation word for the ownership gate. Not a credential.
pub const DEFAULT_ACCESS_CODE: &str = "binder";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub api_key: Option<String>,
    pub data_dir: PathBuf,
    pub access_code: String,
    pub export_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let raw_url = non_empty("BINDER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        // Url::join drops the last segment unless the base ends with a slash.
        let api_base_url = Url::parse(&format!("{}/", raw_url.trim_end_matches('/')))?;

        Ok(Config {
            api_base_url,
            api_key: non_empty("BINDER_API_KEY"),
            data_dir: non_empty("BINDER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            access_code: lookup("BINDER_ACCESS_CODE")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_ACCESS_CODE.to_string()),
            export_path: non_empty("BINDER_EXPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://api.pokemontcg.io/v2/");
        assert_eq!(config.api_key, None);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.access_code, DEFAULT_ACCESS_CODE);
        assert_eq!(config.export_path, PathBuf::from("data.json"));
    }

    #[test]
    fn overrides_are_read_and_trailing_slash_is_normalized() {
        let config = config_from(&[
            ("BINDER_API_URL", "http://localhost:9000/v2/"),
            ("BINDER_API_KEY", "abc"),
            ("BINDER_DATA_DIR", "/tmp/binder"),
            ("BINDER_ACCESS_CODE", "Open Sesame"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:9000/v2/");
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/binder"));
        assert_eq!(config.access_code, "Open Sesame");
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = config_from(&[("BINDER_API_KEY", "   ")]).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = config_from(&[("BINDER_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }
}
