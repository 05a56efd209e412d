use crate::config::Config;
use crate::error::ConfigError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

pub fn get_api_headers(config: &Config) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = &config.api_key {
        let value = HeaderValue::from_str(key).map_err(|_| ConfigError::InvalidHeader {
            name: "BINDER_API_KEY",
        })?;
        headers.insert("X-Api-Key", value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> Config {
        let key = key.map(str::to_string);
        Config::from_lookup(move |name| match name {
            "BINDER_API_KEY" => key.clone(),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn api_key_header_is_only_sent_when_configured() {
        let headers = get_api_headers(&config_with_key(None)).unwrap();
        assert!(headers.get("X-Api-Key").is_none());

        let headers = get_api_headers(&config_with_key(Some("secret-key"))).unwrap();
        assert_eq!(headers.get("X-Api-Key").unwrap(), "secret-key");
    }

    #[test]
    fn non_ascii_key_is_a_config_error() {
        let err = get_api_headers(&config_with_key(Some("bad\nkey"))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeader { .. }));
    }
}
