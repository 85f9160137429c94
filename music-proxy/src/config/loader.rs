//! Configuration file loading

use super::schema::Config;
use super::validator::ConfigValidator;
use crate::error::{ProxyError, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        // Priority order:
        // 1. $MUSIC_PROXY_CONFIG
        // 2. $XDG_CONFIG_HOME/music-proxy/config.toml
        // 3. ~/.config/music-proxy/config.toml

        if let Ok(path) = env::var("MUSIC_PROXY_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("music-proxy/config.toml");
        }

        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(home).join(".config/music-proxy/config.toml");
        }

        PathBuf::from("config.toml")
    }

    /// Load config from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ProxyError::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::load_from_str(&contents)
    }

    /// Parse and validate config from TOML text
    pub fn load_from_str(contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load config from the default location, falling back to built-in defaults
    pub fn load() -> Result<Config> {
        let path = Self::default_config_path();

        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Load config from optional path or default
    /// Priority: Explicit path > default location > built-in defaults
    pub fn load_or_default(path: Option<PathBuf>) -> Result<Config> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Self::load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DEFAULT_DOMAINS;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.verbose);
        assert_eq!(config.server.listen, "127.0.0.1:3000");
        assert_eq!(config.server.route, "/api/music/proxy");
        assert_eq!(
            config.upstream.user_agent,
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
        );
        assert_eq!(config.upstream.referer, "http://www.kuwo.cn/");
        assert_eq!(config.response.cache_control, "public, max-age=3600");
        assert_eq!(config.response.default_content_type, "audio/mpeg");
        assert_eq!(config.allowlist.domains.len(), DEFAULT_DOMAINS.len());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
verbose = true

[server]
listen = "0.0.0.0:8080"

[upstream]
referer = "https://y.qq.com/"

[allowlist]
domains = ["y.qq.com", "music.163.com"]
"#;

        let config = ConfigLoader::load_from_str(toml_str).unwrap();
        assert!(config.verbose);
        assert_eq!(config.server.listen, "0.0.0.0:8080");
        assert_eq!(config.server.route, "/api/music/proxy");
        assert_eq!(config.upstream.referer, "https://y.qq.com/");
        assert_eq!(config.upstream.max_redirects, 10);
        assert_eq!(config.allowlist.domains, vec!["y.qq.com", "music.163.com"]);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ConfigLoader::load_from_str("").unwrap();
        assert_eq!(config.allowlist.domains.len(), DEFAULT_DOMAINS.len());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nroute = \"/proxy\"").unwrap();

        let config = ConfigLoader::load_or_default(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.route, "/proxy");
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::load_from_file("/nonexistent/music-proxy.toml");
        assert!(matches!(result, Err(ProxyError::ConfigLoad { .. })));
    }

    #[test]
    fn test_invalid_toml() {
        let result = ConfigLoader::load_from_str("[server\nlisten = ");
        assert!(matches!(result, Err(ProxyError::ConfigParse(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ConfigLoader::load_from_str("[allowlist]\ndomains = [\"*.qq.com\"]");
        assert!(matches!(result, Err(ProxyError::Validation(_))));
    }
}
