use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

const CONFIG_FILE: &str = ".keep-contributions.toml";
const TOKEN_ENV_VAR: &str = "GH_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read token file: {0}")]
    TokenFile(std::io::Error),

    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(
        "no GitHub token found: pass --token, --token-file, set [github] token \
         in .keep-contributions.toml, or export GH_TOKEN (a classic PAT)"
    )]
    MissingToken,
}

/// Optional configuration loaded from .keep-contributions.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token; lower precedence than --token and --token-file.
    pub token: Option<String>,
}

impl Config {
    /// Load .keep-contributions.toml from the current directory, falling
    /// back to defaults when the file does not exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Resolve the API token. Precedence: explicit argument, then token file,
/// then the config file, then the GH_TOKEN environment variable.
pub fn resolve_token(
    explicit: Option<String>,
    token_file: Option<&Path>,
    config: &Config,
) -> Result<String, ConfigError> {
    if let Some(token) = explicit {
        return Ok(token);
    }
    if let Some(path) = token_file {
        let token = fs::read_to_string(path).map_err(ConfigError::TokenFile)?;
        return Ok(token.trim().to_string());
    }
    if let Some(token) = config.github.token.clone() {
        return Ok(token);
    }
    std::env::var(TOKEN_ENV_VAR).map_err(|_| ConfigError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "keep-contributions-{name}-{}",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_config_toml() {
        let config: Config = toml::from_str("[github]\ntoken = \"ghp_abc\"\n").unwrap();
        assert_eq!(config.github.token.as_deref(), Some("ghp_abc"));
    }

    #[test]
    fn test_default_config_has_no_token() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_explicit_token_wins() {
        let file = temp_file("tok-explicit", "file-token\n");
        let config = Config {
            github: GitHubConfig {
                token: Some("config-token".to_string()),
            },
        };
        let token =
            resolve_token(Some("arg-token".to_string()), Some(&file), &config).unwrap();
        assert_eq!(token, "arg-token");
        fs::remove_file(&file).ok();
    }

    #[test]
    fn test_token_file_beats_config_and_is_trimmed() {
        let file = temp_file("tok-file", "  file-token  \n");
        let config = Config {
            github: GitHubConfig {
                token: Some("config-token".to_string()),
            },
        };
        let token = resolve_token(None, Some(&file), &config).unwrap();
        assert_eq!(token, "file-token");
        fs::remove_file(&file).ok();
    }

    #[test]
    fn test_config_file_token_used_when_no_args() {
        let config = Config {
            github: GitHubConfig {
                token: Some("config-token".to_string()),
            },
        };
        let token = resolve_token(None, None, &config).unwrap();
        assert_eq!(token, "config-token");
    }

    #[test]
    fn test_unreadable_token_file_is_an_error() {
        let missing = std::env::temp_dir().join("keep-contributions-no-such-token-file");
        let result = resolve_token(None, Some(&missing), &Config::default());
        assert!(matches!(result, Err(ConfigError::TokenFile(_))));
    }
}
