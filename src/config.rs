//! Engine configuration (netprompt.toml)
//!
//! ```toml
//! prompt = "{host}({set})# "
//! history_file = "/home/me/.netprompt_history"
//! history_size = 500
//! max_suggestions = 20
//! startup = ["enter lab"]
//! ```

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "NETPROMPT_CONFIG";
/// Environment variable overriding the prompt template
pub const PROMPT_ENV: &str = "NETPROMPT_PROMPT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt template; `{set}` is the active command set, `{host}` the host name
    pub prompt: String,

    /// Where line history is kept between sessions
    pub history_file: Option<PathBuf>,

    pub history_size: usize,

    /// Cap on suggestions per completion request, 0 for no cap
    pub max_suggestions: usize,

    /// Lines evaluated before the first prompt
    pub startup: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: "{set}> ".to_string(),
            history_file: None,
            history_size: 1000,
            max_suggestions: 0,
            startup: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Find and load the config: `explicit`, then `$NETPROMPT_CONFIG`, then
    /// `~/.netprompt.toml`. A missing file gives the defaults; an unreadable
    /// one is reported on stderr and also gives the defaults.
    pub fn discover(explicit: Option<&Path>) -> Self {
        let mut config = match Self::locate(explicit) {
            Some(path) if path.exists() || explicit.is_some() => match Self::load(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    config
                }
                Err(e) => {
                    eprintln!("Warning: {}: {}", path.display(), e);
                    Config::default()
                }
            },
            _ => Config::default(),
        };
        config.apply_env();
        config
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        home_dir().map(|home| home.join(".netprompt.toml"))
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(prompt) = env::var(PROMPT_ENV) {
            self.prompt = prompt;
        }
    }

    /// Fill in the prompt template
    pub fn render_prompt(&self, set: &str) -> String {
        let mut rendered = self.prompt.replace("{set}", set);
        if rendered.contains("{host}") {
            let host = hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "localhost".to_string());
            rendered = rendered.replace("{host}", &host);
        }
        rendered
    }
}

pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.prompt, "{set}> ");
        assert_eq!(config.history_size, 1000);
        assert_eq!(config.max_suggestions, 0);
        assert!(config.history_file.is_none());
        assert!(config.startup.is_empty());
    }

    #[test]
    fn parse_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
max_suggestions = 5
startup = ["enter lab", "show version"]
"#,
        )
        .unwrap();
        assert_eq!(config.max_suggestions, 5);
        assert_eq!(config.startup, vec!["enter lab", "show version"]);
        assert_eq!(config.prompt, "{set}> ");
        assert_eq!(config.history_size, 1000);
    }

    #[test]
    fn parse_rejects_wrong_types() {
        assert!(matches!(
            Config::parse("history_size = \"lots\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netprompt.toml");
        std::fs::write(&path, "prompt = \"[{set}] \"\nhistory_size = 10\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.prompt, "[{set}] ");
        assert_eq!(config.history_size, 10);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn render_prompt_substitutes_set() {
        let config = Config {
            prompt: "router({set})# ".to_string(),
            ..Config::default()
        };
        assert_eq!(config.render_prompt("interface"), "router(interface)# ");
    }

    #[test]
    fn render_prompt_substitutes_host() {
        let config = Config {
            prompt: "{host}> ".to_string(),
            ..Config::default()
        };
        let rendered = config.render_prompt("main");
        assert!(!rendered.contains("{host}"));
        assert!(rendered.ends_with("> "));
    }
}
