use std::env;
use std::fmt;
use std::path::Path;

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_MCP_SERVER_IMAGE: &str = "ghcr.io/github/github-mcp-server";
const DEFAULT_MAX_AGENT_STEPS: usize = 20;

/// Credentials and tunables read from the environment.
#[derive(Clone)]
pub struct Config {
    /// Token handed to the GitHub MCP server
    pub github_token: String,
    /// Bearer key for the chat completions API
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    /// Container image of the GitHub MCP server
    pub mcp_server_image: String,
    /// Upper bound on LLM round trips per agent run
    pub max_agent_steps: usize,
}

impl Config {
    /// Load `env_file` into the process environment (if it exists) and read
    /// the configuration. Variables already set take precedence over the file.
    pub fn load(env_file: &Path) -> Result<Self, ConfigError> {
        match dotenvy::from_path(env_file) {
            Ok(()) => tracing::debug!(path = %env_file.display(), "Loaded env file"),
            Err(e) if e.not_found() => {
                tracing::debug!(path = %env_file.display(), "No env file, using process environment")
            }
            Err(e) => {
                return Err(ConfigError::EnvFile {
                    path: env_file.display().to_string(),
                    reason: e.to_string(),
                })
            }
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar(name))
        };

        let github_token = required(GITHUB_TOKEN_VAR)?;
        let openai_api_key = required(OPENAI_KEY_VAR)?;

        let openai_base_url = lookup("OPENAI_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = lookup("OPENAI_MODEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mcp_server_image = lookup("GITHUB_MCP_SERVER_IMAGE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MCP_SERVER_IMAGE.to_string());

        let max_agent_steps = match lookup("AGENT_MAX_STEPS") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue("AGENT_MAX_STEPS"))?,
            None => DEFAULT_MAX_AGENT_STEPS,
        };

        Ok(Self {
            github_token,
            openai_api_key,
            openai_base_url,
            model,
            mcp_server_image,
            max_agent_steps,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("mcp_server_image", &self.mcp_server_image)
            .field("max_agent_steps", &self.max_agent_steps)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
    #[error("Failed to read env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = Config::from_vars(vars(&[
            (GITHUB_TOKEN_VAR, "ghp_test"),
            (OPENAI_KEY_VAR, "sk-test"),
        ]))
        .unwrap();
        assert_eq!(config.github_token, "ghp_test");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.mcp_server_image, "ghcr.io/github/github-mcp-server");
        assert_eq!(config.max_agent_steps, 20);
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = Config::from_vars(vars(&[
            (GITHUB_TOKEN_VAR, "ghp_test"),
            (OPENAI_KEY_VAR, "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8000/v1/"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("GITHUB_MCP_SERVER_IMAGE", "example/mcp:1"),
            ("AGENT_MAX_STEPS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.openai_base_url, "http://localhost:8000/v1");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.mcp_server_image, "example/mcp:1");
        assert_eq!(config.max_agent_steps, 5);
    }

    #[test]
    fn test_missing_github_token() {
        let err = Config::from_vars(vars(&[(OPENAI_KEY_VAR, "sk-test")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(GITHUB_TOKEN_VAR)));
    }

    #[test]
    fn test_missing_openai_key() {
        let err = Config::from_vars(vars(&[(GITHUB_TOKEN_VAR, "ghp_test")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(OPENAI_KEY_VAR)));
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let err = Config::from_vars(vars(&[
            (GITHUB_TOKEN_VAR, "  "),
            (OPENAI_KEY_VAR, "sk-test"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(GITHUB_TOKEN_VAR)));
    }

    #[test]
    fn test_invalid_max_steps() {
        for bad in ["0", "-1", "many"] {
            let err = Config::from_vars(vars(&[
                (GITHUB_TOKEN_VAR, "ghp_test"),
                (OPENAI_KEY_VAR, "sk-test"),
                ("AGENT_MAX_STEPS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue("AGENT_MAX_STEPS")));
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_vars(vars(&[
            (GITHUB_TOKEN_VAR, "ghp_supersecret"),
            (OPENAI_KEY_VAR, "sk-supersecret"),
        ]))
        .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("ghp_supersecret"));
        assert!(!debug.contains("sk-supersecret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_rejects_malformed_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "NOT A VALID LINE\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    #[test]
    fn test_load_process_env_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "GITHUB_PERSONAL_ACCESS_TOKEN=ghp_from_file\nOPENAI_API_KEY=sk-from-file\n",
        )
        .unwrap();
        // Only test in this binary that loads a valid env file into the process.
        env::set_var(GITHUB_TOKEN_VAR, "ghp_from_process");
        env::remove_var(OPENAI_KEY_VAR);

        let config = Config::load(&path);
        env::remove_var(GITHUB_TOKEN_VAR);
        env::remove_var(OPENAI_KEY_VAR);

        let config = config.unwrap();
        assert_eq!(config.github_token, "ghp_from_process");
        assert_eq!(config.openai_api_key, "sk-from-file");
    }
}
