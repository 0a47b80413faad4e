//! Environment-sourced configuration for tether.
//!
//! Reads Azure OpenAI credentials with precedence:
//! process environment > `.env` file in the working directory > empty.
//!
//! Absent values are not treated as errors here: an empty key or endpoint
//! surfaces later as a failed remote call.

use std::collections::HashMap;
use std::path::Path;

/// Maximum tokens requested for one completion.
pub const MAX_COMPLETION_TOKENS: u32 = 1000;

/// Sampling temperature sent with every completion.
pub const COMPLETION_TEMPERATURE: f32 = 0.0;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "AZURE_OPENAI_KEY";

/// Environment variable holding the resource endpoint URL.
pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";

/// Environment variable holding the model deployment name.
pub const ENV_DEPLOYMENT: &str = "DEPLOYMENT_NAME";

/// The dotenv file consulted for variables absent from the environment.
const ENV_FILE: &str = ".env";

/// Resolved configuration for a tether run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub endpoint: String,
    pub deployment: String,
}

impl Settings {
    /// Load settings from the process environment, falling back to `.env`.
    pub fn load() -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        let file = EnvFile::load(Path::new(ENV_FILE));
        Self::resolve(&env, &file)
    }

    fn resolve(env: &HashMap<String, String>, file: &EnvFile) -> Self {
        let get = |key: &str| {
            env.get(key)
                .map(String::as_str)
                .or_else(|| file.get(key))
                .unwrap_or_default()
                .to_string()
        };
        Settings {
            api_key: get(ENV_API_KEY),
            endpoint: get(ENV_ENDPOINT),
            deployment: get(ENV_DEPLOYMENT),
        }
    }
}

/// Key/value pairs parsed from a dotenv-style file.
#[derive(Debug, Default)]
pub struct EnvFile {
    values: HashMap<String, String>,
}

impl EnvFile {
    /// Read and parse a dotenv file, returning no values if the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped;
    /// surrounding single or double quotes are trimmed from values.
    pub fn parse(contents: &str) -> Self {
        let mut values = HashMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            values.insert(key.to_string(), value.to_string());
        }
        Self { values }
    }

    /// Look up a parsed value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}
