use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
const ENV_FILE: &str = "env.json";

/// Persisted CLI state: selected server and the current session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    pub server_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
            email: None,
        }
    }
}

impl CliConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&get_config_dir()?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_config_dir()?)
    }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_file = dir.join(ENV_FILE);
        if !env_file.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(env_file)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, dir: &Path) -> anyhow::Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(ENV_FILE), content)?;
        Ok(())
    }

    pub fn set_session(&mut self, email: String, token: String) {
        self.email = Some(email);
        self.token = Some(token);
    }

    pub fn clear_session(&mut self) {
        self.email = None;
        self.token = None;
    }
}

/// `$NOTES_CLI_CONFIG_DIR`, or `~/.config/notes/cli`
pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(custom_dir) = std::env::var("NOTES_CLI_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }

    let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
    Ok(PathBuf::from(home).join(".config").join("notes").join("cli"))
}
