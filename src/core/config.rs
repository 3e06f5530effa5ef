//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

/// DQT configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default clinician name for new plans
    pub clinician: Option<String>,

    /// Practice name printed on exported quotations
    pub practice: Option<String>,

    /// Currency symbol used in all cost output
    pub currency: Option<String>,

    /// Editor command for opening plan files
    pub editor: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/dqt/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Environment variables
        if let Ok(clinician) = std::env::var("DQT_CLINICIAN") {
            config.clinician = Some(clinician);
        }
        if let Ok(practice) = std::env::var("DQT_PRACTICE") {
            config.practice = Some(practice);
        }
        if let Ok(currency) = std::env::var("DQT_CURRENCY") {
            config.currency = Some(currency);
        }
        if let Ok(editor) = std::env::var("DQT_EDITOR") {
            config.editor = Some(editor);
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dqt")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.clinician.is_some() {
            self.clinician = other.clinician;
        }
        if other.practice.is_some() {
            self.practice = other.practice;
        }
        if other.currency.is_some() {
            self.currency = other.currency;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
    }

    /// Get the clinician name, falling back to git config or username
    pub fn clinician(&self) -> String {
        if let Some(ref clinician) = self.clinician {
            return clinician.clone();
        }

        // Try git config
        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        // Fall back to username
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Currency symbol for cost display
    pub fn currency(&self) -> String {
        self.currency.clone().unwrap_or_else(|| "£".to_string())
    }

    /// Get the editor command
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file, properly handling commands with arguments
    /// (e.g., "emacsclient -nw" or "code --wait")
    pub fn run_editor(
        &self,
        file_path: &std::path::Path,
    ) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let parts: Vec<&str> = editor.split_whitespace().collect();

        if parts.is_empty() {
            return std::process::Command::new("vi").arg(file_path).status();
        }

        let cmd = parts[0];
        let args = &parts[1..];

        std::process::Command::new(cmd)
            .args(args)
            .arg(file_path)
            .status()
    }
}
