use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::protocol::DEFAULT_API_BASE_URL;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 3;
pub const DEFAULT_LOG_FILTER: &str = "info";
const LOCAL_CONFIG_FILE: &str = "bookshelf.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub items_per_page: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_base_url: Option<String>,
    items_per_page: Option<usize>,
    log_filter: Option<String>,
}

/// Defaults, then the config file, then environment. Problems are returned
/// as notes instead of logged because tracing is configured from the result.
pub fn load_settings(explicit_file: Option<&Path>) -> (Settings, Vec<String>) {
    let mut settings = Settings::default();
    let mut notes = Vec::new();

    if let Some(path) = explicit_file.map(Path::to_path_buf).or_else(discover_config_file) {
        match read_file_settings(&path) {
            Ok(file_cfg) => settings.apply_file(file_cfg, &mut notes),
            Err(err) => notes.push(format!("{err:#}")),
        }
    }

    settings.apply_env(|key| std::env::var(key).ok(), &mut notes);
    (settings, notes)
}

fn discover_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("bookshelf").join("config.toml"))
        .filter(|path| path.is_file())
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

impl Settings {
    fn apply_file(&mut self, file_cfg: FileSettings, notes: &mut Vec<String>) {
        if let Some(v) = file_cfg.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file_cfg.items_per_page {
            self.set_items_per_page(v, "config file", notes);
        }
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>, notes: &mut Vec<String>) {
        if let Some(v) = lookup("BOOKSHELF_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("APP__API_BASE_URL") {
            self.api_base_url = v;
        }

        if let Some(v) = lookup("APP__ITEMS_PER_PAGE") {
            match v.trim().parse::<usize>() {
                Ok(parsed) => self.set_items_per_page(parsed, "APP__ITEMS_PER_PAGE", notes),
                Err(_) => notes.push(format!(
                    "ignoring APP__ITEMS_PER_PAGE={v:?}: not a positive integer"
                )),
            }
        }

        if let Some(v) = lookup("APP__LOG_FILTER") {
            self.log_filter = v;
        }
    }

    /// Command-line flags, applied last.
    pub fn apply_overrides(&mut self, api_base_url: Option<String>, items_per_page: Option<usize>) {
        if let Some(v) = api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = items_per_page {
            let mut notes = Vec::new();
            self.set_items_per_page(v, "--items-per-page", &mut notes);
            for note in notes {
                tracing::warn!("{note}");
            }
        }
    }

    fn set_items_per_page(&mut self, value: usize, source: &str, notes: &mut Vec<String>) {
        if value == 0 {
            notes.push(format!(
                "ignoring items_per_page=0 from {source}; keeping {}",
                self.items_per_page
            ));
            return;
        }
        self.items_per_page = value;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
