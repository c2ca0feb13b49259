use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{location::DEFAULT_DASHBOARD_URL, reconciler::DEFAULT_PAGE_SIZE};

pub const SETTINGS_FILE_NAME: &str = "dashboard.toml";
const SETTINGS_DIR_NAME: &str = "inventory_dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub page_size: u32,
    pub products_table: String,
    pub categories_table: String,
    pub dashboard_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:54321".into(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            products_table: "products".into(),
            categories_table: "categories".into(),
            dashboard_url: DEFAULT_DASHBOARD_URL.into(),
        }
    }
}

/// Defaults, then the first settings file found, then environment overrides.
pub fn load_settings() -> Settings {
    let file = settings_file_candidates()
        .into_iter()
        .find(|path| path.is_file())
        .and_then(|path| match fs::read_to_string(&path) {
            Ok(raw) => {
                info!(path = %path.display(), "loading dashboard settings");
                Some(raw)
            }
            Err(err) => {
                warn!(path = %path.display(), "failed to read settings file: {err}");
                None
            }
        });

    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = match file_contents.map(toml::from_str::<Settings>) {
        Some(Ok(parsed)) => parsed,
        Some(Err(err)) => {
            warn!("ignoring malformed {SETTINGS_FILE_NAME}: {err}");
            Settings::default()
        }
        None => Settings::default(),
    };

    if let Some(v) = env("SUPABASE_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("SUPABASE_ANON_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = env("APP__API_KEY") {
        settings.api_key = Some(v);
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        match v.parse::<u32>() {
            Ok(parsed) if parsed > 0 => settings.page_size = parsed,
            _ => warn!("ignoring invalid APP__PAGE_SIZE value: {v}"),
        }
    }
    if let Some(v) = env("APP__PRODUCTS_TABLE") {
        settings.products_table = v;
    }
    if let Some(v) = env("APP__CATEGORIES_TABLE") {
        settings.categories_table = v;
    }
    if let Some(v) = env("APP__DASHBOARD_URL") {
        settings.dashboard_url = v;
    }

    settings.api_url = normalize_api_url(&settings.api_url);
    settings.api_key = settings
        .api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());
    settings.page_size = settings.page_size.max(1);
    settings
}

pub fn normalize_api_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Settings::default().api_url;
    }
    trimmed.to_string()
}

fn settings_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![Path::new(SETTINGS_FILE_NAME).to_path_buf()];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME));
    }
    candidates
}
