//! Configuration loading and base URL resolution

use std::path::{Path, PathBuf};

/// Compiled default backend base URL
pub const DEFAULT_BASE_URL: &str = "https://liveinfo-7gxe.onrender.com";

/// Environment variable consulted for the backend base URL
pub const BASE_URL_ENV: &str = "LIVEPULSE_BASE_URL";

/// Base URL resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`base_url` key)
/// 4. Compiled default (fallback)
pub fn resolve_base_url(cli_arg: Option<&str>, config_override: Option<&Path>) -> String {
    // Priority 1: Command-line argument
    if let Some(url) = cli_arg {
        return normalize_base_url(url);
    }

    // Priority 2: Environment variable
    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.trim().is_empty() {
            return normalize_base_url(&url);
        }
    }

    // Priority 3: TOML config file
    let config_path = config_override
        .map(Path::to_path_buf)
        .or_else(default_config_file);
    if let Some(path) = config_path {
        if let Ok(toml_content) = std::fs::read_to_string(&path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(url) = config.get("base_url").and_then(|v| v.as_str()) {
                    return normalize_base_url(url);
                }
            }
        }
    }

    // Priority 4: Compiled default
    DEFAULT_BASE_URL.to_string()
}

/// Strip a trailing slash so endpoint paths can be appended uniformly
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Default configuration file path for the platform
fn default_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("livepulse").join("config.toml");
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// OS-dependent default data folder, holding the identity token file
pub fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/livepulse
        dirs::data_local_dir()
            .map(|d| d.join("livepulse"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/livepulse"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/livepulse
        dirs::data_dir()
            .map(|d| d.join("livepulse"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/livepulse"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\livepulse
        dirs::data_local_dir()
            .map(|d| d.join("livepulse"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\livepulse"))
    } else {
        PathBuf::from("./livepulse_data")
    }
}
