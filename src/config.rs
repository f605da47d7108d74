use crate::upload::validator::{
    normalize_extension, FileValidator, DEFAULT_EXTENSIONS, DEFAULT_MAX_SIZE_BYTES,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const SETTINGS_FILE: &str = "uploader.toml";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/v1/documents/upload";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub allowed_extensions: Vec<String>,
    pub max_size_bytes: u64,
    pub user_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            user_id: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    allowed_extensions: Option<Vec<String>>,
    max_size_bytes: Option<u64>,
    user_id: Option<String>,
}

impl Settings {
    pub fn validator(&self) -> FileValidator {
        FileValidator::new(&self.allowed_extensions, self.max_size_bytes)
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.endpoint {
            self.endpoint = v;
        }
        if let Some(v) = file.allowed_extensions {
            self.allowed_extensions = normalize_list(v);
        }
        if let Some(v) = file.max_size_bytes {
            self.max_size_bytes = v;
        }
        if let Some(v) = file.user_id {
            self.user_id = Some(v);
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("UPLOADER_ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = var("UPLOADER_ALLOWED_EXTENSIONS") {
            self.allowed_extensions = normalize_list(v.split(','));
        }
        if let Some(v) = var("UPLOADER_MAX_SIZE_BYTES") {
            match v.trim().parse() {
                Ok(size) => self.max_size_bytes = size,
                Err(e) => warn!("ignoring UPLOADER_MAX_SIZE_BYTES={v:?}: {e}"),
            }
        }
        if let Some(v) = var("UPLOADER_USER_ID") {
            self.user_id = Some(v);
        }
    }
}

fn normalize_list<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| normalize_extension(v.as_ref()))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Defaults, then `uploader.toml` in the working directory, then `UPLOADER_*` variables.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, var: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                info!("loaded settings from {}", path.display());
                settings.apply_file(file_cfg);
            }
            Err(e) => warn!("ignoring malformed {}: {e}", path.display()),
        }
    }

    settings.apply_env(var);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join(SETTINGS_FILE), no_env);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.validator().max_size_bytes(), 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(
            &path,
            "endpoint = \"https://files.example/upload\"\nallowed_extensions = [\".PDF\", \"txt\"]\nmax_size_bytes = 1024\nuser_id = \"42\"\n",
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            ("UPLOADER_USER_ID", "77"),
            ("UPLOADER_MAX_SIZE_BYTES", "not-a-number"),
        ]
        .into_iter()
        .collect();
        let settings = load_settings_from(&path, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.endpoint, "https://files.example/upload");
        assert_eq!(settings.allowed_extensions, vec!["pdf", "txt"]);
        assert_eq!(settings.max_size_bytes, 1024);
        assert_eq!(settings.user_id.as_deref(), Some("77"));
    }

    #[test]
    fn env_extension_list_is_comma_separated() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join(SETTINGS_FILE), |k| {
            (k == "UPLOADER_ALLOWED_EXTENSIONS").then(|| "pdf, .Docx,,csv".to_string())
        });
        assert_eq!(settings.allowed_extensions, vec!["pdf", "docx", "csv"]);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "max_size_bytes = \"lots\"").unwrap();
        assert_eq!(load_settings_from(&path, no_env), Settings::default());
    }
}
