use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the optional per-session config file, looked up in the root of a
/// decoded apk working tree.
pub const CONFIG_FILE: &str = "apkres.toml";

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LinkConfig {
    /// Every config group needs `#[serde(default)]`: without it, omitting the
    /// whole `[tagging]` table would fail the parse and silently throw away
    /// the rest of the file.
    #[serde(default)]
    pub tagging: TaggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TaggingConfig {
    /// Directories under the decoded-apk root that contain disassembled
    /// classes. Multi-dex apks add "smali_classes2", "smali_classes3", ...
    #[serde(default = "default_smali_dirs")]
    pub smali_dirs: Vec<String>,
}

fn default_smali_dirs() -> Vec<String> {
    vec!["smali".to_string()]
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            smali_dirs: default_smali_dirs(),
        }
    }
}

/// Read the session config from `config_path`. A missing or malformed file
/// yields the default config; the passes must stay usable on a tree that was
/// decoded by an older tool version without any config at all.
pub fn parse_config(config_path: &Path) -> LinkConfig {
    if let Ok(content) = fs::read_to_string(config_path) {
        if let Ok(config) = toml::from_str::<LinkConfig>(&content) {
            return config;
        }
        log::warn!(
            "Malformed config at {}, falling back to defaults",
            config_path.display()
        );
    }
    LinkConfig::default()
}
