use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Durable session flags. Read once at startup, written on every change so
/// a restart resumes in the prior mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSettings {
    #[serde(default)]
    pub listening_enabled: bool,
    #[serde(default = "default_true")]
    pub voice_feedback: bool,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub panel_open: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            listening_enabled: false,
            voice_feedback: true,
            language: "en-US".to_string(),
            panel_open: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en-US".to_string()
}

/// Where session flags live between runs.
///
/// Saving is deliberately infallible: a broken store must not take the
/// listening session down with it.
pub trait SettingsStore {
    fn load(&self) -> PersistedSettings;
    fn save(&mut self, settings: &PersistedSettings);
}

/// YAML file store. A missing or malformed file loads as defaults; write
/// failures warn on stderr and the session carries on.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: &Path) -> Self {
        FileStore {
            path: path.to_path_buf(),
        }
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> PersistedSettings {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
            Err(_) => PersistedSettings::default(),
        }
    }

    fn save(&mut self, settings: &PersistedSettings) {
        let yaml = match serde_yaml::to_string(settings) {
            Ok(yaml) => yaml,
            Err(e) => {
                eprintln!("Warning: could not serialize session settings: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, yaml) {
            eprintln!(
                "Warning: could not persist session settings to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

// ============================================================================
// Memory store (for tests)
// ============================================================================

/// In-memory store that records every save for assertions.
pub struct MemoryStore {
    current: PersistedSettings,
    pub saves: Vec<PersistedSettings>,
}

impl MemoryStore {
    pub fn new(initial: PersistedSettings) -> Self {
        MemoryStore {
            current: initial,
            saves: Vec::new(),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> PersistedSettings {
        self.current.clone()
    }

    fn save(&mut self, settings: &PersistedSettings) {
        self.current = settings.clone();
        self.saves.push(settings.clone());
    }
}
