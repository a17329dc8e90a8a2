use crate::matchers::MatcherKind;
use crate::tree::WalkOptions;
use anyhow::anyhow;
use directories::{ProjectDirs, UserDirs};
use log::debug;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the zets root directory.
pub const ROOT_ENV: &str = "ZETS_DIR";

/// Locations zets uses on this machine
pub struct ZetDirs {
    project_dirs: Option<ProjectDirs>,
    user_dirs: Option<UserDirs>,
}

impl ZetDirs {
    /// Create a new ZetDirs instance
    pub fn new() -> Self {
        let project_dirs = ProjectDirs::from("com", "zets", "zets");
        let user_dirs = UserDirs::new();
        Self {
            project_dirs,
            user_dirs,
        }
    }

    /// Get the default zets root, `~/zets`
    pub fn default_root(&self) -> PathBuf {
        match &self.user_dirs {
            Some(dirs) => dirs.home_dir().join("zets"),
            None => {
                // Fallback to current directory if no home directory is known
                std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("zets")
            }
        }
    }

    /// Get the directory holding config.json
    pub fn config_dir(&self) -> PathBuf {
        match &self.project_dirs {
            Some(dirs) => dirs.config_dir().to_path_buf(),
            None => std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".zets"),
        }
    }

    /// Get the default config file path
    pub fn default_config_path(&self) -> PathBuf {
        self.config_dir().join("config.json")
    }
}

impl Default for ZetDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// User settings, read from `config.json` with every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZetsConfig {
    pub root: PathBuf,
    pub hidden_prefix: char,
    pub excluded_dirs: Vec<String>,
    pub skip_unreadable: bool,
    pub matcher: MatcherKind,
    pub editor: Option<String>,
}

impl Default for ZetsConfig {
    fn default() -> Self {
        let walk = WalkOptions::default();
        Self {
            root: ZetDirs::new().default_root(),
            hidden_prefix: walk.hidden_prefix,
            excluded_dirs: walk.excluded_dirs,
            skip_unreadable: walk.skip_unreadable,
            matcher: MatcherKind::default(),
            editor: None,
        }
    }
}

impl ZetsConfig {
    /// Loads `path`, or the defaults if it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config: ZetsConfig = serde_json::from_str(&data)
            .map_err(|e| anyhow!("Failed to parse config {}: {}", path.display(), e))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the config file (the default location unless `path` is given)
    /// and applies the `ZETS_DIR` environment override.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::load(&ZetDirs::new().default_config_path())?,
        };
        config.apply_root_env(std::env::var_os(ROOT_ENV));
        Ok(config)
    }

    /// Uses `value` as the root unless it is absent or empty.
    pub fn apply_root_env(&mut self, value: Option<OsString>) {
        if let Some(value) = value
            && !value.is_empty()
        {
            self.root = PathBuf::from(value);
        }
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            hidden_prefix: self.hidden_prefix,
            excluded_dirs: self.excluded_dirs.clone(),
            skip_unreadable: self.skip_unreadable,
        }
    }

    /// Configured editor, then `$EDITOR`, then `vim`.
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "vim".to_string())
    }
}
