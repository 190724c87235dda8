use crate::errors::{AppError, AppResult};
use crate::models::signal::SoundCue;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const MIN_CHECK_INTERVAL: u32 = 60;
pub const MAX_CHECK_INTERVAL: u32 = 7200;
pub const DEFAULT_CHECK_INTERVAL: u32 = 300;

/// Keys every complete configuration file carries.
const CONFIG_KEYS: [&str; 4] = [
    "database",
    "check_interval_seconds",
    "sound_enabled",
    "loop_sound",
];

/// Clamp a check interval into the accepted 60..=7200 seconds window.
pub fn clamp_interval(seconds: i64) -> u32 {
    seconds.clamp(i64::from(MIN_CHECK_INTERVAL), i64::from(MAX_CHECK_INTERVAL)) as u32
}

/// Immutable snapshot of the periodic-check preferences.
///
/// Built once from [`Config`] and handed to the tracker at construction.
/// A new snapshot replaces the old one wholesale; it is never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckSettings {
    check_interval_seconds: u32,
    sound_enabled: bool,
    loop_sound: bool,
}

impl CheckSettings {
    pub fn new(check_interval_seconds: u32, sound_enabled: bool, loop_sound: bool) -> Self {
        Self {
            check_interval_seconds: clamp_interval(i64::from(check_interval_seconds)),
            sound_enabled,
            loop_sound,
        }
    }

    pub fn check_interval_seconds(&self) -> u32 {
        self.check_interval_seconds
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.check_interval_seconds))
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn loop_sound(&self) -> bool {
        self.loop_sound
    }

    /// The audible cue that accompanies a confirmation request, if any.
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match (self.sound_enabled, self.loop_sound) {
            (false, _) => None,
            (true, false) => Some(SoundCue::Single),
            (true, true) => Some(SoundCue::Looped),
        }
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_INTERVAL, true, false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_interval")]
    pub check_interval_seconds: i64,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default)]
    pub loop_sound: bool,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_interval() -> i64 {
    i64::from(DEFAULT_CHECK_INTERVAL)
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            check_interval_seconds: default_interval(),
            sound_enabled: true,
            loop_sound: false,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rtasktimer")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rtasktimer")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtasktimer.conf")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtasktimer.sqlite")
    }

    /// Load the configuration from the standard location.
    pub fn load(write_back: bool) -> Self {
        Self::load_from(&Self::config_file(), write_back)
    }

    /// Load the configuration from `path`.
    ///
    /// A missing or unreadable file yields the defaults; so does a file that
    /// fails to parse. Missing keys take their default and an out-of-range
    /// interval is clamped. Whenever the result differs from what is on disk
    /// and `write_back` is set, the file is rewritten immediately.
    pub fn load_from(path: &Path, write_back: bool) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() == io::ErrorKind::NotFound {
                    debug!(path = %path.display(), "no configuration file, using defaults");
                } else {
                    warn!(path = %path.display(), error = %e, "configuration unreadable, using defaults");
                }
                let cfg = Config::default();
                if write_back {
                    cfg.persist(path);
                }
                return cfg;
            }
        };

        let (cfg, rewrite) = match Self::parse(&content) {
            Some((parsed, complete)) => {
                let normalized = parsed.normalized();
                let rewrite = !complete || normalized != parsed;
                (normalized, rewrite)
            }
            None => {
                warn!(path = %path.display(), "configuration corrupt, falling back to defaults");
                (Config::default(), true)
            }
        };

        if rewrite && write_back {
            cfg.persist(path);
        }
        cfg
    }

    /// Parse YAML content; the flag tells whether every key was present.
    fn parse(content: &str) -> Option<(Config, bool)> {
        let value: Value = serde_yaml::from_str(content).ok()?;
        let complete = match value.as_mapping() {
            Some(map) => CONFIG_KEYS
                .iter()
                .all(|k| map.contains_key(Value::String((*k).to_string()))),
            None => return None,
        };
        let cfg: Config = serde_yaml::from_value(value).ok()?;
        Some((cfg, complete))
    }

    fn normalized(&self) -> Self {
        let database = if self.database.trim().is_empty() {
            default_database()
        } else {
            self.database.clone()
        };
        Self {
            database,
            check_interval_seconds: i64::from(clamp_interval(self.check_interval_seconds)),
            sound_enabled: self.sound_enabled,
            loop_sound: self.loop_sound,
        }
    }

    fn persist(&self, path: &Path) {
        if let Err(e) = self.save_to(path) {
            warn!(path = %path.display(), error = %e, "could not rewrite configuration");
        }
    }

    /// Write the configuration to `path`, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_file())
    }

    /// Resolved path of the database file (`~/` expanded).
    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    pub fn check_settings(&self) -> CheckSettings {
        CheckSettings::new(
            clamp_interval(self.check_interval_seconds),
            self.sound_enabled,
            self.loop_sound,
        )
    }

    /// A copy of this configuration carrying `settings` in place of the old ones.
    pub fn with_check_settings(&self, settings: CheckSettings) -> Self {
        Self {
            database: self.database.clone(),
            check_interval_seconds: i64::from(settings.check_interval_seconds()),
            sound_enabled: settings.sound_enabled(),
            loop_sound: settings.loop_sound(),
        }
    }

    /// Create the configuration directory, the configuration file and the
    /// (empty) database file. Returns the configuration that was written.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            config.save_to(&Self::config_file())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}
