/// Gallery configuration
///
/// Sizing, timeouts and debounce windows for a gallery session.
/// Stored as JSON; every field falls back to its default when absent.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::ViewportInfo;
use crate::error::ConfigError;

/// Upper bound for `new_window_days` (100 years)
pub const MAX_NEW_WINDOW_DAYS: u32 = 36_500;

/// All tunables of a gallery session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    /// URL handed to the data source
    pub data_url: String,

    // ========== Tile sizing ==========

    /// Width of one tile cell in pixels
    pub tile_width: u32,
    /// Height of one tile cell in pixels
    pub tile_height: u32,
    /// Edge of the decoded thumbnail (square bound)
    pub thumbnail_size: u32,

    // ========== Timeouts ==========

    /// Per-tile image load bound
    pub image_load_timeout_ms: u64,
    /// Picture list fetch bound
    pub fetch_timeout_ms: u64,
    /// How long the failure indicator stays visible
    pub failure_cooldown_ms: u64,
    /// Delay before the loading indicator is cleared after a successful render
    pub loading_linger_ms: u64,

    // ========== Scrolling ==========

    /// Coalescing window for scroll signals
    pub scroll_debounce_ms: u64,
    /// Coalescing window for resize signals
    pub resize_debounce_ms: u64,
    /// Distance from the content bottom that counts as "near bottom"
    pub scroll_threshold_px: u32,

    // ========== Sorting ==========

    /// Trailing window in days for the NEW sort, at most `MAX_NEW_WINDOW_DAYS`.
    /// `None` keeps every record.
    pub new_window_days: Option<u32>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            data_url: "/json/pictures.json".to_string(),
            tile_width: 196,
            tile_height: 196,
            thumbnail_size: 182,
            image_load_timeout_ms: 5000,
            fetch_timeout_ms: 10_000,
            failure_cooldown_ms: 1000,
            loading_linger_ms: 100,
            scroll_debounce_ms: 100,
            resize_debounce_ms: 100,
            scroll_threshold_px: 196,
            new_window_days: None,
        }
    }
}

impl GalleryConfig {
    /// Convert to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from a JSON string and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read the config from `path`, or from the per-user default location.
    /// A missing file yields the defaults; a broken one is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        tracing::info!("📁 Loading config from {}", path.display());
        Self::load(&path)
    }

    /// Where the config lives by default:
    /// - Linux: ~/.config/tile-gallery/config.json
    /// - macOS: ~/Library/Application Support/tile-gallery/config.json
    /// - Windows: %APPDATA%\tile-gallery\config.json
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("tile-gallery");
        path.push("config.json");
        Some(path)
    }

    /// Reject values the planner and timers cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "tile size must be non-zero, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if self.image_load_timeout_ms == 0 || self.fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeouts must be non-zero".to_string()));
        }
        if let Some(days) = self.new_window_days {
            if days > MAX_NEW_WINDOW_DAYS {
                return Err(ConfigError::Invalid(format!(
                    "new_window_days must be at most {}, got {}",
                    MAX_NEW_WINDOW_DAYS, days
                )));
            }
        }
        Ok(())
    }

    pub fn image_load_timeout(&self) -> Duration {
        Duration::from_millis(self.image_load_timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn failure_cooldown(&self) -> Duration {
        Duration::from_millis(self.failure_cooldown_ms)
    }

    pub fn loading_linger(&self) -> Duration {
        Duration::from_millis(self.loading_linger_ms)
    }

    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Viewport with this config's tile size
    pub fn viewport(&self, container_width: u32, window_height: u32) -> ViewportInfo {
        ViewportInfo::new(container_width, window_height, self.tile_width, self.tile_height)
    }

    /// NEW-sort window as a chrono duration
    pub fn new_window(&self) -> Option<chrono::Duration> {
        self.new_window_days
            .map(|days| chrono::Duration::days(i64::from(days)))
    }
}
