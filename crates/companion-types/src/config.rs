use serde::{Deserialize, Serialize};

/// Storage key the app persists its config under
pub const CONFIG_STORAGE_KEY: &str = "companion:config";

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanionConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Prefix for every endpoint path. Empty means same origin.
    pub base_url: String,
}

impl BackendConfig {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub sample_interval_ms: u32,
    pub width: u32,
    pub height: u32,
    /// JPEG quality for sampled frames, 0.0..=1.0
    pub jpeg_quality: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 3000,
            width: 640,
            height: 480,
            jpeg_quality: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub login_redirect_ms: u32,
    pub register_redirect_ms: u32,
    pub notification_ms: u32,
    pub music_preview_ms: u32,
    pub practice_tick_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            login_redirect_ms: 1500,
            register_redirect_ms: 2000,
            notification_ms: 4000,
            music_preview_ms: 5000,
            practice_tick_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Local storage when available, memory otherwise
    #[default]
    Auto,
    Memory,
    LocalStorage,
}
