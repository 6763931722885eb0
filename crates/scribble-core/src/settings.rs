#![forbid(unsafe_code)]

//! User-facing settings that shape scribble decay policy.
//!
//! [`ScribbleSettings`] is a plain value passed into every lifecycle
//! operation. Hosts that let users edit settings while trails are animating
//! keep it in a [`SettingsHandle`]: writes from a settings panel swap the
//! value atomically and the frame loop reads a snapshot without locking.
//!
//! # Sources
//!
//! - [`ScribbleSettings::default`]: laser trails obey the normal stop grace.
//! - [`ScribbleSettings::from_env`]: `SCRIBBLE_LASER_KEEP_DELAY`.
//! - `from_toml_str` / `from_json_str` and their `_file` variants with the
//!   `settings-file` feature:
//!
//! ```toml
//! laser_keep_delay_after_stop = true
//! ```

#[cfg(feature = "settings-file")]
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
#[cfg(feature = "settings-file")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable enabling the laser exemption (`1/0/true/false`).
const ENV_LASER_KEEP_DELAY: &str = "SCRIBBLE_LASER_KEEP_DELAY";

// ---------------------------------------------------------------------------
// ScribbleSettings
// ---------------------------------------------------------------------------

/// Decay policy knobs read by [`stop_item`](crate::lifecycle::stop_item) and
/// [`tick_item`](crate::lifecycle::tick_item).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "settings-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "settings-file", serde(default))]
pub struct ScribbleSettings {
    /// Keep a laser trail's configured delay after the pointer is released,
    /// and never self-consume it while it is idle.
    pub laser_keep_delay_after_stop: bool,
}

impl ScribbleSettings {
    /// Enable or disable the laser exemption (builder pattern).
    #[must_use]
    pub fn with_laser_keep_delay_after_stop(mut self, keep: bool) -> Self {
        self.laser_keep_delay_after_stop = keep;
        self
    }

    /// Load settings from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load settings using a custom environment lookup (for tests).
    ///
    /// Unparseable values leave the default in place.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(val) = get_env(ENV_LASER_KEEP_DELAY)
            && let Some(flag) = parse_bool(&val)
        {
            settings.laser_keep_delay_after_stop = flag;
        }

        settings
    }

    /// Load from a TOML string.
    #[cfg(feature = "settings-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "settings-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "settings-file")]
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "settings-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading settings from a file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "settings-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "settings-file")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// SettingsHandle
// ---------------------------------------------------------------------------

/// Shared, atomically replaceable settings.
///
/// Clones share the same cell. `load` is wait-free; `store` allocates one
/// `Arc` and swaps it in.
#[derive(Clone)]
pub struct SettingsHandle {
    inner: Arc<ArcSwap<ScribbleSettings>>,
}

impl SettingsHandle {
    /// Create a handle holding `settings`.
    #[must_use]
    pub fn new(settings: ScribbleSettings) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    /// Snapshot of the current settings.
    #[must_use]
    pub fn load(&self) -> Arc<ScribbleSettings> {
        self.inner.load_full()
    }

    /// Replace the settings for every clone of this handle.
    pub fn store(&self, settings: ScribbleSettings) {
        #[cfg(feature = "tracing")]
        tracing::info!(
            laser_keep_delay_after_stop = settings.laser_keep_delay_after_stop,
            "scribble settings replaced"
        );
        self.inner.store(Arc::new(settings));
    }

    /// Apply `f` to a copy of the current settings and store the result.
    pub fn update(&self, f: impl FnOnce(&mut ScribbleSettings)) {
        let mut next = ScribbleSettings::clone(&self.inner.load());
        f(&mut next);
        self.store(next);
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(ScribbleSettings::default())
    }
}

impl std::fmt::Debug for SettingsHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SettingsHandle")
            .field(&*self.inner.load())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Barrier;
    use std::thread;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_leaves_laser_unexempt() {
        assert!(!ScribbleSettings::default().laser_keep_delay_after_stop);
    }

    #[test]
    fn env_enables_laser_flag() {
        for value in ["1", "true", "TRUE", " yes "] {
            let settings =
                ScribbleSettings::from_env_with(env_from(&[(ENV_LASER_KEEP_DELAY, value)]));
            assert!(settings.laser_keep_delay_after_stop, "value {value:?}");
        }
    }

    #[test]
    fn env_disables_laser_flag() {
        for value in ["0", "false", "off"] {
            let settings =
                ScribbleSettings::from_env_with(env_from(&[(ENV_LASER_KEEP_DELAY, value)]));
            assert!(!settings.laser_keep_delay_after_stop, "value {value:?}");
        }
    }

    #[test]
    fn env_garbage_is_ignored() {
        let settings =
            ScribbleSettings::from_env_with(env_from(&[(ENV_LASER_KEEP_DELAY, "maybe")]));
        assert_eq!(settings, ScribbleSettings::default());
    }

    #[cfg(feature = "settings-file")]
    #[test]
    fn toml_reads_laser_flag() {
        let settings = ScribbleSettings::from_toml_str("laser_keep_delay_after_stop = true\n")
            .expect("valid toml");
        assert!(settings.laser_keep_delay_after_stop);
    }

    #[cfg(feature = "settings-file")]
    #[test]
    fn toml_missing_fields_use_defaults() {
        let settings = ScribbleSettings::from_toml_str("").expect("empty toml");
        assert_eq!(settings, ScribbleSettings::default());
    }

    #[cfg(feature = "settings-file")]
    #[test]
    fn json_reads_laser_flag() {
        let settings = ScribbleSettings::from_json_str(r#"{"laser_keep_delay_after_stop": true}"#)
            .expect("valid json");
        assert!(settings.laser_keep_delay_after_stop);
    }

    #[cfg(feature = "settings-file")]
    #[test]
    fn json_parse_error_surfaces() {
        let err = ScribbleSettings::from_json_str("{not json").expect_err("bad json");
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[cfg(feature = "settings-file")]
    #[test]
    fn missing_file_is_io_error() {
        let err = ScribbleSettings::from_toml_file("/nonexistent/scribble.toml")
            .expect_err("no such file");
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn handle_clones_share_state() {
        let handle = SettingsHandle::default();
        let reader = handle.clone();
        handle.update(|s| s.laser_keep_delay_after_stop = true);
        assert!(reader.load().laser_keep_delay_after_stop);
    }

    #[test]
    fn handle_concurrent_writes_settle_on_last_store() {
        let handle = SettingsHandle::default();
        let barrier = Arc::new(Barrier::new(3));

        let writers: Vec<_> = (0..2)
            .map(|i| {
                let handle = handle.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for n in 0..200u64 {
                        handle.store(
                            ScribbleSettings::default()
                                .with_laser_keep_delay_after_stop((n + i) % 2 == 0),
                        );
                    }
                })
            })
            .collect();

        barrier.wait();
        for _ in 0..500 {
            let _ = handle.load();
        }

        for w in writers {
            w.join().expect("writer panicked");
        }

        handle.store(ScribbleSettings::default().with_laser_keep_delay_after_stop(true));
        assert!(handle.load().laser_keep_delay_after_stop);
    }
}
