use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::io::KeyValueStore;
use crate::models::EmotionSample;

/// Storage key for the serialized session history
pub const HISTORY_KEY: &str = "emotionHistory";

/// Ordered, append-only session history with best-effort persistence.
///
/// The in-memory sequence is authoritative. Unless privacy mode is on, every
/// append rewrites the persisted copy; storage failures are logged and
/// swallowed.
pub struct HistoryStore<S: KeyValueStore> {
    samples: Vec<EmotionSample>,
    storage: S,
    privacy_mode: bool,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Open the store, restoring any persisted history unless privacy mode
    /// is on. A corrupt persisted value is erased and the store starts empty.
    pub fn open(mut storage: S, privacy_mode: bool) -> Self {
        let mut samples = Vec::new();

        if !privacy_mode {
            if let Some(stored) = storage.get(HISTORY_KEY) {
                match serde_json::from_str::<Vec<EmotionSample>>(&stored) {
                    Ok(restored) => {
                        info!("Restored {} samples from storage", restored.len());
                        samples = restored;
                    }
                    Err(e) => {
                        warn!("Failed to parse stored emotion history, discarding: {}", e);
                        storage.remove(HISTORY_KEY);
                    }
                }
            }
        }

        Self {
            samples,
            storage,
            privacy_mode,
        }
    }

    /// Append a sample and persist the full history
    pub fn append(&mut self, sample: EmotionSample) {
        self.samples.push(sample);
        if !self.privacy_mode {
            self.persist();
        }
    }

    /// Clear the history and any persisted copy
    pub fn reset(&mut self) {
        debug!("Resetting history ({} samples)", self.samples.len());
        self.samples.clear();
        if !self.privacy_mode {
            self.storage.remove(HISTORY_KEY);
        }
    }

    /// Turning privacy mode on stops all future writes without touching the
    /// in-memory history. Turning it off resumes writes from the next append.
    ///
    /// Disabling does not reload the persisted copy. The in-memory history
    /// stays authoritative and the next append overwrites whatever storage
    /// held.
    pub fn set_privacy_mode(&mut self, enabled: bool) {
        if self.privacy_mode != enabled {
            info!("Privacy mode {}", if enabled { "enabled" } else { "disabled" });
        }
        self.privacy_mode = enabled;
    }

    pub fn privacy_mode(&self) -> bool {
        self.privacy_mode
    }

    /// Full ordered history
    pub fn all(&self) -> &[EmotionSample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&EmotionSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Pretty-printed JSON array of all samples
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.samples).context("Failed to serialize session history")
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.samples) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize emotion history: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(HISTORY_KEY, &json) {
            warn!("Could not save emotion history, storage might be full: {}", e);
        }
    }
}
