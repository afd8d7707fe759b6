//! Persistence for the high score
//!
//! The engine only needs a tiny string key-value store. [`MemoryStore`] keeps
//! values for the lifetime of the process, [`JsonFileStore`] keeps them in a
//! flat JSON object on disk so the high score survives restarts.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// A string key-value store
///
/// Writes never fail from the caller's point of view: implementations absorb
/// and log their own I/O errors.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// Read the stored high score, defaulting to 0 when missing or malformed
pub fn load_high_score(store: &dyn KeyValueStore, key: &str) -> u32 {
    let Some(raw) = store.get(key) else {
        return 0;
    };

    match raw.trim().parse::<u32>() {
        Ok(high_score) => high_score,
        Err(err) => {
            log::debug!("ignoring stored high score {:?}: {}", raw, err);
            0
        }
    }
}

/// Persist a high score as a decimal string
pub fn save_high_score(store: &mut dyn KeyValueStore, key: &str, high_score: u32) {
    store.set(key, high_score.to_string());
}
