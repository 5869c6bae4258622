use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{cache::MIN_CAPACITY, error::LoadError, substitute::DEFAULT_MAX_PASSES};

/// Expansion settings. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub give_enabled: bool,
    pub remove_enabled: bool,
    pub cache_enabled: bool,
    pub cache_max_size: usize,
    /// Zero keeps entries until evicted.
    pub cache_ttl_millis: u64,
    pub boolean_true: String,
    pub boolean_false: String,
    /// Host stores item data as components rather than raw NBT.
    pub use_components: bool,
    pub substitution_passes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            give_enabled: false,
            remove_enabled: false,
            cache_enabled: true,
            cache_max_size: 500,
            cache_ttl_millis: 0,
            boolean_true: "yes".to_string(),
            boolean_false: "no".to_string(),
            use_components: false,
            substitution_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache_max_size.max(MIN_CAPACITY)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_millis)
    }

    pub fn with_give(mut self, enabled: bool) -> Self {
        self.give_enabled = enabled;
        self
    }

    pub fn with_remove(mut self, enabled: bool) -> Self {
        self.remove_enabled = enabled;
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_components(mut self, enabled: bool) -> Self {
        self.use_components = enabled;
        self
    }

    pub fn render(&self, value: bool) -> &str {
        let rendered = if value { &self.boolean_true } else { &self.boolean_false };
        rendered.as_str()
    }
}
