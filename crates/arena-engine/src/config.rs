//! Engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Battle engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long a completed battle stays readable before it is purged
    /// from the active table
    #[serde(with = "duration_secs")]
    pub cleanup_grace: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cleanup_grace: Duration::from_secs(10),
        }
    }
}

/// Seconds-based serde helper
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
