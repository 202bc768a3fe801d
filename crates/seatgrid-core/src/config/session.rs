//! Session cap configuration.

use serde::{Deserialize, Serialize};

/// Active-session limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of concurrently logged-in sessions.
    #[serde(default = "default_max_active")]
    pub max_active: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_active: default_max_active(),
        }
    }
}

fn default_max_active() -> usize {
    5
}
