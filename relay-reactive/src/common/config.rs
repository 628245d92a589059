/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::time::Duration;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Configuration for the Relay runtime.
///
/// Loaded from `relay/config.toml` in the XDG configuration directories.
/// Every section is optional; missing values fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Values used when an `ActorConfig` leaves a field unset
    pub defaults: DefaultsConfig,
    /// Capacity limits
    pub limits: LimitsConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
}

/// Default values configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Actor name when none provided
    pub actor_name: String,
    /// Worker count when none provided; values below 1 are treated as 1
    pub workers: usize,
}

/// Limits and capacity configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Mailbox capacity; 0 means "same as the worker count"
    pub mailbox_capacity: usize,
}

/// Timeout-related configuration values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long `stop` may wait on outstanding messages before logging a warning
    pub stop_warning_ms: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            actor_name: "actor".to_string(),
            workers: 1,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            stop_warning_ms: 5_000,
        }
    }
}

impl RelayConfig {
    /// Worker count to use when an actor does not specify one.
    #[must_use]
    pub fn default_workers(&self) -> usize {
        self.defaults.workers.max(1)
    }

    /// Mailbox capacity for an actor running `workers` workers.
    #[must_use]
    pub fn mailbox_capacity_for(&self, workers: usize) -> usize {
        match self.limits.mailbox_capacity {
            0 => workers.max(1),
            capacity => capacity,
        }
    }

    /// Convert the stop warning threshold to a `Duration`
    #[must_use]
    pub const fn stop_warning(&self) -> Duration {
        Duration::from_millis(self.timeouts.stop_warning_ms)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is not valid TOML for this structure.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str::<Self>(source)?)
    }

    /// Load configuration from XDG-compliant locations
    ///
    /// Looks for `relay/config.toml` under `$XDG_CONFIG_HOME` and then the
    /// XDG config directories. If no file is found, or the file cannot be read
    /// or parsed, the error is logged and defaults are returned.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix("relay") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let Some(path) = xdg_dirs.find_config_file("config.toml") else {
            info!("No configuration file found, using defaults");
            return Self::default();
        };

        info!("Loading configuration from: {}", path.display());
        match std::fs::read_to_string(&path) {
            Ok(config_str) => match Self::from_toml_str(&config_str) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to parse configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: RelayConfig = RelayConfig::load();
}
