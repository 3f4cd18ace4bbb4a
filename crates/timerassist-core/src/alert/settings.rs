use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Beep and timeout parameters, persisted under `[alerts]` in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Beep pitch in Hz.
    #[serde(default = "default_frequency")]
    pub frequency: u32,
    /// Beep length in milliseconds.
    #[serde(default = "default_duration")]
    pub duration: u32,
    /// Seconds between beeps.
    #[serde(default = "default_interval")]
    pub interval: f64,
    /// Seconds before an unattended alert gives up.
    #[serde(default = "default_alert_timeout")]
    pub alert_timeout: u64,
    /// Percent.
    #[serde(default = "default_volume")]
    pub volume: u32,
}

fn default_frequency() -> u32 {
    880
}
fn default_duration() -> u32 {
    500
}
fn default_interval() -> f64 {
    1.0
}
fn default_alert_timeout() -> u64 {
    120
}
fn default_volume() -> u32 {
    100
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            duration: default_duration(),
            interval: default_interval(),
            alert_timeout: default_alert_timeout(),
            volume: default_volume(),
        }
    }
}

impl AlertSettings {
    pub const FREQUENCY_RANGE: (u32, u32) = (37, 20_000);
    pub const DURATION_RANGE: (u32, u32) = (10, 5_000);
    pub const INTERVAL_RANGE: (f64, f64) = (0.1, 10.0);
    pub const VOLUME_RANGE: (u32, u32) = (1, 100);

    /// Copy with every field forced into its valid range.
    pub fn clamped(&self) -> Self {
        let interval = if self.interval.is_finite() {
            self.interval
                .clamp(Self::INTERVAL_RANGE.0, Self::INTERVAL_RANGE.1)
        } else {
            default_interval()
        };
        Self {
            frequency: self
                .frequency
                .clamp(Self::FREQUENCY_RANGE.0, Self::FREQUENCY_RANGE.1),
            duration: self
                .duration
                .clamp(Self::DURATION_RANGE.0, Self::DURATION_RANGE.1),
            interval,
            alert_timeout: self.alert_timeout,
            volume: self.volume.clamp(Self::VOLUME_RANGE.0, Self::VOLUME_RANGE.1),
        }
    }

    pub fn beep_interval(&self) -> Duration {
        Duration::from_secs_f64(self.clamped().interval)
    }

    pub fn beep_length(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.alert_timeout)
    }
}
