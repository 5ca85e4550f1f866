//! Pusher configuration.
//!
//! [`PusherSettings`] holds fully resolved values for one device.
//! [`DeviceConfig`] is a sparse overlay read from a config file; only
//! the fields it names replace the process-wide defaults.

pub mod loader;

pub use loader::{load_device_configs, parse_device_configs, ConfigFormat};

use serde::{Deserialize, Serialize};

use crate::protocol::{defaults, STRIP_FLAG_COUNT};

/// Resolved settings for one emulated pusher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PusherSettings {
    pub controller_ordinal: i32,
    pub group_ordinal: i32,
    pub strips_attached: u8,
    pub pixels_per_strip: u16,
    pub max_strips_per_packet: u8,
    pub update_period: u32,
    pub power_total: u32,
    pub strip_flags: [u8; STRIP_FLAG_COUNT],
    pub pusher_flags: u32,
    pub segments: u32,
    pub power_domain: u32,
}

impl Default for PusherSettings {
    fn default() -> Self {
        Self {
            controller_ordinal: 0,
            group_ordinal: 0,
            strips_attached: 8,
            pixels_per_strip: 240,
            max_strips_per_packet: defaults::MAX_STRIPS_PER_PACKET,
            update_period: defaults::UPDATE_PERIOD,
            power_total: defaults::POWER_TOTAL,
            strip_flags: [0; STRIP_FLAG_COUNT],
            pusher_flags: 0,
            segments: 0,
            power_domain: 0,
        }
    }
}

/// One record of a multi-pusher config file.
///
/// Keys are camelCase; the snake_case names and the short `number` /
/// `group` keys used by older mock configs are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    #[serde(alias = "number", alias = "controller_ordinal")]
    pub controller_ordinal: Option<i32>,

    #[serde(alias = "group", alias = "group_ordinal")]
    pub group_ordinal: Option<i32>,

    #[serde(alias = "strips", alias = "strips_attached")]
    pub strips_attached: Option<u8>,

    #[serde(alias = "pixels", alias = "pixels_per_strip")]
    pub pixels_per_strip: Option<u16>,

    #[serde(alias = "max_strips_per_packet")]
    pub max_strips_per_packet: Option<u8>,

    #[serde(alias = "update_period")]
    pub update_period: Option<u32>,

    #[serde(alias = "power_total")]
    pub power_total: Option<u32>,

    #[serde(alias = "strip_flags")]
    pub strip_flags: Option<Vec<u8>>,

    #[serde(alias = "pusher_flags")]
    pub pusher_flags: Option<u32>,

    pub segments: Option<u32>,

    #[serde(alias = "power_domain")]
    pub power_domain: Option<u32>,
}

impl DeviceConfig {
    /// Check constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(flags) = &self.strip_flags {
            if flags.len() > STRIP_FLAG_COUNT {
                return Err(format!(
                    "stripFlags has {} entries, at most {} are supported",
                    flags.len(),
                    STRIP_FLAG_COUNT
                ));
            }
        }
        Ok(())
    }

    /// Overlay this record on `base`, replacing only the fields it sets.
    pub fn merge_onto(&self, base: &PusherSettings) -> PusherSettings {
        let mut settings = base.clone();

        if let Some(v) = self.controller_ordinal {
            settings.controller_ordinal = v;
        }
        if let Some(v) = self.group_ordinal {
            settings.group_ordinal = v;
        }
        if let Some(v) = self.strips_attached {
            settings.strips_attached = v;
        }
        if let Some(v) = self.pixels_per_strip {
            settings.pixels_per_strip = v;
        }
        if let Some(v) = self.max_strips_per_packet {
            settings.max_strips_per_packet = v;
        }
        if let Some(v) = self.update_period {
            settings.update_period = v;
        }
        if let Some(v) = self.power_total {
            settings.power_total = v;
        }
        if let Some(flags) = &self.strip_flags {
            // Unlisted strips get zero flags
            let mut padded = [0u8; STRIP_FLAG_COUNT];
            for (slot, flag) in padded.iter_mut().zip(flags) {
                *slot = *flag;
            }
            settings.strip_flags = padded;
        }
        if let Some(v) = self.pusher_flags {
            settings.pusher_flags = v;
        }
        if let Some(v) = self.segments {
            settings.segments = v;
        }
        if let Some(v) = self.power_domain {
            settings.power_domain = v;
        }

        settings
    }
}

/// Resolve the settings of every pusher to emulate.
///
/// Without config records a single pusher runs on the defaults.
pub fn resolve_settings(
    defaults: &PusherSettings,
    records: Option<&[DeviceConfig]>,
) -> Vec<PusherSettings> {
    match records {
        Some(records) => records.iter().map(|r| r.merge_onto(defaults)).collect(),
        None => vec![defaults.clone()],
    }
}
