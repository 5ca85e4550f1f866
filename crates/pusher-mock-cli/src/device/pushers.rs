//! Builds the emulated pusher set from command-line options.
//!
//! Thin wrapper around core's config loader and device factory.

use pusher_mock_core::config::{load_device_configs, resolve_settings};
use pusher_mock_core::device::{resolve_host_ipv4, DeviceFactory};
use pusher_mock_core::{DeviceSet, PusherSettings};

use crate::cli::PusherArgs;
use crate::error::CliError;

/// Process-wide defaults from flags; config records are merged on top.
pub fn default_settings(args: &PusherArgs) -> PusherSettings {
    PusherSettings {
        controller_ordinal: args.number,
        group_ordinal: args.group,
        strips_attached: args.strips,
        pixels_per_strip: args.pixels,
        ..Default::default()
    }
}

/// Load config, resolve the host address, and bind every pusher.
pub fn build_pushers(args: &PusherArgs) -> Result<DeviceSet, CliError> {
    let records = args
        .config
        .as_deref()
        .map(load_device_configs)
        .transpose()?;
    let settings = resolve_settings(&default_settings(args), records.as_deref());

    let host_ip = match args.bind_ip {
        Some(ip) => ip,
        None => resolve_host_ipv4()?,
    };
    tracing::debug!("Binding pushers to {}", host_ip);

    let devices = DeviceFactory::new(host_ip).build_device_set(&settings)?;
    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::path::PathBuf;

    fn args() -> PusherArgs {
        PusherArgs {
            number: 2,
            group: 1,
            strips: 6,
            pixels: 120,
            config: None,
            bind_ip: Some(Ipv4Addr::LOCALHOST),
        }
    }

    #[test]
    fn test_flags_become_defaults() {
        let settings = default_settings(&args());
        assert_eq!(settings.controller_ordinal, 2);
        assert_eq!(settings.group_ordinal, 1);
        assert_eq!(settings.strips_attached, 6);
        assert_eq!(settings.pixels_per_strip, 120);
        assert_eq!(settings.power_total, PusherSettings::default().power_total);
    }

    #[test]
    fn test_bad_config_builds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("pushers.json");
        std::fs::write(&path, r#"{"number": 1}"#).unwrap();

        let mut args = args();
        args.config = Some(path);

        let err = build_pushers(&args).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_codes::CONFIG_ERROR);
    }
}
