// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for sharkos-monitor.
//!
//! Config is loaded from the `[sharkos-monitor]` section of `sharkos.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `$SHARKOS_CONFIG`
//! 3. `./sharkos.toml`
//! 4. `~/.config/sharkos/sharkos.toml`
//! 5. `/etc/sharkos/sharkos.toml`

use serde::{Deserialize, Serialize};
use sharkos_app::{parse_level, ConfigFile};
pub use sharkos_signal_log::SignalLogConfig;

/// Top-level monitor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Where telemetry lines come from
    pub input: InputConfig,
    /// What gets printed to stdout
    pub output: OutputConfig,
    /// CSV/event recording
    pub signal_log: SignalLogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    #[default]
    Stdin,
    File,
    Serial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub source: InputSource,
    /// File to read when `source = "file"`
    pub path: Option<String>,
    /// Serial device when `source = "serial"` (e.g. "/dev/ttyACM0")
    pub port: Option<String>,
    pub baud: u32,
    /// Pulse DTR/RTS after opening the port to reset the device
    pub reset_on_open: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source: InputSource::Stdin,
            path: None,
            port: None,
            baud: 115_200,
            reset_on_open: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print one JSON line per decoded message
    pub json: bool,
    /// Leave generic messages out of stdout
    pub skip_generic: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: true,
            skip_generic: false,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        match self.input.source {
            InputSource::Stdin => {}
            InputSource::File => {
                if is_blank(self.input.path.as_deref()) {
                    return Err("[input].path must be set when [input].source = \"file\"".into());
                }
            }
            InputSource::Serial => {
                if is_blank(self.input.port.as_deref()) {
                    return Err("[input].port must be set when [input].source = \"serial\"".into());
                }
                if self.input.baud == 0 {
                    return Err("[input].baud must be > 0 for serial input".into());
                }
            }
        }

        if self.signal_log.enabled && self.signal_log.dir.trim().is_empty() {
            return Err("[signal_log].dir must not be empty when recording is enabled".into());
        }
        Ok(())
    }

    /// Generate an example configuration wrapped under the
    /// `[sharkos-monitor]` section header.
    pub fn example_combined_toml() -> String {
        #[derive(Serialize)]
        struct Wrapper {
            #[serde(rename = "sharkos-monitor")]
            inner: MonitorConfig,
        }
        let example = MonitorConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            input: InputConfig {
                source: InputSource::Serial,
                port: Some("/dev/ttyACM0".to_string()),
                ..InputConfig::default()
            },
            output: OutputConfig::default(),
            signal_log: SignalLogConfig::default(),
        };
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).unwrap_or("").is_empty()
}

/// Accepts exactly what `init_logging` understands.
fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    match level {
        Some(name) if parse_level(Some(name)).is_none() => Err(format!(
            "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
            name
        )),
        _ => Ok(()),
    }
}

impl ConfigFile for MonitorConfig {
    fn section_key() -> &'static str {
        "sharkos-monitor"
    }
}
