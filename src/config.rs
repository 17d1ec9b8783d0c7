//! Courier configuration.
//!
//! Handles loading, validating, and merging a `snapcourier.toml` file. The
//! file is sparse: stock defaults are the base layer and user values override
//! them key by key. A missing file simply means "all defaults".
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [image]
//! max_width = 1280          # Wider captures are downscaled to this width
//! quality = 80              # JPEG quality (1-100)
//!
//! [network]
//! default_port = 5000       # Substituted when the port can't be parsed
//! strict_port = false       # Reject unparsable ports instead of substituting
//! chunk_size = 4096         # Raw socket write size (one progress event per chunk)
//! connect_timeout_secs = 10 # Raw socket connect timeout
//! write_timeout_secs = 30   # Raw socket write timeout
//! http_timeout_secs = 30    # HTTP connect and request timeout
//!
//! [http]
//! upload_path = "/upload"   # Receiver route
//! field_name = "file"       # Multipart field carrying the photo
//! filename = "foto.jpg"     # Filename announced in the multipart part
//!
//! [logging]
//! level = "info"            # trace, debug, info, warn, error (RUST_LOG wins)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `snapcourier.toml`.
///
/// All fields have defaults matching the receiver's expectations, so an empty
/// file (or no file) gives a working client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CourierConfig {
    /// Capture preprocessing (downscale bound, JPEG quality).
    pub image: ImageConfig,
    /// Address parsing and socket tuning.
    pub network: NetworkConfig,
    /// HTTP multipart upload shape.
    pub http: HttpConfig,
    /// Log filter used when `RUST_LOG` is unset.
    pub logging: LoggingConfig,
}

impl CourierConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image.quality == 0 || self.image.quality > 100 {
            return Err(ConfigError::Validation(
                "image.quality must be 1-100".into(),
            ));
        }
        if self.image.max_width == 0 {
            return Err(ConfigError::Validation(
                "image.max_width must be non-zero".into(),
            ));
        }
        if self.network.default_port == 0 {
            return Err(ConfigError::Validation(
                "network.default_port must be 1-65535".into(),
            ));
        }
        if self.network.chunk_size == 0 {
            return Err(ConfigError::Validation(
                "network.chunk_size must be non-zero".into(),
            ));
        }
        for (key, secs) in [
            ("connect_timeout_secs", self.network.connect_timeout_secs),
            ("write_timeout_secs", self.network.write_timeout_secs),
            ("http_timeout_secs", self.network.http_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Validation(format!(
                    "network.{key} must be non-zero"
                )));
            }
        }
        if !self.http.upload_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "http.upload_path must start with '/'".into(),
            ));
        }
        if self.http.field_name.is_empty() {
            return Err(ConfigError::Validation(
                "http.field_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Capture preprocessing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Captures wider than this are downscaled, preserving aspect ratio.
    pub max_width: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: 1280,
            quality: 80,
        }
    }
}

/// Address parsing and socket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Port substituted when the address carries an unparsable port.
    pub default_port: u16,
    /// When true, an unparsable port is an address error instead.
    pub strict_port: bool,
    /// Bytes written per raw-socket chunk.
    pub chunk_size: usize,
    pub connect_timeout_secs: u64,
    pub write_timeout_secs: u64,
    /// Applies to both the HTTP connect phase and the whole request.
    pub http_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_port: 5000,
            strict_port: false,
            chunk_size: 4096,
            connect_timeout_secs: 10,
            write_timeout_secs: 30,
            http_timeout_secs: 30,
        }
    }
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Shape of the multipart upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub upload_path: String,
    pub field_name: String,
    pub filename: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            upload_path: "/upload".to_string(),
            field_name: "file".to_string(),
            filename: "foto.jpg".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(CourierConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CourierConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CourierConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to defaults when absent.
pub fn load_config(path: &Path) -> Result<CourierConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `snapcourier.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# snapcourier configuration
# ========================
# Every key is optional. Delete what you don't change.

[image]
# Captures wider than this many pixels are downscaled to exactly this width.
# Height follows the original aspect ratio.
max_width = 1280
# JPEG quality, 1 (smallest) to 100 (best).
quality = 80

[network]
# Port used when the address has an unparsable port, e.g. "10.0.0.2:abc".
default_port = 5000
# Set to true to reject such addresses instead.
strict_port = false
# Raw socket payload is written in chunks of this many bytes.
chunk_size = 4096
connect_timeout_secs = 10
write_timeout_secs = 30
# HTTP connect timeout, also the budget for the whole upload request.
http_timeout_secs = 30

[http]
upload_path = "/upload"
field_name = "file"
filename = "foto.jpg"

[logging]
# Overridden by the RUST_LOG environment variable when set.
level = "info"
"##
}
