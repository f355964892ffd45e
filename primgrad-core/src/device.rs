use std::fmt;

use log::warn;

/// Represents the physical location where tensor data is stored and where
/// an executor runs its kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageDevice {
    /// Main system memory. The only device with kernels.
    #[default]
    CPU,
    /// A CUDA device. Declared so programs can target it, but the executor
    /// refuses to run on it.
    GPU,
}

impl StorageDevice {
    /// Parses `"cpu"` / `"gpu"` (case-insensitive, `"gpu:N"` accepted).
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "cpu" => Some(StorageDevice::CPU),
            s if s == "gpu" || s.starts_with("gpu:") => Some(StorageDevice::GPU),
            _ => None,
        }
    }
}

impl fmt::Display for StorageDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageDevice::CPU => f.write_str("cpu"),
            StorageDevice::GPU => f.write_str("gpu:0"),
        }
    }
}

/// Environment variable selecting the default device.
pub const DEVICE_ENV_VAR: &str = "PRIMGRAD_DEVICE";

/// Returns the device executors use by default.
///
/// Reads `PRIMGRAD_DEVICE`; unset or unrecognized values fall back to CPU.
pub fn current_device() -> StorageDevice {
    match std::env::var(DEVICE_ENV_VAR) {
        Ok(value) => StorageDevice::parse(&value).unwrap_or_else(|| {
            warn!("Ignoring unrecognized {}={:?}, using cpu", DEVICE_ENV_VAR, value);
            StorageDevice::CPU
        }),
        Err(_) => StorageDevice::CPU,
    }
}
