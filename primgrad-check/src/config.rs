use log::warn;

use primgrad_core::{current_device, DType, StorageDevice};

use crate::tolerance::ToleranceTable;

/// Environment variable overriding the case-data seed.
pub const SEED_ENV_VAR: &str = "PRIMGRAD_SEED";

pub const DEFAULT_SEED: u64 = 2023;

/// Settings shared by every comparison of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Seed for case data and for the startup programs of parameterized scenarios.
    pub seed: u64,
    pub device: StorageDevice,
    pub tolerances: ToleranceTable,
    /// Device/dtype combinations that are skipped instead of compared.
    pub unsupported: Vec<(StorageDevice, DType)>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            seed: DEFAULT_SEED,
            device: StorageDevice::CPU,
            tolerances: ToleranceTable::default(),
            unsupported: vec![(StorageDevice::CPU, DType::F16)],
        }
    }
}

impl HarnessConfig {
    /// Defaults, with the seed from `PRIMGRAD_SEED` and the device from
    /// `current_device()`. Unparsable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = HarnessConfig {
            device: current_device(),
            ..HarnessConfig::default()
        };
        if let Ok(raw) = std::env::var(SEED_ENV_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = seed,
                Err(_) => warn!("ignoring {}={:?}: not an unsigned integer", SEED_ENV_VAR, raw),
            }
        }
        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_device(mut self, device: StorageDevice) -> Self {
        self.device = device;
        self
    }

    pub fn with_tolerances(mut self, tolerances: ToleranceTable) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn with_unsupported(mut self, unsupported: Vec<(StorageDevice, DType)>) -> Self {
        self.unsupported = unsupported;
        self
    }

    /// Whether `dtype` on the configured device is skipped.
    pub fn is_unsupported(&self, dtype: DType) -> bool {
        self.unsupported.contains(&(self.device, dtype))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primgrad_core::ops::has_kernel;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.device, StorageDevice::CPU);
        assert!(config.is_unsupported(DType::F16));
        assert!(!config.is_unsupported(DType::F32));
    }

    #[test]
    fn test_default_skips_match_missing_kernels() {
        let config = HarnessConfig::default();
        for dtype in [DType::F16, DType::F32, DType::F64] {
            let missing = !has_kernel("cumsum_grad", dtype, StorageDevice::CPU);
            assert_eq!(config.is_unsupported(dtype), missing, "{}", dtype);
        }
    }

    #[test]
    fn test_builders() {
        let config = HarnessConfig::default()
            .with_seed(5)
            .with_device(StorageDevice::GPU)
            .with_unsupported(Vec::new());
        assert_eq!(config.seed, 5);
        assert_eq!(config.device, StorageDevice::GPU);
        assert!(!config.is_unsupported(DType::F16));
    }
}
