use std::collections::HashMap;

use primgrad_core::DType;

/// Absolute and relative tolerance of an allclose comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub atol: f64,
    pub rtol: f64,
}

impl Tolerance {
    pub const fn new(atol: f64, rtol: f64) -> Self {
        Tolerance { atol, rtol }
    }
}

/// Per-dtype tolerances, keyed by dtype name (`"float32"`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct ToleranceTable {
    entries: HashMap<String, Tolerance>,
}

impl Default for ToleranceTable {
    fn default() -> Self {
        let entries = [
            (DType::F16, Tolerance::new(1e-3, 1e-3)),
            (DType::F32, Tolerance::new(1e-6, 1e-6)),
            (DType::F64, Tolerance::new(1e-15, 1e-15)),
        ]
        .into_iter()
        .map(|(dtype, tol)| (dtype.name().to_string(), tol))
        .collect();
        ToleranceTable { entries }
    }
}

impl ToleranceTable {
    pub fn get(&self, dtype: DType) -> Option<Tolerance> {
        self.lookup(dtype.name())
    }

    pub fn lookup(&self, dtype_name: &str) -> Option<Tolerance> {
        self.entries.get(dtype_name).copied()
    }

    /// Replaces the tolerance of `dtype`.
    pub fn with(mut self, dtype: DType, tolerance: Tolerance) -> Self {
        self.entries.insert(dtype.name().to_string(), tolerance);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = ToleranceTable::default();
        assert_eq!(table.lookup("float16"), Some(Tolerance::new(1e-3, 1e-3)));
        assert_eq!(table.get(DType::F32), Some(Tolerance::new(1e-6, 1e-6)));
        assert_eq!(table.get(DType::F64), Some(Tolerance::new(1e-15, 1e-15)));
        assert_eq!(table.lookup("bfloat16"), None);
    }

    #[test]
    fn test_override() {
        let table = ToleranceTable::default().with(DType::F32, Tolerance::new(1e-4, 0.0));
        assert_eq!(table.get(DType::F32), Some(Tolerance::new(1e-4, 0.0)));
        assert_eq!(table.get(DType::F64), Some(Tolerance::new(1e-15, 1e-15)));
    }
}
