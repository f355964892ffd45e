use std::fmt;

/// Defines the possible data types for Tensor elements.
///
/// Only floating-point types are supported: every tensor flowing through a
/// gradient program must be differentiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 16-bit IEEE 754 half precision (`half::f16`).
    F16,
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}

impl DType {
    /// Canonical lowercase name (`"float16"`, `"float32"`, `"float64"`).
    pub fn name(&self) -> &'static str {
        match self {
            DType::F16 => "float16",
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }

    /// Size of one element in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            DType::F16 => 2,
            DType::F32 => 4,
            DType::F64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_names() {
        assert_eq!(DType::F16.name(), "float16");
        assert_eq!(DType::F32.to_string(), "float32");
        assert_eq!(DType::F64.size_of(), 8);
    }
}
