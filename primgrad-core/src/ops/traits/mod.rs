pub mod numeric;

pub use numeric::PrimNumeric;
