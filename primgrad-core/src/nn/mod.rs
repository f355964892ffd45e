//! Static-graph network layers.
//!
//! A layer declares its parameters through a `ProgramGuard` when it is
//! constructed and appends its ops on `forward`.

pub mod init;
pub mod layers;
pub mod module;

pub use init::Initializer;
pub use layers::linear::Linear;
pub use module::Layer;
