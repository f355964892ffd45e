//! # primgrad-check
//!
//! A differential harness for reverse-mode gradients.
//!
//! Each [`Scenario`] builds the same gradient computation twice, once with
//! composite (prim) backward rules and once with the monolithic gradient
//! kernels, runs both on identical inputs and requires the results to agree
//! within the tolerance of their dtype.
//!
//! ```no_run
//! use primgrad_check::{compare, CumsumScenario, GradCase, HarnessConfig};
//! use primgrad_core::DType;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let config = HarnessConfig::from_env();
//! let mut rng = StdRng::seed_from_u64(config.seed);
//! let case = GradCase::random(&[10, 10, 10], DType::F32, &mut rng).unwrap();
//! let outcome = compare(&config, &CumsumScenario::new(-1), &case).unwrap();
//! assert!(outcome.is_passed());
//! ```

pub mod allclose;
pub mod case;
pub mod config;
pub mod error;
pub mod harness;
pub mod prime_net;
pub mod report;
pub mod tolerance;

pub use allclose::assert_allclose;
pub use case::GradCase;
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use harness::{compare, CumsumScenario, Scenario};
pub use prime_net::{PrimeNet, PrimeNetScenario};
pub use report::{ComparisonReport, DiffStats, MismatchReport, Outcome};
pub use tolerance::{Tolerance, ToleranceTable};
