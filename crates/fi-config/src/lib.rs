//! # FI Config
//!
//! Configuration for the fixed income workspace.
//!
//! [`AnalyticsConfig`] groups three sections with serde defaults for every
//! field:
//!
//! - **`pricing`**: solver tolerance, iteration cap, negative yields, front
//!   stub tolerance
//! - **`curve`**: interpolation, extrapolation, negative forwards, gap policy,
//!   time basis, repricing tolerance, refinement passes
//! - **`risk`**: finite-difference bump and convexity agreement tolerance
//!
//! Documents load from TOML or JSON, are validated on load, and convert
//! into the component types ([`fi_bonds::YieldSolver`],
//! [`fi_curves::BootstrapConfig`], [`fi_analytics::RiskCalculator`]).
//!
//! # Example
//!
//! ```rust
//! use fi_config::{AnalyticsConfig, Validate};
//!
//! let config = AnalyticsConfig::from_json_str(
//!     r#"{ "pricing": { "allow_negative_yields": true } }"#,
//! )
//! .unwrap();
//!
//! assert!(config.is_valid());
//! assert!(config.yield_solver().allows_negative_yields());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod analytics;
pub mod curve;
pub mod error;
pub mod loader;
pub mod pricing;
pub mod risk;

pub use analytics::AnalyticsConfig;
pub use curve::CurveConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use loader::ConfigFormat;
pub use pricing::PricingConfig;
pub use risk::RiskConfig;
