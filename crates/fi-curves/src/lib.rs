//! # FI Curves
//!
//! Zero-coupon discount curves for the fixed income workspace.
//!
//! - **[`DiscountCurve`]**: pillar discount factors with linear, log-linear
//!   or monotone-cubic-on-zero interpolation, flat-forward or flat-zero
//!   extrapolation, and user supplied [`CurveInterpolator`]s
//! - **[`MarketQuote`]**: an instrument paired with its observed price
//! - **[`CurveBootstrapper`]**: sequential pillar-by-pillar bootstrap with a
//!   repricing report
//! - **Matrix bootstrap**: discount factors straight from a square payoff
//!   matrix
//!
//! ## Example
//!
//! ```rust
//! use fi_bonds::Instrument;
//! use fi_core::prelude::*;
//! use fi_curves::prelude::*;
//!
//! let today = Date::from_ymd(2025, 1, 2).unwrap();
//! let quotes = vec![
//!     MarketQuote::new(
//!         Instrument::zero_coupon(100.0, today, Date::from_ymd(2026, 1, 2).unwrap(), DayCountConvention::Act365Fixed).unwrap(),
//!         96.0,
//!     )
//!     .unwrap(),
//!     MarketQuote::at_par(
//!         Instrument::par_swap(100.0, 0.045, Frequency::Annual, today, Date::from_ymd(2027, 1, 2).unwrap(), DayCountConvention::Act365Fixed).unwrap(),
//!     ),
//! ];
//!
//! let curve = CurveBootstrapper::new(today).bootstrap(&quotes).unwrap();
//! assert!((curve.discount_factor(1.0).unwrap() - 0.96).abs() < 1e-12);
//! assert!(curve.discount_factor(1.5).unwrap() < 0.96);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]

pub mod bootstrap;
pub mod curve;
pub mod interpolation;
pub mod quotes;
pub mod repricing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{
        matrix_bootstrap, spot_yields, BootstrapConfig, BootstrapResult, CurveBootstrapper,
        GapPolicy, MatrixBootstrap,
    };
    pub use crate::curve::{CurveOptions, DiscountCurve};
    pub use crate::interpolation::{CurveInterpolator, ExtrapolationMethod, InterpolationMethod};
    pub use crate::quotes::MarketQuote;
    pub use crate::repricing::{RepricingCheck, RepricingReport};
}

pub use bootstrap::{BootstrapConfig, CurveBootstrapper, GapPolicy};
pub use curve::{CurveOptions, DiscountCurve};
pub use interpolation::{CurveInterpolator, ExtrapolationMethod, InterpolationMethod};
pub use quotes::MarketQuote;
