//! Market quotes used as bootstrap inputs.

use serde::{Deserialize, Serialize};

use fi_bonds::cashflows::{CashflowSchedule, TimeMeasure};
use fi_bonds::instruments::Instrument;
use fi_core::daycounts::DayCountConvention;
use fi_core::error::{FixedIncomeError, FixedIncomeResult};
use fi_core::types::{CashflowSet, Date};

/// An instrument paired with its observed (dirty) market price.
///
/// # Example
///
/// ```rust
/// use fi_bonds::Instrument;
/// use fi_core::prelude::*;
/// use fi_curves::MarketQuote;
///
/// let deposit = Instrument::deposit(
///     100.0,
///     0.04,
///     Date::from_ymd(2025, 1, 2).unwrap(),
///     Date::from_ymd(2025, 7, 2).unwrap(),
///     DayCountConvention::Act360,
/// )
/// .unwrap();
///
/// let quote = MarketQuote::at_par(deposit);
/// assert_eq!(quote.price(), 100.0);
/// assert!(MarketQuote::new(quote.instrument().clone(), -1.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuoteFields", into = "QuoteFields")]
pub struct MarketQuote {
    instrument: Instrument,
    price: f64,
}

impl MarketQuote {
    /// Pairs an instrument with a price.
    ///
    /// # Errors
    ///
    /// `InvalidTargetPrice` unless the price is finite and positive.
    pub fn new(instrument: Instrument, price: f64) -> FixedIncomeResult<Self> {
        if !price.is_finite() || price <= 0.0 {
            return Err(FixedIncomeError::invalid_target_price(price, f64::INFINITY));
        }
        Ok(Self { instrument, price })
    }

    /// Quote at the instrument's face value: deposits and par swaps quoted by
    /// their rate.
    #[must_use]
    pub fn at_par(instrument: Instrument) -> Self {
        let price = instrument.face_value();
        Self { instrument, price }
    }

    /// The quoted instrument.
    #[must_use]
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Observed price.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Maturity of the quoted instrument.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.instrument.maturity()
    }

    /// Cash flows after `valuation_date`, with times under `basis`.
    pub fn cashflows(
        &self,
        valuation_date: Date,
        basis: DayCountConvention,
        schedule: &CashflowSchedule,
    ) -> FixedIncomeResult<CashflowSet> {
        schedule.generate_as_of(&self.instrument, valuation_date, TimeMeasure::DayCount(basis))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuoteFields {
    instrument: Instrument,
    price: f64,
}

impl TryFrom<QuoteFields> for MarketQuote {
    type Error = FixedIncomeError;

    fn try_from(fields: QuoteFields) -> Result<Self, Self::Error> {
        Self::new(fields.instrument, fields.price)
    }
}

impl From<MarketQuote> for QuoteFields {
    fn from(quote: MarketQuote) -> Self {
        Self {
            instrument: quote.instrument,
            price: quote.price,
        }
    }
}
