//! Cash flow types for instrument analytics.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Date, Frequency};
use crate::error::{FixedIncomeError, FixedIncomeResult};

/// Type of cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashFlowType {
    /// Regular coupon payment
    Coupon,
    /// Principal repayment at maturity
    Principal,
    /// Combined coupon and principal (final payment)
    CouponAndPrincipal,
}

impl fmt::Display for CashFlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CashFlowType::Coupon => "Coupon",
            CashFlowType::Principal => "Principal",
            CashFlowType::CouponAndPrincipal => "Coupon+Principal",
        };
        write!(f, "{name}")
    }
}

/// A dated cash flow.
///
/// `time` is the year fraction from the owning set's reference date, in
/// whatever time measure the schedule generator was asked for. Coupon and
/// principal parts are kept apart so callers can total coupons on their own.
///
/// # Example
///
/// ```rust
/// use fi_core::types::{CashFlow, CashFlowType, Date};
///
/// let cf = CashFlow::coupon(Date::from_ymd(2025, 6, 15).unwrap(), 0.5, 2.50);
/// assert_eq!(cf.amount(), 2.50);
/// assert_eq!(cf.cf_type(), CashFlowType::Coupon);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    date: Date,
    time: f64,
    coupon: f64,
    principal: f64,
    cf_type: CashFlowType,
    accrual_start: Option<Date>,
    accrual_end: Option<Date>,
}

impl CashFlow {
    /// Creates a coupon cash flow.
    #[must_use]
    pub fn coupon(date: Date, time: f64, amount: f64) -> Self {
        Self {
            date,
            time,
            coupon: amount,
            principal: 0.0,
            cf_type: CashFlowType::Coupon,
            accrual_start: None,
            accrual_end: None,
        }
    }

    /// Creates a principal-only cash flow.
    #[must_use]
    pub fn principal(date: Date, time: f64, amount: f64) -> Self {
        Self {
            date,
            time,
            coupon: 0.0,
            principal: amount,
            cf_type: CashFlowType::Principal,
            accrual_start: None,
            accrual_end: None,
        }
    }

    /// Creates a final cash flow (coupon + principal).
    #[must_use]
    pub fn final_payment(date: Date, time: f64, coupon: f64, principal: f64) -> Self {
        Self {
            date,
            time,
            coupon,
            principal,
            cf_type: CashFlowType::CouponAndPrincipal,
            accrual_start: None,
            accrual_end: None,
        }
    }

    /// Attaches the accrual period that produced the coupon.
    #[must_use]
    pub fn with_accrual(mut self, start: Date, end: Date) -> Self {
        self.accrual_start = Some(start);
        self.accrual_end = Some(end);
        self
    }

    /// Payment date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Year fraction from the reference date.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Total amount paid.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.coupon + self.principal
    }

    /// Coupon part of the payment.
    #[must_use]
    pub fn coupon_amount(&self) -> f64 {
        self.coupon
    }

    /// Principal part of the payment.
    #[must_use]
    pub fn principal_amount(&self) -> f64 {
        self.principal
    }

    /// Type of cash flow.
    #[must_use]
    pub fn cf_type(&self) -> CashFlowType {
        self.cf_type
    }

    /// Accrual period start, for coupons.
    #[must_use]
    pub fn accrual_start(&self) -> Option<Date> {
        self.accrual_start
    }

    /// Accrual period end, for coupons.
    #[must_use]
    pub fn accrual_end(&self) -> Option<Date> {
        self.accrual_end
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.6} (t = {:.6})",
            self.date,
            self.cf_type,
            self.amount(),
            self.time
        )
    }
}

/// An ordered, immutable set of cash flows derived from one instrument.
///
/// Dates and times are strictly increasing. `frequency` records the
/// compounding frequency yields on this set are quoted in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowSet {
    reference_date: Date,
    frequency: Frequency,
    flows: Vec<CashFlow>,
}

impl CashflowSet {
    /// Creates a set, validating ordering.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInstrument` if the set is empty, a flow is dated on or
    /// before the reference date, or dates are not strictly increasing.
    pub fn new(
        reference_date: Date,
        frequency: Frequency,
        flows: Vec<CashFlow>,
    ) -> FixedIncomeResult<Self> {
        if flows.is_empty() {
            return Err(FixedIncomeError::invalid_instrument(
                "no cash flows after the reference date",
            ));
        }
        if flows[0].date <= reference_date {
            return Err(FixedIncomeError::invalid_instrument(format!(
                "cash flow on {} is not after reference date {}",
                flows[0].date, reference_date
            )));
        }
        for pair in flows.windows(2) {
            if pair[1].date <= pair[0].date || pair[1].time <= pair[0].time {
                return Err(FixedIncomeError::invalid_instrument(format!(
                    "cash flow dates must be strictly increasing: {} then {}",
                    pair[0].date, pair[1].date
                )));
            }
        }
        Ok(Self {
            reference_date,
            frequency,
            flows,
        })
    }

    /// Date times are measured from.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Quoting frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// The flows, in payment order.
    #[must_use]
    pub fn flows(&self) -> &[CashFlow] {
        &self.flows
    }

    /// Iterates over the flows.
    pub fn iter(&self) -> std::slice::Iter<'_, CashFlow> {
        self.flows.iter()
    }

    /// Number of flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Always false for a validated set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// The last flow, which carries the principal repayment.
    #[must_use]
    pub fn last(&self) -> Option<&CashFlow> {
        self.flows.last()
    }

    /// Sum of undiscounted amounts: the price at a zero yield.
    #[must_use]
    pub fn undiscounted_total(&self) -> f64 {
        self.flows.iter().map(CashFlow::amount).sum()
    }

    /// Sum of coupon parts only.
    #[must_use]
    pub fn coupon_total(&self) -> f64 {
        self.flows.iter().map(CashFlow::coupon_amount).sum()
    }

    /// Time of the final flow.
    #[must_use]
    pub fn final_time(&self) -> f64 {
        self.flows.last().map_or(0.0, CashFlow::time)
    }
}

impl<'a> IntoIterator for &'a CashflowSet {
    type Item = &'a CashFlow;
    type IntoIter = std::slice::Iter<'a, CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.flows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_cashflow_parts() {
        let cf = CashFlow::final_payment(date(2030, 1, 15), 5.0, 2.5, 100.0);
        assert_eq!(cf.amount(), 102.5);
        assert_eq!(cf.coupon_amount(), 2.5);
        assert_eq!(cf.principal_amount(), 100.0);
        assert_eq!(cf.cf_type(), CashFlowType::CouponAndPrincipal);
    }

    #[test]
    fn test_set_totals() {
        let set = CashflowSet::new(
            date(2025, 1, 15),
            Frequency::Annual,
            vec![
                CashFlow::coupon(date(2026, 1, 15), 1.0, 5.0),
                CashFlow::final_payment(date(2027, 1, 15), 2.0, 5.0, 100.0),
            ],
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.undiscounted_total(), 110.0);
        assert_eq!(set.coupon_total(), 10.0);
        assert_eq!(set.final_time(), 2.0);
    }

    #[test]
    fn test_set_rejects_unordered_dates() {
        let result = CashflowSet::new(
            date(2025, 1, 15),
            Frequency::Annual,
            vec![
                CashFlow::coupon(date(2027, 1, 15), 2.0, 5.0),
                CashFlow::coupon(date(2026, 1, 15), 1.0, 5.0),
            ],
        );
        assert!(matches!(
            result,
            Err(FixedIncomeError::InvalidInstrument { .. })
        ));
    }

    #[test]
    fn test_set_rejects_flow_on_reference_date() {
        let result = CashflowSet::new(
            date(2025, 1, 15),
            Frequency::Zero,
            vec![CashFlow::principal(date(2025, 1, 15), 0.0, 100.0)],
        );
        assert!(result.is_err());
        assert!(CashflowSet::new(date(2025, 1, 15), Frequency::Zero, vec![]).is_err());
    }
}
