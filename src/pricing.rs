//! Pricing and commission.
//!
//! Prices come from an external collaborator, consumed through the
//! [`PricingTable`] trait. [`PriceConfig`] is the collaborator's payload shape
//! and the table used by the CLI and tests.
//!
//! Commission is bimodal and decided once per lookup:
//!
//! ```text
//! commission > 1   -> Percentage: dealer = customer * (1 - commission / 100)
//! commission <= 1  -> Flat:       dealer = customer - count * commission
//! ```

use crate::booking::NumberType;
use crate::error::ConfigError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unit price and raw commission value for one booking type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub unit_price: Decimal,
    pub commission: Decimal,
}

impl Pricing {
    pub fn commission_mode(&self) -> CommissionMode {
        CommissionMode::from_value(self.commission)
    }
}

/// Read-only pricing lookup keyed by booking type.
pub trait PricingTable: Send + Sync {
    fn lookup(&self, number_type: NumberType) -> Option<Pricing>;
}

/// How a commission value applies to an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommissionMode {
    /// Percent of the customer amount (46 means 46%).
    Percentage(Decimal),
    /// Deduction per booked unit.
    Flat(Decimal),
}

impl CommissionMode {
    pub fn from_value(commission: Decimal) -> Self {
        if commission > Decimal::ONE { CommissionMode::Percentage(commission) } else { CommissionMode::Flat(commission) }
    }

    /// Amount left for the dealer after commission, unrounded. `None` when it
    /// does not fit in a `Decimal`.
    pub fn dealer_amount(self, customer_amount: Decimal, count: u32) -> Option<Decimal> {
        match self {
            CommissionMode::Percentage(pct) => {
                let share = Decimal::ONE.checked_sub(pct.checked_div(Decimal::ONE_HUNDRED)?)?;
                customer_amount.checked_mul(share)
            }
            CommissionMode::Flat(per_unit) => customer_amount.checked_sub(Decimal::from(count).checked_mul(per_unit)?),
        }
    }
}

/// Decimal rounding applied to every priced amount (2 dp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Midpoint away from zero (`x.xx5 -> x.xx + 0.01`).
    #[default]
    HalfUp,
    /// Midpoint to nearest even.
    Bankers,
}

impl Rounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Rounding::Bankers => RoundingStrategy::MidpointNearestEven,
        }
    }

    pub fn apply(self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(2, self.strategy())
    }
}

/// Pricing payload as supplied by the pricing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceConfig {
    pub single_digit_number_price: Decimal,
    pub non_single_digit_price: Decimal,
    pub commission: Decimal,
    pub single_digit_number_commission: Decimal,
}

impl PriceConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PriceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject negative prices or commissions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("single_digit_number_price", self.single_digit_number_price),
            ("non_single_digit_price", self.non_single_digit_price),
            ("commission", self.commission),
            ("single_digit_number_commission", self.single_digit_number_commission),
        ];
        for (field, value) in fields {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(ConfigError::Negative { field });
            }
        }
        Ok(())
    }
}

impl PricingTable for PriceConfig {
    fn lookup(&self, number_type: NumberType) -> Option<Pricing> {
        let pricing = match number_type {
            NumberType::SingleDigit => {
                Pricing { unit_price: self.single_digit_number_price, commission: self.single_digit_number_commission }
            }
            NumberType::DoubleDigit | NumberType::TripleDigit => {
                Pricing { unit_price: self.non_single_digit_price, commission: self.commission }
            }
        };
        Some(pricing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn commission_above_one_is_a_percentage() {
        let mode = CommissionMode::from_value(dec!(46));
        assert_eq!(mode, CommissionMode::Percentage(dec!(46)));
        assert_eq!(mode.dealer_amount(dec!(1000), 100).map(|d| Rounding::HalfUp.apply(d)), Some(dec!(540.00)));
    }

    #[test]
    fn commission_up_to_one_is_flat_per_unit() {
        let mode = CommissionMode::from_value(dec!(0.5));
        assert_eq!(mode, CommissionMode::Flat(dec!(0.5)));
        assert_eq!(mode.dealer_amount(dec!(1000), 10).map(|d| Rounding::HalfUp.apply(d)), Some(dec!(995.00)));

        // Exactly one is still flat.
        assert_eq!(CommissionMode::from_value(dec!(1)), CommissionMode::Flat(dec!(1)));
    }

    #[test]
    fn commission_overflow_is_none() {
        assert_eq!(CommissionMode::Flat(Decimal::MAX).dealer_amount(dec!(10), 4_000_000_000), None);
        assert_eq!(CommissionMode::Percentage(Decimal::MAX).dealer_amount(Decimal::MAX, 1), None);
    }

    #[test]
    fn rounding_modes_differ_on_midpoints() {
        assert_eq!(Rounding::HalfUp.apply(dec!(2.345)), dec!(2.35));
        assert_eq!(Rounding::Bankers.apply(dec!(2.345)), dec!(2.34));
        assert_eq!(Rounding::HalfUp.apply(dec!(2.355)), dec!(2.36));
        assert_eq!(Rounding::Bankers.apply(dec!(2.355)), dec!(2.36));
    }

    #[test]
    fn price_config_routes_by_number_type() {
        let config = PriceConfig::from_json_str(
            r#"{"single_digit_number_price": 12, "non_single_digit_price": "10",
                "commission": 46, "single_digit_number_commission": 0.5}"#,
        )
        .unwrap();

        let single = config.lookup(NumberType::SingleDigit).unwrap();
        assert_eq!(single.unit_price, dec!(12));
        assert_eq!(single.commission_mode(), CommissionMode::Flat(dec!(0.5)));

        let triple = config.lookup(NumberType::TripleDigit).unwrap();
        assert_eq!(triple.unit_price, dec!(10));
        assert_eq!(triple.commission_mode(), CommissionMode::Percentage(dec!(46)));
    }

    #[test]
    fn negative_values_are_rejected() {
        let err = PriceConfig::from_json_str(
            r#"{"single_digit_number_price": 12, "non_single_digit_price": 10,
                "commission": -1, "single_digit_number_commission": 0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Negative { field: "commission" }));
    }
}
