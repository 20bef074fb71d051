//! Entry Factory: the only place a [`BookingEntry`] is built.

use crate::booking::{BookingEntry, NumberType, SubType};
use crate::error::RejectionReason;
use crate::pricing::{PricingTable, Rounding};
use std::sync::Arc;

/// Minimum count for a single digit booking.
pub const SINGLE_DIGIT_MIN_COUNT: u32 = 5;

/// Builds priced entries from `(number, count, sub-type, number type)`.
#[derive(Clone)]
pub struct EntryFactory {
    pricing: Arc<dyn PricingTable>,
    rounding: Rounding,
}

impl std::fmt::Debug for EntryFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryFactory").field("pricing", &"<table>").field("rounding", &self.rounding).finish()
    }
}

impl EntryFactory {
    pub fn new(pricing: Arc<dyn PricingTable>, rounding: Rounding) -> Self {
        Self { pricing, rounding }
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Validate and price one entry.
    ///
    /// Checks run in a fixed order so the first reported reason is stable:
    /// digits, length, count, single digit minimum, BOX length, sub-type fit.
    pub fn create_entry(
        &self,
        number: &str,
        count: u32,
        sub_type: SubType,
        number_type: NumberType,
    ) -> Result<BookingEntry, RejectionReason> {
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RejectionReason::NotDigits(number.to_string()));
        }
        if number.len() != number_type.digits() {
            return Err(RejectionReason::LengthMismatch {
                number: number.to_string(),
                len: number.len(),
                expected: number_type.digits(),
            });
        }
        if count == 0 {
            return Err(RejectionReason::ZeroCount);
        }
        if number_type == NumberType::SingleDigit && count < SINGLE_DIGIT_MIN_COUNT {
            return Err(RejectionReason::SingleDigitMinimum { count, minimum: SINGLE_DIGIT_MIN_COUNT });
        }
        if sub_type == SubType::Box && number.len() != 3 {
            return Err(RejectionReason::BoxRequiresThreeDigits(number.to_string()));
        }
        if !sub_type.is_concrete() {
            return Err(RejectionReason::MetaSubType(sub_type));
        }
        if !sub_type.fits(number_type) {
            return Err(RejectionReason::SubTypeMismatch { sub_type, number_type });
        }

        let pricing = self.pricing.lookup(number_type).ok_or(RejectionReason::PricingUnavailable(number_type))?;
        let customer_amount = pricing
            .unit_price
            .checked_mul(rust_decimal::Decimal::from(count))
            .map(|amount| self.rounding.apply(amount))
            .ok_or(RejectionReason::AmountOverflow)?;
        let dealer_amount = pricing
            .commission_mode()
            .dealer_amount(customer_amount, count)
            .map(|amount| self.rounding.apply(amount))
            .ok_or(RejectionReason::AmountOverflow)?;

        Ok(BookingEntry {
            // Digits-only with the right length; padding is a no-op guard for
            // callers that trimmed leading zeros before classifying.
            number: format!("{:0>width$}", number, width = number_type.digits()),
            count,
            sub_type,
            number_type,
            unit_price: pricing.unit_price,
            dealer_amount,
            customer_amount,
        })
    }

    /// Same as [`create_entry`](Self::create_entry) with the number type
    /// inferred from the number's length.
    pub fn create(&self, number: &str, count: u32, sub_type: SubType) -> Result<BookingEntry, RejectionReason> {
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RejectionReason::NotDigits(number.to_string()));
        }
        let number_type =
            NumberType::from_len(number.len()).ok_or_else(|| RejectionReason::UnsupportedLength(number.to_string()))?;
        self.create_entry(number, count, sub_type, number_type)
    }
}
