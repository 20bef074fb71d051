//! Booking Ledger: the entries of the bill being built.
//!
//! Display order is newest first. Totals are derived from the current entries
//! on every read and never stored.

use crate::booking::{BookingEntry, SubType, SubmissionItem};
use crate::entry::EntryFactory;
use crate::error::RejectionReason;
use rust_decimal::Decimal;

/// Sums over the ledger's current entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    pub count: u64,
    pub dealer_amount: Decimal,
    pub customer_amount: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    entries: Vec<BookingEntry>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BookingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put a batch in front of the existing entries, keeping the batch's own order.
    pub fn append(&mut self, batch: Vec<BookingEntry>) {
        if batch.is_empty() {
            return;
        }
        self.entries.splice(0..0, batch);
    }

    /// Re-validate and re-price the entry at `index` from new inputs.
    ///
    /// The number type follows the (possibly changed) number. On rejection the
    /// entry is left untouched.
    pub fn edit(
        &mut self,
        factory: &EntryFactory,
        index: usize,
        number: &str,
        count: u32,
        sub_type: SubType,
    ) -> Result<&BookingEntry, RejectionReason> {
        // Price first so a rejected edit cannot leave a half-updated entry.
        let entry = factory.create(number, count, sub_type)?;
        let Some(slot) = self.entries.get_mut(index) else {
            return Err(RejectionReason::NoSuchEntry(index));
        };
        *slot = entry;
        Ok(slot)
    }

    pub fn remove(&mut self, index: usize) -> Option<BookingEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Fails with [`RejectionReason::AmountOverflow`] when a sum does not fit
    /// in a `Decimal`.
    pub fn totals(&self) -> Result<LedgerTotals, RejectionReason> {
        self.entries.iter().try_fold(LedgerTotals::default(), |acc, e| {
            Ok(LedgerTotals {
                count: acc.count + u64::from(e.count()),
                dealer_amount: acc.dealer_amount.checked_add(e.dealer_amount()).ok_or(RejectionReason::AmountOverflow)?,
                customer_amount: acc
                    .customer_amount
                    .checked_add(e.customer_amount())
                    .ok_or(RejectionReason::AmountOverflow)?,
            })
        })
    }

    pub fn submission(&self) -> Vec<SubmissionItem> {
        self.entries.iter().map(BookingEntry::to_submission).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
