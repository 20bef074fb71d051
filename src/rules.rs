//! Free-text rule sets.

pub(crate) mod booking;
pub(crate) mod metadata;
