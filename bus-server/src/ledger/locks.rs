//! Per-(bus, journey date) lock table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tokio::sync::Mutex as AsyncMutex;

use crate::domain::BusId;

/// Key of one seat-slot pool: every seat of one bus on one journey date.
pub(crate) type SlotKey = (BusId, NaiveDate);

/// Partitioned lock table serializing bookings per seat-slot pool.
///
/// Bookings for different pools never contend; bookings for the same pool
/// queue on one async mutex. The outer std mutex only guards the map and is
/// never held across an await.
// TODO: prune entries for journey dates in the past; the table currently
// grows by one entry per (bus, date) ever booked.
pub(crate) struct SlotLocks {
    inner: Mutex<HashMap<SlotKey, Arc<AsyncMutex<()>>>>,
}

impl SlotLocks {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// The lock guarding one seat-slot pool, created on first use.
    pub(crate) fn for_slot(&self, key: &SlotKey) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().expect("slot lock table poisoned");
        map.entry(key.clone()).or_default().clone()
    }
}
