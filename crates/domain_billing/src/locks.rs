//! Per-work-order advisory locks
//!
//! Two runs assessing the same work order at once could both create a sales
//! order and a claim. Within one process, a run must hold the work order's
//! lock; a second run fails fast instead of waiting. The lock is released
//! when the guard drops, including on error paths.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use core_kernel::{AttemptId, WorkOrderId};

use crate::error::BillingError;

/// Set of work orders currently being assessed
#[derive(Debug, Clone, Default)]
pub struct WorkOrderLocks(Arc<DashMap<WorkOrderId, AttemptId>>);

impl WorkOrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lock for `work_order_id` on behalf of `attempt_id`
    ///
    /// # Errors
    ///
    /// `BillingError::AssessmentInProgress` if another attempt holds it.
    pub fn try_acquire(
        &self,
        work_order_id: WorkOrderId,
        attempt_id: AttemptId,
    ) -> Result<WorkOrderGuard, BillingError> {
        match self.0.entry(work_order_id) {
            Entry::Occupied(held) => {
                debug!(%work_order_id, holder = %held.get(), "Work order lock busy");
                Err(BillingError::AssessmentInProgress(work_order_id))
            }
            Entry::Vacant(slot) => {
                slot.insert(attempt_id);
                Ok(WorkOrderGuard {
                    locks: self.0.clone(),
                    work_order_id,
                    attempt_id,
                })
            }
        }
    }

    pub fn is_locked(&self, work_order_id: WorkOrderId) -> bool {
        self.0.contains_key(&work_order_id)
    }

    /// Number of work orders currently locked
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Holds a work order's lock until dropped
#[derive(Debug)]
pub struct WorkOrderGuard {
    locks: Arc<DashMap<WorkOrderId, AttemptId>>,
    work_order_id: WorkOrderId,
    attempt_id: AttemptId,
}

impl WorkOrderGuard {
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }
}

impl Drop for WorkOrderGuard {
    fn drop(&mut self) {
        // only release our own hold
        self.locks
            .remove_if(&self.work_order_id, |_, holder| *holder == self.attempt_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_guard_drops() {
        let locks = WorkOrderLocks::new();
        let work_order = WorkOrderId::new();

        let guard = locks.try_acquire(work_order, AttemptId::new()).unwrap();
        assert!(locks.is_locked(work_order));

        let err = locks.try_acquire(work_order, AttemptId::new()).unwrap_err();
        assert!(matches!(err, BillingError::AssessmentInProgress(id) if id == work_order));

        drop(guard);
        assert!(!locks.is_locked(work_order));
        assert!(locks.try_acquire(work_order, AttemptId::new()).is_ok());
    }

    #[test]
    fn test_different_work_orders_do_not_contend() {
        let locks = WorkOrderLocks::new();
        let _a = locks.try_acquire(WorkOrderId::new(), AttemptId::new()).unwrap();
        let _b = locks.try_acquire(WorkOrderId::new(), AttemptId::new()).unwrap();
        assert_eq!(locks.len(), 2);
    }
}
