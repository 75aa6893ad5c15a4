//! Solver worklist
//!
//! Entries are (pointer, objects to merge). The discipline only changes the
//! order of discovery; the fixpoint is the same either way.

use crate::config::WorklistOrder;
use crate::features::points_to::domain::{PointerId, PointsToSet};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct WorkList {
    entries: VecDeque<(PointerId, PointsToSet)>,
    order: WorklistOrder,
}

impl WorkList {
    pub fn new(order: WorklistOrder) -> Self {
        Self {
            entries: VecDeque::new(),
            order,
        }
    }

    #[inline]
    pub fn push(&mut self, pointer: PointerId, pts: PointsToSet) {
        self.entries.push_back((pointer, pts));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<(PointerId, PointsToSet)> {
        match self.order {
            WorklistOrder::Fifo => self.entries.pop_front(),
            WorklistOrder::Lifo => self.entries.pop_back(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
