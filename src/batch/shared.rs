// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Batch state shared between threads.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::BatchError;
use crate::processing::ProcessablePack;

use super::{BatchState, ManualContactSelector, StateChange};

/// Batch state guarded by a mutex.
/// Every mutation and the batch construction hold the lock for their whole duration.
#[derive(Debug, Clone)]
pub struct SharedBatch(Arc<Mutex<BatchState>>);

impl SharedBatch {
    pub fn new(state: BatchState) -> Self {
        SharedBatch(Arc::new(Mutex::new(state)))
    }

    /// Apply a setter of the batch state.
    pub fn modify(&self, change: impl FnOnce(&mut BatchState) -> Vec<StateChange>) -> Vec<StateChange> {
        let mut guard = self.0.lock();
        change(&mut guard)
    }

    /// Read the batch state.
    pub fn read<T>(&self, reader: impl FnOnce(&BatchState) -> T) -> T {
        let guard = self.0.lock();
        reader(&guard)
    }

    pub fn build_processing_batch<S: ManualContactSelector + ?Sized>(
        &self,
        selector: &mut S,
    ) -> Result<Vec<ProcessablePack>, BatchError> {
        self.0.lock().build_processing_batch(selector)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> BatchState {
        self.0.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::curve::{Curve, SpectroscopySource};
    use crate::input::{IndentationModel, ProcessingDefaults, TipShapeParameter};

    #[test]
    fn concurrent_mutations() {
        let mut state = BatchState::new("shared", &ProcessingDefaults::default());
        state.set_indentation_model(IndentationModel::Cone);
        state.set_tip_parameter(TipShapeParameter::HalfAngle, 20.0);
        let shared = SharedBatch::new(state);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let source = SpectroscopySource::new()
                        .identifier(format!("curve_{}", i))
                        .approach(Curve::from_xy(&[0.0, 1.0], &[0.0, 1.0]))
                        .spring_constant(0.1)
                        .sensitivity(50.0)
                        .build()
                        .unwrap();
                    shared.modify(|s| s.add_sources([Arc::new(source)]));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.read(|s| s.sources().len()), 8);
        assert!(shared.read(|s| s.is_settings_specified()));

        let packs = shared
            .build_processing_batch(&mut |p: Vec<ProcessablePack>| -> Vec<ProcessablePack> { p })
            .unwrap();
        assert_eq!(packs.len(), 8);
        assert_eq!(shared.snapshot().name(), "shared");
    }
}
