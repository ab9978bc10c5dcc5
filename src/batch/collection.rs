// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Ordered collection of named batches.

use indexmap::IndexMap;

use crate::errors::BatchError;
use crate::processing::ProcessablePack;

use super::{BatchState, ManualContactSelector};

/// All batches of one processing session, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ProcessingModel {
    batches: IndexMap<String, BatchState>,
}

impl ProcessingModel {
    pub fn new() -> Self {
        ProcessingModel::default()
    }

    /// Add a batch. A batch with the same name is replaced and returned.
    pub fn add_batch(&mut self, batch: BatchState) -> Option<BatchState> {
        self.batches.insert(batch.name().clone(), batch)
    }

    /// Remove a batch keeping the order of the remaining batches.
    pub fn remove_batch(&mut self, name: &str) -> Result<BatchState, BatchError> {
        self.batches
            .shift_remove(name)
            .ok_or_else(|| BatchError::UnknownBatch(name.to_owned()))
    }

    pub fn batch(&self, name: &str) -> Result<&BatchState, BatchError> {
        self.batches
            .get(name)
            .ok_or_else(|| BatchError::UnknownBatch(name.to_owned()))
    }

    pub fn batch_mut(&mut self, name: &str) -> Result<&mut BatchState, BatchError> {
        self.batches
            .get_mut(name)
            .ok_or_else(|| BatchError::UnknownBatch(name.to_owned()))
    }

    pub fn batches(&self) -> impl Iterator<Item = &BatchState> {
        self.batches.values()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Are the settings of every batch completely specified?
    /// False for an empty model.
    pub fn all_settings_specified(&self) -> bool {
        !self.batches.is_empty() && self.batches.values().all(BatchState::is_settings_specified)
    }

    /// Build every batch and concatenate the packs in batch order.
    /// The first batch that fails aborts the construction.
    pub fn build_all<S: ManualContactSelector + ?Sized>(
        &self,
        selector: &mut S,
    ) -> Result<Vec<ProcessablePack>, BatchError> {
        let mut packs = Vec::new();
        for batch in self.batches.values() {
            packs.extend(batch.build_processing_batch(selector)?);
        }

        log::info!(
            "Built {} batch(es) with {} curve(s) in total.",
            self.batches.len(),
            packs.len()
        );

        Ok(packs)
    }
}
