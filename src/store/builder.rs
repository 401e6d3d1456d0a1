// src/store/builder.rs
// Store creation - the ingestion seam. Frame entries are created here (or by
// an equivalent upstream ingester); the store itself never creates or deletes
// entries.

use super::FrameStore;
use super::container;
use super::records::{FrameRecord, Root};
use crate::exceptions::Result;
use log::info;
use ndarray::ArrayD;
use std::collections::btree_map::Entry;
use std::path::Path;

/// Accumulates frame entries in memory, then writes a store container
#[derive(Debug, Default)]
pub struct StoreBuilder {
    root: Root,
}

impl StoreBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        StoreBuilder {
            root: Root::default(),
        }
    }

    /// Add a frame entry around an image payload, replacing any frame of the
    /// same name. Returns the record for attribute and prediction seeding.
    pub fn insert_frame(&mut self, name: &str, image: ArrayD<u8>) -> &mut FrameRecord {
        let record = FrameRecord::new(image);
        match self.root.frames.entry(name.to_string()) {
            Entry::Vacant(slot) => slot.insert(record),
            Entry::Occupied(slot) => {
                let existing = slot.into_mut();
                *existing = record;
                existing
            }
        }
    }

    /// Number of frames accumulated so far
    pub fn frame_count(&self) -> usize {
        self.root.frames.len()
    }

    /// Write the container to `path` and open it as a [`FrameStore`]
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<FrameStore> {
        let path = path.as_ref();
        container::commit(path, &self.root)?;
        info!(
            "🎞 Wrote store with {} frames to {}",
            self.root.frames.len(),
            path.display()
        );
        FrameStore::open(path)
    }
}
