//! High-level API for framedb operations

use crate::exceptions::Result;
use crate::session::{NavigationSession, SessionOptions};
use crate::store::subset::{SET_ALL, SET_REJECTED, SET_TEST, SET_TRAIN, SET_VALID};
use crate::store::{FrameStore, ListOptions};
use serde::Serialize;
use std::path::Path;

/// Per-state frame counts of a store
#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub frame_count: usize,
    pub annotated: usize,
    pub train: usize,
    pub valid: usize,
    pub test: usize,
    pub rejected: usize,
    /// Frames whose subset mask is unset - they match no selection
    pub unset: usize,
}

/// Count frames per annotation and subset state.
///
/// Subset counts use bitmask membership, so a frame tagged into several
/// splits is counted in each.
pub fn summarize_store<P: AsRef<Path>>(path: P) -> Result<StoreSummary> {
    let store = FrameStore::open(path)?;
    let count = |options: &ListOptions| -> Result<usize> {
        Ok(store.list_frame_names(options)?.len())
    };
    let members = |selection: u32| -> ListOptions {
        ListOptions {
            include_rejected: true,
            in_subset: Some(selection),
            ..Default::default()
        }
    };

    let frame_count = count(&ListOptions {
        include_rejected: true,
        ..Default::default()
    })?;
    let in_any = count(&members(SET_ALL))?;

    Ok(StoreSummary {
        frame_count,
        annotated: count(&ListOptions {
            annotated: Some(true),
            include_rejected: true,
            ..Default::default()
        })?,
        train: count(&members(SET_TRAIN))?,
        valid: count(&members(SET_VALID))?,
        test: count(&members(SET_TEST))?,
        rejected: count(&members(SET_REJECTED))?,
        unset: frame_count - in_any,
    })
}

/// Open a store and start a labeling session over it
pub fn begin_session<P: AsRef<Path>>(path: P, options: SessionOptions) -> Result<NavigationSession> {
    let store = FrameStore::open(path)?;
    NavigationSession::begin(store, options)
}
