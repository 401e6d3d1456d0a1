//! Hierarchical, file-backed frame store.
//!
//! Every operation opens the backing container, performs exactly one logical
//! read or write, and closes it - there is no in-memory cache and no held
//! handle, so the on-disk state is externally consistent between calls.
//! Single active writer is assumed, not enforced.

pub mod bbox;
pub mod builder;
pub mod constants;
pub mod container;
pub mod export;
pub mod records;
pub mod subset;

use bbox::CenterBox;
use log::{debug, info};
use ndarray::ArrayD;
use records::{AttrValue, FrameRecord, Prediction, Root};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use subset::{SET_REJECTED, in_selection};

use crate::exceptions::{Result, StoreError};

/// Filters for [`FrameStore::list_frame_names`]
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// `Some(true)` lists only annotated frames, `Some(false)` only
    /// unannotated ones, `None` both
    pub annotated: Option<bool>,
    /// Include frames whose subset is exactly [`SET_REJECTED`]
    pub include_rejected: bool,
    /// Sort ascending by the `time` attribute instead of by name
    pub sort_by_time: bool,
    /// Keep only frames whose subset intersects this selection mask
    pub in_subset: Option<u32>,
}

/// Handle on a store container file
#[derive(Debug, Clone)]
pub struct FrameStore {
    path: PathBuf,
}

impl FrameStore {
    /// Open an existing store.
    ///
    /// Fails with `StoreUnavailable` if `path` is not an existing file; use
    /// [`builder::StoreBuilder`] to create one.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(StoreError::StoreUnavailable(format!(
                "the specified file {} does not exist",
                path.display()
            )));
        }
        info!("Opened frame store: {}", path.display());
        Ok(FrameStore { path })
    }

    /// Path of the backing container file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn load(&self) -> Result<Root> {
        container::load(&self.path)
    }

    fn update<F>(&self, name: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut FrameRecord),
    {
        let mut root = self.load()?;
        let frame = root
            .frames
            .get_mut(name)
            .ok_or_else(|| StoreError::FrameNotFound(name.to_string()))?;
        mutate(frame);
        container::commit(&self.path, &root)
    }

    /// List frame names matching `options`.
    ///
    /// Rejection filtering is an exact match on the subset mask, not a bit
    /// test: a frame tagged `SET_REJECTED | SET_TRAIN` still lists. Unsorted
    /// results come back in name order; `sort_by_time` orders ascending by
    /// the `time` attribute with frames lacking one after all frames that
    /// have one, ties stable by name.
    pub fn list_frame_names(&self, options: &ListOptions) -> Result<Vec<String>> {
        let root = self.load()?;
        let mut selected: Vec<(&String, &FrameRecord)> = root
            .frames
            .iter()
            .filter(|(_, frame)| {
                if !options.include_rejected && frame.subset() == SET_REJECTED {
                    return false;
                }
                if let Some(selection) = options.in_subset {
                    if !in_selection(frame.subset(), selection) {
                        return false;
                    }
                }
                if let Some(want) = options.annotated {
                    if frame.annotation.is_some() != want {
                        return false;
                    }
                }
                true
            })
            .collect();

        if options.sort_by_time {
            selected.sort_by(|(name_a, a), (name_b, b)| match (a.time(), b.time()) {
                (Some(ta), Some(tb)) => ta.total_cmp(&tb).then_with(|| name_a.cmp(name_b)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => name_a.cmp(name_b),
            });
        }

        debug!(
            "Listed {} of {} frames ({:?})",
            selected.len(),
            root.frames.len(),
            options
        );
        Ok(selected.into_iter().map(|(name, _)| name.clone()).collect())
    }

    /// Read the image payload of a frame
    pub fn frame_image(&self, name: &str) -> Result<ArrayD<u8>> {
        let mut root = self.load()?;
        root.frames
            .remove(name)
            .map(|frame| frame.image)
            .ok_or_else(|| StoreError::FrameNotFound(name.to_string()))
    }

    /// Write the ground-truth box for a frame, center form.
    ///
    /// Idempotent: the first write creates the annotation slot, any later
    /// write replaces it. Re-annotation after undo relies on this.
    pub fn add_annotation(&self, name: &str, bbox: CenterBox) -> Result<()> {
        debug!("Annotating {name}: {bbox:?}");
        self.update(name, |frame| frame.annotation = Some(bbox))
    }

    /// Read the ground-truth box of a frame.
    ///
    /// `AnnotationNotFound` means the frame exists but was never annotated,
    /// distinct from `FrameNotFound`.
    pub fn annotation(&self, name: &str) -> Result<CenterBox> {
        let root = self.load()?;
        let frame = root
            .frames
            .get(name)
            .ok_or_else(|| StoreError::FrameNotFound(name.to_string()))?;
        frame
            .annotation
            .ok_or_else(|| StoreError::AnnotationNotFound(name.to_string()))
    }

    /// Model-attributed boxes of a frame, in insertion order
    pub fn predictions(&self, name: &str) -> Result<Vec<(String, CenterBox)>> {
        let root = self.load()?;
        let frame = root
            .frames
            .get(name)
            .ok_or_else(|| StoreError::FrameNotFound(name.to_string()))?;
        Ok(frame
            .predictions
            .iter()
            .map(|p| (p.model.clone(), p.bbox))
            .collect())
    }

    /// Record a model's predicted box for a frame.
    ///
    /// Write seam for the external inference collaborator. An existing entry
    /// for the same model is replaced in place, keeping its position.
    pub fn add_prediction(&self, name: &str, model: &str, bbox: CenterBox) -> Result<()> {
        self.update(name, |frame| {
            if let Some(existing) = frame.predictions.iter_mut().find(|p| p.model == model) {
                existing.bbox = bbox;
            } else {
                frame.predictions.push(Prediction {
                    model: model.to_string(),
                    bbox,
                });
            }
        })
    }

    /// Set a scalar attribute on a frame, overwriting any previous value
    pub fn set_frame_attr(&self, name: &str, key: &str, value: AttrValue) -> Result<()> {
        self.update(name, |frame| {
            frame.set_attr(key, value);
        })
    }

    /// Assign the subset mask of a frame.
    ///
    /// Overwrites the entire mask. Callers wanting additive tagging must
    /// read-modify-write themselves.
    pub fn assign_subset(&self, name: &str, mask: u32) -> Result<()> {
        self.set_frame_attr(name, constants::ATTR_SUBSET, AttrValue::Int(i64::from(mask)))
    }
}
