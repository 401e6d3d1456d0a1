// src/store/export.rs
// JSON label export for downstream training consumers

use super::FrameStore;
use super::subset::SET_REJECTED;
use crate::exceptions::Result;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// One exported label row
#[derive(Debug, Serialize)]
pub struct LabeledFrame {
    pub name: String,
    pub subset: u32,
    /// Normalized center-form box `[cx, cy, w, h]`
    pub bbox: [f64; 4],
}

/// Export all annotated, non-rejected frames as a JSON array.
///
/// One logical read: the export reflects a single consistent snapshot of the
/// store. Returns the number of rows written.
pub fn export_labels(store: &FrameStore, output: &Path) -> Result<usize> {
    let root = store.load()?;
    let rows: Vec<LabeledFrame> = root
        .frames
        .iter()
        .filter(|(_, frame)| frame.subset() != SET_REJECTED)
        .filter_map(|(name, frame)| {
            frame.annotation.map(|bbox| LabeledFrame {
                name: name.clone(),
                subset: frame.subset(),
                bbox: [bbox.cx, bbox.cy, bbox.w, bbox.h],
            })
        })
        .collect();

    serde_json::to_writer_pretty(File::create(output)?, &rows)?;
    info!("📤 Exported {} labeled frames to {}", rows.len(), output.display());
    Ok(rows.len())
}
