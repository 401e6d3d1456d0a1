//! Cursor-driven labeling session over a filtered, ordered frame list.
//!
//! The session snapshots the store's listing once at start, then translates
//! decoded workflow intents (confirm, mark-bad, skip, undo) into store calls
//! and cursor motion. Exhaustion is checked before any dereference of the
//! name list, and a session that has passed its last frame performs no
//! further store access.

use crate::exceptions::{Result, StoreError};
use crate::store::bbox::{CenterBox, CornerBox, Surface};
use crate::store::subset::SET_REJECTED;
use crate::store::{FrameStore, ListOptions};
use log::{debug, info};
use ndarray::ArrayD;

/// Options for starting a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Listing filter used for the session's frame snapshot
    pub list: ListOptions,
    /// Display dimensions; boxes are normalized against these at write time
    pub surface: Surface,
    /// Populate annotation and prediction overlays in every returned view
    /// (inspection workflows)
    pub overlays: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            list: ListOptions::default(),
            surface: Surface::new(1024, 1024),
            overlays: false,
        }
    }
}

/// Everything the rendering collaborator needs to show one frame
#[derive(Debug)]
pub struct FrameView {
    pub name: String,
    /// Zero-based position in the session's frame list
    pub index: usize,
    pub total: usize,
    pub image: ArrayD<u8>,
    /// Existing ground-truth box; `None` when the frame has none (overlay
    /// mode only)
    pub annotation: Option<CenterBox>,
    /// Model-attributed boxes, insertion order (overlay mode only)
    pub predictions: Vec<(String, CenterBox)>,
}

/// Outcome of a navigation intent
#[derive(Debug)]
pub enum Progress {
    /// The frame now under the cursor
    Current(FrameView),
    /// Cursor has passed the last frame; the session is complete
    Exhausted,
}

/// Linear labeling pass over a pre-filtered frame list
#[derive(Debug)]
pub struct NavigationSession {
    store: FrameStore,
    names: Vec<String>,
    cursor: usize,
    surface: Surface,
    overlays: bool,
    pending: Option<CornerBox>,
}

impl NavigationSession {
    /// Snapshot the store's listing and start at the first frame
    pub fn begin(store: FrameStore, options: SessionOptions) -> Result<Self> {
        let names = store.list_frame_names(&options.list)?;
        info!("Session started: {} frames to visit", names.len());
        Ok(NavigationSession {
            store,
            names,
            cursor: 0,
            surface: options.surface,
            overlays: options.overlays,
            pending: None,
        })
    }

    /// Name of the frame under the cursor; fails with `Exhausted` at terminal
    pub fn current_frame(&self) -> Result<&str> {
        if self.cursor == self.names.len() {
            return Err(StoreError::Exhausted);
        }
        Ok(&self.names[self.cursor])
    }

    /// View of the frame under the cursor, or `Exhausted`
    pub fn current_view(&self) -> Result<Progress> {
        self.progress()
    }

    /// (cursor, total) - cursor equals total once the session is exhausted
    pub fn position(&self) -> (usize, usize) {
        (self.cursor, self.names.len())
    }

    /// True once the cursor has passed the last frame
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.names.len()
    }

    // ==================== Pending box ====================

    /// Anchor the in-progress box at a canvas position
    pub fn start_box(&mut self, x: i32, y: i32) {
        self.pending = Some(CornerBox::new(x, y, x, y));
    }

    /// Move the far corner of the in-progress box
    pub fn drag_box(&mut self, x: i32, y: i32) {
        if let Some(bbox) = &mut self.pending {
            bbox.x2 = x;
            bbox.y2 = y;
        }
    }

    /// The in-progress corner-form box, if one has been started
    pub fn pending_box(&self) -> Option<CornerBox> {
        self.pending
    }

    // ==================== Intents ====================

    /// Persist `bbox` as the current frame's annotation and advance.
    ///
    /// The box is normalized against the session surface before writing.
    /// Re-confirming a revisited frame overwrites its earlier annotation.
    pub fn confirm_and_advance(&mut self, bbox: CornerBox) -> Result<Progress> {
        if self.cursor == self.names.len() {
            return Ok(Progress::Exhausted);
        }
        let name = &self.names[self.cursor];
        self.store
            .add_annotation(name, bbox.normalized(self.surface))?;
        debug!("Confirmed {name} [{}/{}]", self.cursor, self.names.len());
        self.advance()
    }

    /// Confirm whatever box has been dragged out so far.
    ///
    /// With no pending box this writes a zero box, matching an operator
    /// confirming without drawing.
    pub fn confirm_pending(&mut self) -> Result<Progress> {
        let bbox = self.pending.take().unwrap_or_default();
        self.confirm_and_advance(bbox)
    }

    /// Reject the current frame (subset becomes `SET_REJECTED`) and advance
    pub fn mark_bad_and_advance(&mut self) -> Result<Progress> {
        if self.cursor == self.names.len() {
            return Ok(Progress::Exhausted);
        }
        let name = &self.names[self.cursor];
        self.store.assign_subset(name, SET_REJECTED)?;
        debug!("Marked {name} bad [{}/{}]", self.cursor, self.names.len());
        self.advance()
    }

    /// Advance without writing anything
    pub fn skip(&mut self) -> Result<Progress> {
        if self.cursor == self.names.len() {
            return Ok(Progress::Exhausted);
        }
        self.advance()
    }

    /// Step the cursor back one frame.
    ///
    /// Nothing written to the store is reversed; a later confirm overwrites.
    /// At the first frame this is a no-op, and at terminal - like every other
    /// intent - it only reports `Exhausted`.
    pub fn undo(&mut self) -> Result<Progress> {
        if self.cursor == self.names.len() {
            return Ok(Progress::Exhausted);
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            self.pending = None;
        }
        self.progress()
    }

    fn advance(&mut self) -> Result<Progress> {
        self.cursor += 1;
        self.pending = None;
        self.progress()
    }

    fn progress(&self) -> Result<Progress> {
        if self.cursor == self.names.len() {
            info!("Reached end of frame list");
            return Ok(Progress::Exhausted);
        }
        Ok(Progress::Current(self.view_at(self.cursor)?))
    }

    fn view_at(&self, index: usize) -> Result<FrameView> {
        let name = &self.names[index];
        let image = self.store.frame_image(name)?;
        let (annotation, predictions) = if self.overlays {
            // A frame without an annotation is an empty overlay, not an error
            let annotation = match self.store.annotation(name) {
                Ok(bbox) => Some(bbox),
                Err(StoreError::AnnotationNotFound(_)) => None,
                Err(err) => return Err(err),
            };
            (annotation, self.store.predictions(name)?)
        } else {
            (None, Vec::new())
        };
        Ok(FrameView {
            name: name.clone(),
            index,
            total: self.names.len(),
            image,
            annotation,
            predictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::builder::StoreBuilder;
    use crate::store::subset::SET_TRAIN;
    use ndarray::{ArrayD, IxDyn};
    use tempfile::TempDir;

    fn image() -> ArrayD<u8> {
        ArrayD::zeros(IxDyn(&[4, 4, 3]))
    }

    fn abc_store(dir: &TempDir) -> FrameStore {
        let mut builder = StoreBuilder::new();
        for name in ["a", "b", "c"] {
            builder.insert_frame(name, image()).set_subset(SET_TRAIN);
        }
        builder.write(dir.path().join("frames.fdb")).unwrap()
    }

    fn current_name(session: &NavigationSession) -> String {
        session.current_frame().unwrap().to_string()
    }

    #[test]
    fn test_skip_undo_and_exhaustion() {
        let dir = TempDir::new().unwrap();
        let mut session =
            NavigationSession::begin(abc_store(&dir), SessionOptions::default()).unwrap();
        assert_eq!(current_name(&session), "a");

        session.skip().unwrap();
        assert_eq!(current_name(&session), "b");

        session.undo().unwrap();
        assert_eq!(current_name(&session), "a");

        // Undo at the first frame is a no-op, not a crash
        session.undo().unwrap();
        assert_eq!(current_name(&session), "a");
        assert_eq!(session.position(), (0, 3));

        session.skip().unwrap();
        session.skip().unwrap();
        let last = session.skip().unwrap();
        assert!(matches!(last, Progress::Exhausted));
        assert!(session.is_exhausted());
        assert!(matches!(
            session.current_frame().unwrap_err(),
            StoreError::Exhausted
        ));

        // Terminal traps every further intent without store access
        assert!(matches!(session.skip().unwrap(), Progress::Exhausted));
        assert!(matches!(session.undo().unwrap(), Progress::Exhausted));
        assert!(matches!(
            session.confirm_and_advance(CornerBox::new(0, 0, 10, 10)).unwrap(),
            Progress::Exhausted
        ));
    }

    #[test]
    fn test_confirm_writes_normalized_box() {
        let dir = TempDir::new().unwrap();
        let store = abc_store(&dir);
        let mut session = NavigationSession::begin(
            store.clone(),
            SessionOptions {
                surface: Surface::new(100, 200),
                ..Default::default()
            },
        )
        .unwrap();

        let step = session
            .confirm_and_advance(CornerBox::new(10, 40, 30, 80))
            .unwrap();
        match step {
            Progress::Current(view) => assert_eq!(view.name, "b"),
            Progress::Exhausted => panic!("expected a current frame"),
        }

        let stored = store.annotation("a").unwrap();
        assert_eq!(stored, CenterBox::new(0.2, 0.3, 0.2, 0.2));
    }

    #[test]
    fn test_reconfirm_after_undo_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = abc_store(&dir);
        let mut session =
            NavigationSession::begin(store.clone(), SessionOptions::default()).unwrap();

        session
            .confirm_and_advance(CornerBox::new(0, 0, 100, 100))
            .unwrap();
        session.undo().unwrap();
        session
            .confirm_and_advance(CornerBox::new(0, 0, 200, 200))
            .unwrap();

        let stored = store.annotation("a").unwrap();
        assert_eq!(stored.w, 200.0 / 1024.0);
    }

    #[test]
    fn test_mark_bad_rejects_in_store() {
        let dir = TempDir::new().unwrap();
        let store = abc_store(&dir);
        let mut session =
            NavigationSession::begin(store.clone(), SessionOptions::default()).unwrap();

        session.mark_bad_and_advance().unwrap();
        assert_eq!(current_name(&session), "b");

        let names = store.list_frame_names(&ListOptions::default()).unwrap();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_empty_listing_starts_exhausted() {
        let dir = TempDir::new().unwrap();
        let store = StoreBuilder::new().write(dir.path().join("empty.fdb")).unwrap();
        let session = NavigationSession::begin(store, SessionOptions::default()).unwrap();
        assert!(session.is_exhausted());
        assert!(matches!(
            session.current_frame().unwrap_err(),
            StoreError::Exhausted
        ));
    }

    #[test]
    fn test_overlay_views_carry_annotation_and_predictions() {
        let dir = TempDir::new().unwrap();
        let store = abc_store(&dir);
        let anno = CenterBox::new(0.5, 0.5, 0.2, 0.2);
        let pred = CenterBox::new(0.4, 0.4, 0.1, 0.1);
        store.add_annotation("a", anno).unwrap();
        store.add_prediction("a", "resnet", pred).unwrap();

        let session = NavigationSession::begin(
            store,
            SessionOptions {
                overlays: true,
                ..Default::default()
            },
        )
        .unwrap();

        match session.current_view().unwrap() {
            Progress::Current(view) => {
                assert_eq!(view.name, "a");
                assert_eq!(view.annotation, Some(anno));
                assert_eq!(view.predictions, vec![("resnet".to_string(), pred)]);
                assert_eq!((view.index, view.total), (0, 3));
            }
            Progress::Exhausted => panic!("expected a current frame"),
        }
    }

    #[test]
    fn test_unannotated_overlay_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        let session = NavigationSession::begin(
            abc_store(&dir),
            SessionOptions {
                overlays: true,
                ..Default::default()
            },
        )
        .unwrap();

        match session.current_view().unwrap() {
            Progress::Current(view) => {
                assert_eq!(view.annotation, None);
                assert!(view.predictions.is_empty());
            }
            Progress::Exhausted => panic!("expected a current frame"),
        }
    }

    #[test]
    fn test_pending_box_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = abc_store(&dir);
        let mut session =
            NavigationSession::begin(store.clone(), SessionOptions::default()).unwrap();

        assert_eq!(session.pending_box(), None);
        session.drag_box(50, 50); // no anchor yet - ignored
        assert_eq!(session.pending_box(), None);

        session.start_box(10, 20);
        session.drag_box(110, 220);
        assert_eq!(session.pending_box(), Some(CornerBox::new(10, 20, 110, 220)));

        session.confirm_pending().unwrap();
        assert_eq!(session.pending_box(), None);
        assert!(store.annotation("a").is_ok());
    }
}
