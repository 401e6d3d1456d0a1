//! framedb - hierarchical frame store and bounding-box annotation workflow
//!
//! This crate provides a single-file store of named frame entries (image
//! payload, scalar attributes, ground-truth annotation, named predictions)
//! and a cursor-driven navigation session that drives a labeling pass over a
//! filtered, ordered frame list.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Future compatibility
    future_incompatible,
)]
#![warn(
    // Correctness
    missing_debug_implementations,

    // Rust 2018 idioms
    rust_2018_idioms,

    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,

    // Code clarity and maintainability
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
)]

pub mod api;
pub mod exceptions;
pub mod logger;
pub mod session;
pub mod store;
pub mod version;

// Re-export main API types
pub use api::{StoreSummary, begin_session, summarize_store};
pub use exceptions::{Result, StoreError};
pub use session::{FrameView, NavigationSession, Progress, SessionOptions};
pub use store::{FrameStore, ListOptions};

// Re-export store building blocks for advanced usage
pub use store::bbox::{CenterBox, CornerBox, Surface};
pub use store::builder::StoreBuilder;
pub use store::export::export_labels;
pub use store::records::{AttrValue, FrameRecord, Prediction};
pub use store::subset::{
    SET_ALL, SET_GOOD, SET_HOLDOUT, SET_REJECTED, SET_TEST, SET_TRAIN, SET_VALID, in_selection,
};
