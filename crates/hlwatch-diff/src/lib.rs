//! Snapshot diffing for position change detection.
//!
//! `diff()` compares two snapshots of the same address and produces the
//! notification events between them: positions opened, positions
//! closed, and positions materially resized. It is a pure function with
//! no I/O, which keeps the hard part of the system unit-testable in
//! isolation.

pub mod engine;
pub mod event;

pub use engine::{diff, DEFAULT_RESIZE_THRESHOLD};
pub use event::{CloseOutcome, PositionEvent, ResizeDirection};
