//! Progress-callback trait for per-asset conversion events.
//!
//! Pass a `&dyn MigrateProgress` to
//! [`crate::migrate::convert_images_with_progress`] (or the combined
//! [`crate::migrate::migrate_with_progress`]) to receive events as the
//! converter works through the tree.
//!
//! # Why callbacks instead of return values?
//!
//! The run report already carries the final counts; the callback exists for
//! *live* feedback. It is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log file, or a CI annotation
//! without the library knowing anything about how the host application
//! communicates. All methods have default no-op implementations so callers
//! only override what they care about.

use crate::error::AssetError;
use std::path::Path;

/// Called by the conversion stage as it processes each candidate asset.
///
/// The walk is strictly sequential, so events always arrive in order:
/// one `on_convert_start`, then for each candidate exactly one of
/// `on_asset_converted` / `on_asset_skipped` / `on_asset_error`, then one
/// `on_convert_complete`.
pub trait MigrateProgress {
    /// Called once after the scan, before any asset is converted.
    fn on_convert_start(&self, candidates: usize) {
        let _ = candidates;
    }

    /// Called when an asset's `.webp` sibling was freshly written.
    ///
    /// `done` counts candidates handled so far (1-indexed).
    fn on_asset_converted(&self, done: usize, total: usize, source: &Path) {
        let _ = (done, total, source);
    }

    /// Called when an asset already had its `.webp` sibling (idempotent skip).
    fn on_asset_skipped(&self, done: usize, total: usize, source: &Path) {
        let _ = (done, total, source);
    }

    /// Called when an asset failed to decode, encode, or write.
    /// The walk continues with the next candidate.
    fn on_asset_error(&self, done: usize, total: usize, error: &AssetError) {
        let _ = (done, total, error);
    }

    /// Called once after every candidate has been attempted.
    fn on_convert_complete(&self, converted: usize, skipped: usize, failed: usize) {
        let _ = (converted, skipped, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl MigrateProgress for NoopProgress {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl MigrateProgress for Recorder {
        fn on_convert_start(&self, candidates: usize) {
            self.events.borrow_mut().push(format!("start {candidates}"));
        }
        fn on_asset_converted(&self, done: usize, total: usize, _source: &Path) {
            self.events.borrow_mut().push(format!("ok {done}/{total}"));
        }
        fn on_asset_error(&self, _done: usize, _total: usize, error: &AssetError) {
            self.events.borrow_mut().push(format!("err {error}"));
        }
        fn on_convert_complete(&self, converted: usize, _skipped: usize, _failed: usize) {
            self.events.borrow_mut().push(format!("done {converted}"));
        }
    }

    #[test]
    fn noop_progress_does_not_panic() {
        let p = NoopProgress;
        p.on_convert_start(3);
        p.on_asset_converted(1, 3, Path::new("a.png"));
        p.on_asset_skipped(2, 3, Path::new("b.png"));
        p.on_asset_error(
            3,
            3,
            &AssetError::DecodeFailed {
                path: PathBuf::from("c.png"),
                detail: "bad".into(),
            },
        );
        p.on_convert_complete(1, 1, 1);
    }

    #[test]
    fn recorder_sees_events_in_order() {
        let r = Recorder::default();
        r.on_convert_start(2);
        r.on_asset_converted(1, 2, Path::new("a.png"));
        r.on_convert_complete(1, 0, 0);
        let events = r.events.borrow();
        assert_eq!(events[0], "start 2");
        assert!(events[1].starts_with("ok 1/2"));
        assert!(events[2].starts_with("done"));
    }
}
