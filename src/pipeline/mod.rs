//! Pipeline stages for the convert-and-rewrite run.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets the rewrite logic be
//! exercised as pure text functions without touching a filesystem.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ encode ──▶ scan ──▶ rewrite
//! (tree)   (webp)     (tree)   (document text)
//! ```
//!
//! 1. [`scan`]    — walk the image tree; find convertible sources before the
//!    encode stage, and produced `.webp` files (as [`scan::RenameMapping`]s)
//!    before the rewrite stage
//! 2. [`encode`]  — decode one source image and write its `.webp` sibling;
//!    the only stage that creates files
//! 3. [`rewrite`] — apply the rename mappings to the in-memory document
//!    buffer; pure `&str → String`, no I/O

pub mod encode;
pub mod rewrite;
pub mod scan;
