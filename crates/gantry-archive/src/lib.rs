//! Zip archiving for deployment bundles.
//!
//! Two inverse operations share one safety invariant:
//!
//! - [`create_archive`] walks a staging directory and writes a zip whose
//!   entry names are relative to the staging root's parent, so the bundle
//!   directory itself is the archive's top-level entry.
//! - [`extract_archive`] unpacks an archive under a destination root and
//!   refuses any entry whose resolved path would land outside that root
//!   ([`ArchiveError::PathTraversal`]). Detection aborts the whole
//!   extraction before the offending entry, or anything after it, touches
//!   disk.
//!
//! Entry names are forward-slash separated and never absolute. File content
//! is streamed between disk and archive; unix permission bits are stored on
//! creation and restored on extraction.

mod path;
mod zip_io;

pub use path::safe_join;
pub use zip_io::{ArchiveError, create_archive, extract_archive};
