//! Whole-file replacement for mutable metadata.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::Result;

/// Replaces the content of `path` with `data` using temp-file-then-rename.
///
/// Readers observe either the previous content or the new content, never
/// a partially written file. Parent directories must already exist.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_data()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
