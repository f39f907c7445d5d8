use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File the download button writes to, relative to the working directory
pub const EXPORT_FILENAME: &str = "social_good_story.txt";

/// Write `story` verbatim to [`EXPORT_FILENAME`], replacing any previous content.
pub fn save_to_file(story: &str) -> io::Result<PathBuf> {
    save_to_path(EXPORT_FILENAME, story)
}

/// Write `story` verbatim (UTF-8) to `path`, truncating it first.
/// Concurrent writers are not serialized, the last one wins.
pub fn save_to_path(path: impl AsRef<Path>, story: &str) -> io::Result<PathBuf> {
    let path = path.as_ref();
    fs::write(path, story.as_bytes())?;
    Ok(path.to_path_buf())
}
