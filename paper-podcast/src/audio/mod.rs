//! Audio handling: ffmpeg tooling and background-music mixing.

pub mod ffmpeg;
pub mod mixer;

pub use ffmpeg::FfmpegTools;
pub use mixer::{MixError, mix_with_background};

use std::io;
use std::path::{Path, PathBuf};

/// Create a new, uniquely named `.mp3` file in `dir` and return its path.
///
/// The file is kept on disk; its lifetime is bound to `dir`.
pub fn new_mp3_path(dir: &Path, prefix: &str) -> io::Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(".mp3")
        .tempfile_in(dir)?;
    let (_, path) = file.keep()?;
    Ok(path)
}
