//! Overlay of a speech track with background music.

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::ffmpeg::FfmpegTools;
use super::new_mp3_path;

/// Overlay both inputs from t=0; output lasts as long as the longer input.
const OVERLAY_FILTER: &str = "[0:a][1:a]amix=inputs=2:duration=longest:normalize=0[mix]";

#[derive(Debug, Error)]
pub enum MixError {
    #[error("Both audio file and background music must be provided.")]
    MissingInput,

    #[error("Speech track not found: {0}")]
    SpeechNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ffmpeg mix failed: {0}")]
    Ffmpeg(String),
}

/// Overlay background music onto a speech track and export a new MP3 in `dir`.
///
/// Both inputs are required; a missing or empty one fails immediately with
/// [`MixError::MissingInput`]. The background is not looped or trimmed.
pub fn mix_with_background(
    tools: &FfmpegTools,
    speech: Option<&Path>,
    background: Option<&[u8]>,
    dir: &Path,
) -> Result<PathBuf, MixError> {
    let (speech, background) = match (speech, background) {
        (Some(s), Some(b)) if !s.as_os_str().is_empty() && !b.is_empty() => (s, b),
        _ => return Err(MixError::MissingInput),
    };

    if !speech.is_file() {
        return Err(MixError::SpeechNotFound(speech.to_path_buf()));
    }

    let background_path = new_mp3_path(dir, "background-")?;
    std::fs::write(&background_path, background)?;

    let output_path = new_mp3_path(dir, "podcast-")?;
    log::info!(
        "mixing {} with {} byte background into {}",
        speech.display(),
        background.len(),
        output_path.display()
    );

    let output = tools
        .ffmpeg_command()
        .arg("-y")
        .arg("-i")
        .arg(speech)
        .arg("-i")
        .arg(&background_path)
        .args(["-filter_complex", OVERLAY_FILTER, "-map", "[mix]"])
        .args(["-c:a", "libmp3lame", "-b:a", "192k"])
        .arg(&output_path)
        .output()
        .map_err(|e| MixError::Ffmpeg(format!("Failed to run ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MixError::Ffmpeg(stderr.trim().to_string()));
    }

    Ok(output_path)
}
