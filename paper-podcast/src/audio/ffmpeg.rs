//! FFmpeg/FFprobe invocation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Sample rate of generated silence, matching typical speech MP3s.
const SILENCE_SAMPLE_RATE: u32 = 24000;

/// Locations of the ffmpeg and ffprobe executables.
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl FfmpegTools {
    /// Use explicit executables, falling back to the ones on PATH.
    pub fn new(ffmpeg: Option<PathBuf>, ffprobe: Option<PathBuf>) -> Self {
        let defaults = Self::default();
        Self {
            ffmpeg: ffmpeg.unwrap_or(defaults.ffmpeg),
            ffprobe: ffprobe.unwrap_or(defaults.ffprobe),
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg
    }

    pub(crate) fn ffmpeg_command(&self) -> Command {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-loglevel", "error"]);
        cmd
    }

    fn ffprobe_command(&self) -> Command {
        Command::new(&self.ffprobe)
    }

    /// Check if FFmpeg can be executed.
    pub fn is_ffmpeg_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Check if FFprobe can be executed.
    pub fn is_ffprobe_available(&self) -> bool {
        self.ffprobe_command()
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Get duration of an audio file in milliseconds using ffprobe.
    pub fn audio_duration_ms(&self, audio_path: &Path) -> Result<u64> {
        let output = self
            .ffprobe_command()
            .args([
                "-v",
                "quiet",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(audio_path)
            .output()
            .context("Failed to run ffprobe")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffprobe failed: {}", stderr);
        }

        let duration_str = String::from_utf8_lossy(&output.stdout);
        let duration_secs: f64 = duration_str
            .trim()
            .parse()
            .context("Failed to parse duration")?;

        Ok((duration_secs * 1000.0) as u64)
    }

    /// Write `duration_ms` of mono silence as an MP3.
    pub fn render_silence(&self, output_path: &Path, duration_ms: u64) -> Result<()> {
        let source = format!("anullsrc=r={}:cl=mono", SILENCE_SAMPLE_RATE);
        let seconds = format!("{:.3}", duration_ms as f64 / 1000.0);

        let output = self
            .ffmpeg_command()
            .args(["-y", "-f", "lavfi", "-i", &source, "-t", &seconds])
            .args(["-c:a", "libmp3lame", "-b:a", "32k"])
            .arg(output_path)
            .output()
            .context("Failed to run ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffmpeg silence rendering failed: {}", stderr);
        }

        Ok(())
    }
}
