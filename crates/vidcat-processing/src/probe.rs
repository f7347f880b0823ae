//! Media probing - container and playtime of an upload via ffprobe

use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;
use vidcat_core::AppError;

use crate::container::Container;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid ffprobe path: {0}")]
    InvalidBinary(String),

    #[error("Failed to execute ffprobe: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("ffprobe failed: {0}")]
    Failed(String),

    #[error("Failed to parse ffprobe output: {0}")]
    InvalidOutput(String),

    #[error("Unsupported container: {0}")]
    UnsupportedContainer(String),
}

impl From<ProbeError> for AppError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::UnsupportedContainer(format) => AppError::Validation(format!(
                "The source must be a file of type: mp4, mov, ogg, qt (detected {}).",
                format
            )),
            other => AppError::MediaProbe(other.to_string()),
        }
    }
}

/// What the catalog keeps from a probed upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaProbe {
    pub container: Container,
    /// Whole seconds, truncated
    pub duration_seconds: i32,
}

#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<MediaProbe, ProbeError>;
}

/// Parse `ffprobe -print_format json -show_format` output.
pub fn parse_probe_output(stdout: &[u8]) -> Result<MediaProbe, ProbeError> {
    let probe_data: serde_json::Value =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::InvalidOutput(e.to_string()))?;

    let format = probe_data
        .get("format")
        .ok_or_else(|| ProbeError::InvalidOutput("missing format section".to_string()))?;

    let format_name = format["format_name"]
        .as_str()
        .ok_or_else(|| ProbeError::InvalidOutput("missing format_name".to_string()))?;

    let major_brand = format["tags"]["major_brand"].as_str();

    let container = Container::from_probe(format_name, major_brand)
        .ok_or_else(|| ProbeError::UnsupportedContainer(format_name.to_string()))?;

    let duration = format["duration"]
        .as_str()
        .and_then(|d| d.parse::<f64>().ok())
        .or_else(|| format["duration"].as_f64())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ProbeError::InvalidOutput("could not parse duration".to_string()))?;

    Ok(MediaProbe {
        container,
        duration_seconds: duration.trunc().min(f64::from(i32::MAX)) as i32,
    })
}

/// Validate that a binary path doesn't contain shell metacharacters
fn validate_binary_path(path: &str) -> Result<(), ProbeError> {
    if path.trim().is_empty() {
        return Err(ProbeError::InvalidBinary("empty path".to_string()));
    }

    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '\\' | ':'))
    {
        return Err(ProbeError::InvalidBinary(format!(
            "{} contains unsafe characters",
            path
        )));
    }

    Ok(())
}

/// [`MediaProber`] backed by the ffprobe binary
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>) -> Result<Self, ProbeError> {
        let ffprobe_path = ffprobe_path.into();
        validate_binary_path(&ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<MediaProbe, ProbeError> {
        let start = Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
            ])
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ProbeError::Failed(format!(
                "exit status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let probe = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            container = %probe.container,
            video_duration = probe.duration_seconds,
            "Video probe completed"
        );

        Ok(probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MP4_OUTPUT: &str = r#"{
        "format": {
            "filename": "/tmp/.staging-abc",
            "nb_streams": 2,
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "12.980000",
            "size": "1055736",
            "tags": { "major_brand": "isom" }
        }
    }"#;

    #[test]
    fn test_parse_mp4_truncates_duration() {
        let probe = parse_probe_output(MP4_OUTPUT.as_bytes()).unwrap();
        assert_eq!(probe.container, Container::Mp4);
        assert_eq!(probe.duration_seconds, 12);
    }

    #[test]
    fn test_parse_quicktime_and_ogg() {
        let mov = r#"{"format":{"format_name":"mov,mp4,m4a,3gp,3g2,mj2","duration":"3.5","tags":{"major_brand":"qt  "}}}"#;
        let ogg = r#"{"format":{"format_name":"ogg","duration":"59.999"}}"#;
        assert_eq!(
            parse_probe_output(mov.as_bytes()).unwrap().container,
            Container::QuickTime
        );
        let probe = parse_probe_output(ogg.as_bytes()).unwrap();
        assert_eq!(probe.container, Container::Ogg);
        assert_eq!(probe.duration_seconds, 59);
    }

    #[test]
    fn test_parse_rejects_unsupported_container() {
        let mkv = r#"{"format":{"format_name":"matroska,webm","duration":"1.0"}}"#;
        let err = parse_probe_output(mkv.as_bytes()).unwrap_err();
        assert!(matches!(err, ProbeError::UnsupportedContainer(_)));
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(ProbeError::InvalidOutput(_))
        ));
        assert!(matches!(
            parse_probe_output(br#"{"format":{"format_name":"ogg"}}"#),
            Err(ProbeError::InvalidOutput(_))
        ));
        assert!(matches!(
            parse_probe_output(b"{}"),
            Err(ProbeError::InvalidOutput(_))
        ));
    }

    #[test]
    fn test_probe_failures_are_internal_errors() {
        let err = AppError::from(ProbeError::Failed("exit status 1".to_string()));
        assert!(matches!(err, AppError::MediaProbe(_)));
    }

    #[test]
    fn test_binary_path_validation() {
        assert!(FfprobeProber::new("ffprobe").is_ok());
        assert!(FfprobeProber::new("/usr/local/bin/ffprobe").is_ok());
        assert!(FfprobeProber::new("ffprobe; rm -rf /").is_err());
        assert!(FfprobeProber::new("").is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let prober = FfprobeProber::new("/nonexistent/bin/ffprobe-vidcat").unwrap();
        let result = prober.probe(Path::new("/tmp/whatever.mp4")).await;
        assert!(matches!(result, Err(ProbeError::Spawn(_))));
    }
}
