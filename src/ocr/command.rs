use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{NO_TEXT_FOUND, OcrError, ScreenReader, normalize_transcript};
use crate::config::OcrConfig;

/// Placeholder replaced by the path of the captured screen image
pub const IMAGE_PLACEHOLDER: &str = "{image}";

/// Screen reader built from two external programs: one that captures the
/// display to an image, one that turns that image into text.
///
/// A capture command without `{image}` in its arguments is expected to write
/// the image to stdout instead.
#[derive(Debug, Clone)]
pub struct CommandReader {
    capture: Vec<String>,
    recognize: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandReader {
    pub fn new(capture: Vec<String>, recognize: Vec<String>) -> Self {
        Self {
            capture,
            recognize,
            timeout: None,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.capture.clone(), config.recognize.clone())
            .with_timeout(config.timeout_secs.map(Duration::from_secs))
    }

    /// Bound the whole capture + recognition pipeline. Children still running
    /// when the limit expires are killed.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the pipeline once and return the raw recognizer output
    pub async fn try_recognize(&self) -> Result<String, OcrError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run_pipeline())
                .await
                .unwrap_or(Err(OcrError::Timeout(limit))),
            None => self.run_pipeline().await,
        }
    }

    async fn run_pipeline(&self) -> Result<String, OcrError> {
        // Dropped (and removed) when the pipeline finishes or is cancelled
        let workdir = tempfile::Builder::new()
            .prefix("screen-reader-")
            .tempdir()?;
        let image = workdir.path().join("screen.png");

        self.capture_screen(&image).await?;
        self.recognize_image(&image).await
    }

    async fn capture_screen(&self, image: &Path) -> Result<(), OcrError> {
        let Some((program, args)) = expand_command(&self.capture, image) else {
            return Err(OcrError::CaptureFailed {
                reason: "no capture command configured".to_string(),
            });
        };
        let writes_stdout = !uses_placeholder(&self.capture);

        debug!(%program, "capturing screen");
        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| OcrError::CaptureFailed {
                reason: format!("failed to run `{}`: {}", program, e),
            })?;

        if !output.status.success() {
            return Err(OcrError::CaptureFailed {
                reason: format!(
                    "`{}` exited with {}: {}",
                    program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        if writes_stdout {
            tokio::fs::write(image, &output.stdout).await?;
        }

        let size = tokio::fs::metadata(image)
            .await
            .map(|meta| meta.len())
            .unwrap_or(0);
        if size == 0 {
            return Err(OcrError::CaptureFailed {
                reason: format!("`{}` produced no image", program),
            });
        }

        debug!(bytes = size, "screen captured");
        Ok(())
    }

    async fn recognize_image(&self, image: &Path) -> Result<String, OcrError> {
        let Some((program, args)) = expand_command(&self.recognize, image) else {
            return Err(OcrError::EngineUnavailable {
                program: String::new(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no recognition command configured",
                ),
            });
        };

        debug!(%program, "recognizing text");
        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| OcrError::EngineUnavailable {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::RecognitionFailed {
                reason: format!(
                    "`{}` exited with {}: {}",
                    program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ScreenReader for CommandReader {
    async fn recognize_screen_text(&self) -> String {
        match self.try_recognize().await {
            Ok(raw) => match normalize_transcript(&raw) {
                Some(text) => {
                    info!(chars = text.chars().count(), "OCR finished");
                    text
                }
                None => {
                    info!("OCR finished without any text");
                    NO_TEXT_FOUND.to_string()
                }
            },
            Err(e) => {
                warn!(error = %e, "screen text recognition failed");
                e.to_sentinel()
            }
        }
    }
}

fn uses_placeholder(command: &[String]) -> bool {
    command.iter().any(|arg| arg.contains(IMAGE_PLACEHOLDER))
}

/// Split a configured command into program and arguments, substituting the
/// image path for every `{image}` placeholder.
fn expand_command(command: &[String], image: &Path) -> Option<(String, Vec<String>)> {
    let image = image.to_string_lossy();
    let mut parts = command
        .iter()
        .map(|arg| arg.replace(IMAGE_PLACEHOLDER, &image));
    let program = parts.next().filter(|p| !p.trim().is_empty())?;
    Some((program, parts.collect()))
}
