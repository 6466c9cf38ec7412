//! Screen text recognition
//!
//! The protocol layer only ever sees [`ScreenReader`]: one call that yields
//! the text on screen. Failures never escape as errors. They are turned into
//! a human-readable sentinel (English / Japanese) so the client always gets
//! a tool result it can show to the user.

use std::time::Duration;

pub mod command;
pub mod fixed;

pub use command::CommandReader;
pub use fixed::FixedReader;

/// Capability consumed by the `read_screen_text` tool
///
/// Implementations must resolve to a final string and must not fail. The
/// session awaits the future before reading the next request, so a reader is
/// never invoked concurrently with itself by the server.
pub trait ScreenReader: Send + Sync {
    fn recognize_screen_text(&self) -> impl Future<Output = String> + Send;
}

/// Internal failure of the capture/recognition pipeline
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("screen capture failed: {reason}")]
    CaptureFailed { reason: String },

    #[error("failed to start OCR engine `{program}`: {source}")]
    EngineUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("text recognition failed: {reason}")]
    RecognitionFailed { reason: String },

    #[error("screen text recognition timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) const NO_TEXT_FOUND: &str =
    "(No text found on screen / 画面上に文字が見つかりませんでした)";

impl OcrError {
    /// Sentinel text handed to the client in place of a transcript
    pub fn to_sentinel(&self) -> String {
        match self {
            OcrError::CaptureFailed { .. } | OcrError::Io(_) => {
                "Error: Failed to capture screen. Screen Recording permission may not be granted. \
                 / エラー: 画面のキャプチャに失敗しました。「画面収録」の権限がない可能性があります。"
                    .to_string()
            }
            OcrError::EngineUnavailable { .. } => {
                "Error: Failed to start OCR engine. Please check Screen Recording permissions. \
                 / エラー: OCRエンジンの起動に失敗しました。「画面収録」権限を確認してください。"
                    .to_string()
            }
            OcrError::RecognitionFailed { .. } => {
                "Error: Text recognition failed. / エラー: 文字認識に失敗しました。".to_string()
            }
            OcrError::Timeout(limit) => format!(
                "Error: Screen text recognition timed out after {secs}s. \
                 / エラー: 画面の文字認識がタイムアウトしました（{secs}秒）。",
                secs = limit.as_secs()
            ),
        }
    }
}

/// Collapse a recognizer transcript into one line per recognized text line.
///
/// Returns `None` when nothing but whitespace was recognized.
pub(crate) fn normalize_transcript(raw: &str) -> Option<String> {
    let text = raw
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() { None } else { Some(text) }
}
