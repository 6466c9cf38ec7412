use tracing::info;

use crate::mcp::helpers::truncate_chars;
use crate::ocr::ScreenReader;

const RESULT_HEADER: &str = "OCR result from current screen / 現在の画面から読み取ったテキスト:";

/// Read the screen once and format the transcript for the client.
///
/// Never fails: reader failures arrive here as sentinel text.
pub(crate) async fn handle<R: ScreenReader>(reader: &R, max_chars: usize) -> String {
    info!("Executing OCR...");
    let text = reader.recognize_screen_text().await;
    let text = truncate_chars(&text, max_chars);

    format!("{}\n\n---\n{}\n---", RESULT_HEADER, text)
}
