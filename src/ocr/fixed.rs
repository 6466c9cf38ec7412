use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::ScreenReader;

/// Screen reader that always "sees" the same text.
///
/// Used to wire up an MCP client without granting screen access, and as the
/// test double for the protocol layer.
#[derive(Debug, Clone, Default)]
pub struct FixedReader {
    text: String,
    calls: Arc<AtomicUsize>,
}

impl FixedReader {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times the screen has been "read"
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ScreenReader for FixedReader {
    async fn recognize_screen_text(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_reader_counts_calls() {
        let reader = FixedReader::new("hello");
        let shared = reader.clone();

        assert_eq!(reader.recognize_screen_text().await, "hello");
        assert_eq!(reader.recognize_screen_text().await, "hello");
        assert_eq!(shared.call_count(), 2);
    }
}
