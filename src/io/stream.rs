//! I/O Streams
//!
//! `IoStream` is the read/write surface shared by pipeline stages: a `Pipe`
//! between two stages, a `NullStream` for a stage with no input, and a
//! `CaptureStream` that collects what the last stage prints.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;

/// Stream errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("broken pipe")]
    BrokenPipe,
}

#[async_trait]
pub trait IoStream: Send + Sync {
    /// Next chunk of text, or `None` at end of stream
    async fn read(&self) -> Result<Option<String>, StreamError>;

    /// Next line without its newline, or `None` at end of stream
    async fn readline(&self) -> Result<Option<String>, StreamError>;

    async fn write(&self, data: &str) -> Result<(), StreamError>;

    async fn writeln(&self, data: &str) -> Result<(), StreamError> {
        self.write(&format!("{}\n", data)).await
    }

    fn close(&self);

    /// Drain the stream until end of stream
    async fn read_to_string(&self) -> Result<String, StreamError> {
        let mut content = String::new();
        while let Some(chunk) = self.read().await? {
            content.push_str(&chunk);
        }
        Ok(content)
    }
}

/// Empty input; discards output
#[derive(Debug, Default)]
pub struct NullStream;

#[async_trait]
impl IoStream for NullStream {
    async fn read(&self) -> Result<Option<String>, StreamError> {
        Ok(None)
    }

    async fn readline(&self) -> Result<Option<String>, StreamError> {
        Ok(None)
    }

    async fn write(&self, _data: &str) -> Result<(), StreamError> {
        Ok(())
    }

    fn close(&self) {}
}

/// Collects everything written to it
#[derive(Debug, Default)]
pub struct CaptureStream {
    buffer: Mutex<String>,
    closed: Mutex<bool>,
}

impl CaptureStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl IoStream for CaptureStream {
    async fn read(&self) -> Result<Option<String>, StreamError> {
        Ok(None)
    }

    async fn readline(&self) -> Result<Option<String>, StreamError> {
        Ok(None)
    }

    async fn write(&self, data: &str) -> Result<(), StreamError> {
        if *self.closed.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(StreamError::BrokenPipe);
        }
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).push_str(data);
        Ok(())
    }

    fn close(&self) {
        *self.closed.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_stream_is_empty() {
        let stream = NullStream;
        assert_eq!(stream.read().await, Ok(None));
        assert_eq!(stream.read_to_string().await, Ok(String::new()));
        assert!(stream.write("ignored").await.is_ok());
    }

    #[tokio::test]
    async fn test_capture_stream_collects_writes() {
        let stream = CaptureStream::new();
        stream.write("a").await.unwrap();
        stream.writeln("b").await.unwrap();
        assert_eq!(stream.contents(), "ab\n");
    }

    #[tokio::test]
    async fn test_capture_stream_rejects_write_after_close() {
        let stream = CaptureStream::new();
        stream.close();
        assert_eq!(stream.write("x").await, Err(StreamError::BrokenPipe));
    }
}
