//! Pipe
//!
//! Single-producer/single-consumer text channel between two pipeline stages.
//!
//! - writes queue a message and wake the reader
//! - reads wait until a message arrives or the pipe is closed
//! - once closed, reads drain what is buffered and then report end of stream
//! - writes after close fail with `StreamError::BrokenPipe`
//!
//! Either side may close: the producer when it finishes writing, the
//! consumer when it stops reading.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

use super::stream::{IoStream, StreamError};

#[derive(Debug, Default)]
struct PipeState {
    buffer: VecDeque<String>,
    /// Text taken from `buffer` by `readline` but not yet returned
    partial: String,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct Pipe {
    state: Mutex<PipeState>,
    readable: Notify,
}

impl Pipe {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PipeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl IoStream for Pipe {
    async fn read(&self) -> Result<Option<String>, StreamError> {
        loop {
            {
                let mut state = self.lock();
                if !state.partial.is_empty() {
                    return Ok(Some(std::mem::take(&mut state.partial)));
                }
                if let Some(message) = state.buffer.pop_front() {
                    return Ok(Some(message));
                }
                if state.closed {
                    return Ok(None);
                }
            }
            // A notify_one issued before we start waiting leaves a permit
            self.readable.notified().await;
        }
    }

    async fn readline(&self) -> Result<Option<String>, StreamError> {
        loop {
            {
                let mut state = self.lock();
                loop {
                    if let Some(idx) = state.partial.find('\n') {
                        let line = state.partial[..idx].to_string();
                        state.partial.drain(..=idx);
                        return Ok(Some(line));
                    }
                    match state.buffer.pop_front() {
                        Some(message) => state.partial.push_str(&message),
                        None => break,
                    }
                }
                if state.closed {
                    if state.partial.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(std::mem::take(&mut state.partial)));
                }
            }
            self.readable.notified().await;
        }
    }

    async fn write(&self, data: &str) -> Result<(), StreamError> {
        {
            let mut state = self.lock();
            if state.closed {
                tracing::trace!("write to closed pipe");
                return Err(StreamError::BrokenPipe);
            }
            tracing::trace!(bytes = data.len(), "pipe write");
            state.buffer.push_back(data.to_string());
        }
        self.readable.notify_one();
        Ok(())
    }

    fn close(&self) {
        let was_closed = {
            let mut state = self.lock();
            std::mem::replace(&mut state.closed, true)
        };
        if !was_closed {
            tracing::trace!("pipe closed");
        }
        self.readable.notify_one();
    }
}
