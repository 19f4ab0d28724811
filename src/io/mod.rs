//! Stream Module
//!
//! Text streams connecting pipeline stages.

pub mod stream;
pub mod pipe;

pub use stream::{CaptureStream, IoStream, NullStream, StreamError};
pub use pipe::Pipe;
