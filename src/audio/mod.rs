//! Offline rendering of the engine output to WAV.

pub mod render;
pub mod writer;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("wav: {0}")]
    Wav(#[from] hound::Error),
    #[error("writer channel closed")]
    ChannelClosed,
    #[error("writer thread panicked")]
    WriterPanicked,
}
