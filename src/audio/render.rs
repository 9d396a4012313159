//! Offline rendering: drive stream -> engine -> blocks.

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::audio::RenderError;
use crate::core::drive::Drive;
use crate::core::engine::StatFeed;

/// Render `total` samples in blocks of `block_size`, handing each block to
/// `sink`.
pub fn render_blocks(
    engine: &mut StatFeed,
    drive: &mut Drive,
    total: usize,
    block_size: usize,
    mut sink: impl FnMut(&[f32]) -> Result<(), RenderError>,
) -> Result<usize, RenderError> {
    let block_size = block_size.max(1);
    let mut input = vec![0.0f32; block_size];
    let mut output = vec![0.0f32; block_size];
    let mut done = 0;

    while done < total {
        let n = block_size.min(total - done);
        drive.fill(&mut input[..n]);
        engine.process_block(&input[..n], &mut output[..n]);
        sink(&output[..n])?;
        done += n;
    }
    Ok(done)
}

/// Sink that forwards blocks to a writer thread.
pub fn channel_sink(tx: &Sender<Arc<[f32]>>) -> impl FnMut(&[f32]) -> Result<(), RenderError> + '_ {
    move |block| {
        tx.send(Arc::from(block))
            .map_err(|_| RenderError::ChannelClosed)
    }
}
