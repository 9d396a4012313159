use std::sync::Arc;

use crossbeam_channel::Receiver;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::debug;

use crate::audio::RenderError;

/// Mono 16-bit WAV sink fed block by block from a render loop.
pub struct WavOutput;

impl WavOutput {
    /// Spawn the writer thread. It finalizes the file once every sender is
    /// dropped and reports the number of samples written.
    pub fn run(
        rx: Receiver<Arc<[f32]>>,
        path: String,
        sample_rate: u32,
    ) -> std::thread::JoinHandle<Result<u64, RenderError>> {
        std::thread::spawn(move || -> Result<u64, RenderError> {
            let spec = WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            };
            let mut writer = WavWriter::create(&path, spec)?;
            let mut written = 0u64;

            while let Ok(samples) = rx.recv() {
                for &s in samples.iter() {
                    let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                    writer.write_sample(v)?;
                }
                written += samples.len() as u64;
            }

            writer.finalize()?;
            debug!(path = %path, samples = written, "wav finalized");
            Ok(written)
        })
    }
}
