// Entry point: renders a Statistical Feedback stream to wav or stdout.
use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use crossbeam_channel::bounded;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use statfeed::StatFeed;
use statfeed::audio::RenderError;
use statfeed::audio::render::{channel_sink, render_blocks};
use statfeed::audio::writer::WavOutput;
use statfeed::cli::{Args, OutputFormat};
use statfeed::config::AppConfig;
use statfeed::core::drive::Drive;

#[derive(Serialize)]
struct EventRecord {
    event: usize,
    drive: f32,
    index: usize,
    output: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(&args.log_level))
        .init();

    let mut cfg = AppConfig::load_or_default(&args.config);
    if let Some(bins) = args.bins {
        cfg.render.bins_in_use = bins;
    }
    if let Some(exponent) = args.exponent {
        cfg.render.exponent = exponent;
    }
    if let Some(seed) = args.seed {
        cfg.render.seed = seed;
    }
    if let Some(drive) = args.drive {
        cfg.render.drive = drive;
    }

    let mut engine = StatFeed::with_conventions(cfg.engine, cfg.conventions)?;
    engine.set_bins_in_use(cfg.render.bins_in_use);
    engine.set_exponent(cfg.render.exponent);
    let mut drive = Drive::new(cfg.render.drive, cfg.render.seed);

    let status = engine.describe();
    info!(
        max_bins = status.max_bins,
        max_exponent = status.max_exponent,
        num_possible_increments = status.num_possible_increments,
        "statfeed ready"
    );

    match args.wav {
        Some(path) => {
            let total = (args.seconds.max(0.0) * cfg.render.sample_rate as f32) as usize;
            let (tx, rx) = bounded::<Arc<[f32]>>(16);
            let handle = WavOutput::run(rx, path.clone(), cfg.render.sample_rate);
            let rendered = render_blocks(
                &mut engine,
                &mut drive,
                total,
                cfg.render.block_size,
                channel_sink(&tx),
            );
            drop(tx);
            let written = handle.join().map_err(|_| RenderError::WriterPanicked)??;
            rendered?;
            info!(path = %path, samples = written, "wav written");
        }
        None => {
            for event in 0..args.events {
                let d = drive.next_sample();
                let sel = engine.evaluate_selection(d);
                match args.format {
                    OutputFormat::Index => println!("{}", sel.index),
                    OutputFormat::Signal => println!("{:.6}", sel.output),
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::to_string(&EventRecord {
                            event,
                            drive: d,
                            index: sel.index,
                            output: sel.output,
                        })?
                    ),
                }
            }
            info!(
                events = args.events,
                bins_in_use = engine.bins_in_use(),
                exponent = engine.exponent(),
                "events emitted"
            );
        }
    }

    Ok(())
}
