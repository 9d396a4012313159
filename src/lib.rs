//! Statistical Feedback: a self-avoiding resampling process for algorithmic
//! composition.
//!
//! A population of bins is sampled once per drive value; the chosen bin's
//! count resets while every other active count grows, so recently chosen
//! bins become unlikely. [`StatFeed`] runs the canonical audio-rate engine
//! with lookup tables; [`Conventions`] switches to the control-rate
//! behaviours.

pub mod audio;
pub mod cli;
pub mod config;
pub mod core;

pub use crate::core::conventions::Conventions;
pub use crate::core::engine::StatFeed;
pub use crate::core::selection::Selection;
pub use crate::core::{EngineConfig, StatFeedError};
