#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod limiter;
pub mod meter;
pub mod params;
pub mod processor;
pub mod utils;

pub use error::Error;
pub use limiter::PeakLimiter;
pub use params::{ChannelLayout, Parameters};
pub use processor::LimiterProcessor;
