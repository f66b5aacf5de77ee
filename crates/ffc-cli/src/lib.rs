#![deny(unsafe_code)]

//! Library side of the ffcheck command: run configuration, logging setup
//! and the checking pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
