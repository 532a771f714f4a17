//! Library side of the `f1-etl` binary: configuration, logging setup and the
//! staged load pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
