pub mod artifacts;
pub mod color;
pub mod consts;
pub mod demo;
pub mod error;
pub mod experiment;
pub mod image;
pub mod io;
pub mod metrics;
pub mod ops;
pub mod pipeline;
pub mod report;
pub mod step;
