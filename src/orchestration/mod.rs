//! Local reference substrate: partitions input, runs extraction workers,
//! shuffles between stages and writes output.

pub mod jobs;
pub mod partition;
pub mod report;
pub mod runner;
pub mod shuffle;

pub use jobs::JobKind;
pub use partition::Partitioner;
pub use report::{output_digest, PipelineReport};
pub use runner::{JobRun, Pipeline};
