//! Podcast pipeline.
//!
//! One transcript in, one combined WAV out:
//! read → batch → (synthesize → persist)* → combine

pub mod orchestrator;
pub mod report;

pub use orchestrator::{
    PipelineConfig, PipelineStage, PodcastOutput, PodcastPipeline, SkipReason, SkippedBatch,
    base_name_at, default_base_name,
};
pub use report::SizeReport;
