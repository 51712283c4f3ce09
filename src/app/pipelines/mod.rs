pub mod usage_pipeline;

pub use usage_pipeline::UsagePipeline;
