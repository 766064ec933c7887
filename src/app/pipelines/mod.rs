pub mod seo_pipeline;

pub use seo_pipeline::{build_pipeline, standard_runner, PipelinePorts, SeoAuditPipeline};
