pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, ScanConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::{build_pipeline, SeoAuditPipeline};
pub use core::engine::ScanEngine;
pub use domain::model::{AuditBundle, AuditRecord, CompetitorSet, Domain, Outcome, ScanReport};
pub use utils::error::{Result, ScanError};
