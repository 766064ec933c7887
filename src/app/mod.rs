// Application layer: the concrete SEO checks, the capability groups built on them, and the assembled pipeline.

pub mod capabilities;
pub mod checks;
pub mod pipelines;
