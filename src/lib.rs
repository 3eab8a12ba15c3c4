pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod harvest;
pub mod post;

pub use config::Config;
pub use content::{ClassificationPipeline, ContentExtractor, ContentItem, DocumentTree};
pub use error::{Error, Result};
pub use harvest::{HarvestReport, Harvester};
pub use post::{Post, PostAssembler, PreviewMetadata};
