//! Pipeline execution and catalog adapters

mod engine;
mod postgres_catalog;
mod seed;

pub use engine::{DefaultModel, PipelineEngine};
pub use postgres_catalog::{connect, PostgresCatalog};
pub use seed::{CatalogSeed, InMemoryCatalog, SeedError};
