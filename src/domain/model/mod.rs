//! Model domain - catalog entries naming provider models

mod entity;
mod repository;

pub use entity::{Model, ModelId};
pub use repository::{in_memory::InMemoryModelRepository, ModelRepository};
