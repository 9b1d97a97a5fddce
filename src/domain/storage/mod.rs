//! Storage domain - Generic document storage abstraction

mod entity;
mod repository;

pub use entity::{StorageEntity, StorageKey};
pub use repository::{Mutation, Storage};

#[cfg(test)]
pub use repository::mock;
