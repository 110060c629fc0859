#![forbid(unsafe_code)]

pub mod memory;
pub mod store;

pub use crate::memory::InMemoryJobRepository;
pub use crate::store::{JobRepository, RepositoryError};
