mod store;

pub use store::InMemoryJobRepository;
