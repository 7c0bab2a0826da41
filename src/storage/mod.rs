//! Collection backends

#[cfg(feature = "in-memory")]
pub mod in_memory;
#[cfg(feature = "rest")]
pub mod rest;

#[cfg(feature = "in-memory")]
pub use in_memory::InMemoryCollection;
#[cfg(feature = "rest")]
pub use rest::RestCollection;
