// Adapters layer: concrete implementations of the domain ports (view, stores).

pub mod form;
pub mod http_store;
pub mod memory_store;
