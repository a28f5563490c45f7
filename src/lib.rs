pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{form::NewBillForm, http_store::HttpBillStore, memory_store::InMemoryBillStore};
pub use config::session::LocalSessionStorage;
pub use core::{
    bills::BillsPage,
    new_bill::{FileChange, NewBillController, SubmitEvent},
    routes::HistoryNavigator,
};
pub use utils::error::{BillError, Result};
