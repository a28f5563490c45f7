pub mod bills;
pub mod file_validator;
pub mod form_collector;
pub mod new_bill;
pub mod routes;

pub use crate::domain::model::{BillRecord, FileSelection, FormValues, Route, StoredFile};
pub use crate::domain::ports::{BillStore, ConfigProvider, FormView, Navigator, SessionStorage};
pub use crate::utils::error::Result;
