use crate::domain::model::{BillRecord, FileSelection, Route, StoredFile};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence for bills and their attached files.
#[async_trait]
pub trait BillStore: Send + Sync {
    async fn upload(&self, file: &FileSelection, email: &str) -> Result<StoredFile>;
    async fn create(&self, bill: &BillRecord) -> Result<StoredFile>;
    async fn list(&self) -> Result<Vec<BillRecord>>;
}

/// Named inputs of the new bill form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    ExpenseType,
    ExpenseName,
    Amount,
    Date,
    Vat,
    Pct,
    Commentary,
    File,
}

impl FieldId {
    pub fn test_id(&self) -> &'static str {
        match self {
            FieldId::ExpenseType => "expense-type",
            FieldId::ExpenseName => "expense-name",
            FieldId::Amount => "amount",
            FieldId::Date => "datepicker",
            FieldId::Vat => "vat",
            FieldId::Pct => "pct",
            FieldId::Commentary => "commentary",
            FieldId::File => "file",
        }
    }
}

/// The view the bill controller reads from and reflects file state into.
///
/// Implementations own their state and take `&self` so a pending upload and a
/// new event can both reach the view.
pub trait FormView: Send + Sync {
    fn field_value(&self, field: FieldId) -> Option<String>;
    fn show_file_accepted(&self);
    fn show_file_rejected(&self, message: &str);
}

pub trait Navigator: Send + Sync {
    fn on_navigate(&self, route: Route);
}

/// Key-value session storage (the browser's local storage).
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn session_path(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
}
