use crate::domain::model::{BillRecord, FileSelection, StoredFile};
use crate::domain::ports::BillStore;
use crate::utils::error::{BillError, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://localhost:3456/images";

#[derive(Debug, Default)]
struct StoreState {
    bills: Vec<BillRecord>,
    next_key: u64,
    upload_calls: usize,
    create_calls: usize,
    list_calls: usize,
}

/// Bill store kept in memory, with per-operation failure injection.
///
/// A failing operation answers with the same `Erreur <status>` error the
/// HTTP store produces.
#[derive(Debug)]
pub struct InMemoryBillStore {
    state: Mutex<StoreState>,
    image_base_url: String,
    fail_upload: Option<u16>,
    fail_create: Option<u16>,
    fail_list: Option<u16>,
}

impl InMemoryBillStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_key: 1234,
                ..StoreState::default()
            }),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            fail_upload: None,
            fail_create: None,
            fail_list: None,
        }
    }

    pub fn with_bills(mut self, bills: Vec<BillRecord>) -> Self {
        self.state.get_mut().bills = bills;
        self
    }

    pub fn failing_upload(mut self, status: u16) -> Self {
        self.fail_upload = Some(status);
        self
    }

    pub fn failing_create(mut self, status: u16) -> Self {
        self.fail_create = Some(status);
        self
    }

    pub fn failing_list(mut self, status: u16) -> Self {
        self.fail_list = Some(status);
        self
    }

    pub async fn bills(&self) -> Vec<BillRecord> {
        self.state.lock().await.bills.clone()
    }

    pub async fn upload_calls(&self) -> usize {
        self.state.lock().await.upload_calls
    }

    pub async fn create_calls(&self) -> usize {
        self.state.lock().await.create_calls
    }

    pub async fn list_calls(&self) -> usize {
        self.state.lock().await.list_calls
    }
}

impl Default for InMemoryBillStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    fn take_key(&mut self) -> String {
        let key = self.next_key.to_string();
        self.next_key += 1;
        key
    }
}

#[async_trait]
impl BillStore for InMemoryBillStore {
    async fn upload(&self, file: &FileSelection, email: &str) -> Result<StoredFile> {
        let mut state = self.state.lock().await;
        state.upload_calls += 1;
        if let Some(status) = self.fail_upload {
            return Err(BillError::store(status));
        }

        let file_name = file.base_name().to_string();
        tracing::debug!(
            "Storing {} bytes of '{}' for {}",
            file.data.len(),
            file_name,
            email
        );
        Ok(StoredFile {
            file_url: format!("{}/{}", self.image_base_url, file_name),
            file_name,
            key: state.take_key(),
        })
    }

    async fn create(&self, bill: &BillRecord) -> Result<StoredFile> {
        let mut state = self.state.lock().await;
        state.create_calls += 1;
        if let Some(status) = self.fail_create {
            return Err(BillError::store(status));
        }

        let key = state.take_key();
        let mut stored = bill.clone();
        stored.id = Some(key.clone());
        state.bills.push(stored);

        Ok(StoredFile {
            file_url: bill.file_url.clone().unwrap_or_default(),
            file_name: bill.file_name.clone().unwrap_or_default(),
            key,
        })
    }

    async fn list(&self) -> Result<Vec<BillRecord>> {
        let mut state = self.state.lock().await;
        state.list_calls += 1;
        if let Some(status) = self.fail_list {
            return Err(BillError::store(status));
        }
        Ok(state.bills.clone())
    }
}
