use crate::config::session::read_user_session;
use crate::core::file_validator::{self, FileCheck};
use crate::core::form_collector;
use crate::domain::model::{
    BillRecord, BillStatus, ExpenseType, FileSelection, FormValues, Route, StoredFile,
    UserSession,
};
use crate::domain::ports::{BillStore, FormView, Navigator, SessionStorage};
use crate::utils::error::{BillError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

/// Applied when the percentage field is blank, zero or not a number.
pub const DEFAULT_PCT: u32 = 20;

/// Outcome of a file change. Every branch is already reflected in the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Rejected(String),
    Uploaded(StoredFile),
    UploadFailed(String),
}

/// Submit event as delivered by the form; the controller suppresses the
/// default navigation.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub struct NewBillController<S: BillStore, V: FormView, N: Navigator> {
    store: Arc<S>,
    view: Arc<V>,
    navigator: Arc<N>,
    session: UserSession,
    attachment: Mutex<Option<StoredFile>>,
}

impl<S, V, N> NewBillController<S, V, N>
where
    S: BillStore + 'static,
    V: FormView,
    N: Navigator,
{
    /// Reads the current user from `storage` once; later changes to the
    /// storage are not seen by this controller.
    pub fn new<T: SessionStorage + ?Sized>(
        store: Arc<S>,
        view: Arc<V>,
        navigator: Arc<N>,
        storage: &T,
    ) -> Result<Self> {
        let session = read_user_session(storage)?;
        Ok(Self::with_session(store, view, navigator, session))
    }

    pub fn with_session(
        store: Arc<S>,
        view: Arc<V>,
        navigator: Arc<N>,
        session: UserSession,
    ) -> Self {
        Self {
            store,
            view,
            navigator,
            session,
            attachment: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &UserSession {
        &self.session
    }

    fn attachment_slot(&self) -> MutexGuard<'_, Option<StoredFile>> {
        self.attachment.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// File uploaded by the last change that resolved successfully.
    pub fn attachment(&self) -> Option<StoredFile> {
        self.attachment_slot().clone()
    }

    /// Validates the picked file and uploads it when accepted.
    ///
    /// Concurrent changes are not cancelled: whichever upload resolves last
    /// decides the attachment.
    pub async fn on_file_change(&self, selection: FileSelection) -> FileChange {
        let file_name = selection.base_name().to_string();

        if let FileCheck::Rejected(reason) = file_validator::validate(&file_name) {
            tracing::warn!(
                "Rejected file '{}' ({}): {}",
                file_name,
                selection.content_type,
                reason
            );
            self.view.show_file_rejected(&reason);
            return FileChange::Rejected(reason);
        }

        self.view.show_file_accepted();
        tracing::debug!("Uploading '{}' for {}", file_name, self.session.email);

        match self.store.upload(&selection, &self.session.email).await {
            Ok(mut stored) => {
                if stored.file_name.is_empty() {
                    stored.file_name = file_name;
                }
                tracing::info!("Uploaded '{}' as {}", stored.file_name, stored.file_url);
                *self.attachment_slot() = Some(stored.clone());
                FileChange::Uploaded(stored)
            }
            Err(e) => {
                tracing::error!("Upload of '{}' failed: {}", file_name, e);
                let message = e.user_friendly_message();
                *self.attachment_slot() = None;
                self.view.show_file_rejected(&message);
                FileChange::UploadFailed(message)
            }
        }
    }

    /// Builds the bill from the form, hands it to the store in the background
    /// and navigates to the bills listing without waiting for the store.
    ///
    /// Store failures are only logged; the listing reports them when it next
    /// fetches. Must be called from within a tokio runtime.
    pub fn on_submit(&self, event: &mut SubmitEvent) -> Result<JoinHandle<()>> {
        event.prevent_default();

        let values = form_collector::collect(self.view.as_ref())?;
        let attachment = self.attachment();
        let record = build_record(&values, attachment.as_ref(), &self.session.email)?;

        tracing::info!(
            "Submitting bill '{}' ({}) for {}",
            record.name,
            record.expense_type,
            record.email
        );

        let store = Arc::clone(&self.store);
        let handle = tokio::spawn(async move {
            match store.create(&record).await {
                Ok(stored) => tracing::info!("Bill '{}' stored with key {}", record.name, stored.key),
                Err(e) => tracing::warn!("Bill '{}' was not stored: {}", record.name, e),
            }
        });

        self.navigator.on_navigate(Route::Bills);
        Ok(handle)
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Whole-number percentage; decimals are truncated ("12.5" is 12). Anything
/// that does not leave a positive whole number, zero included, falls back to
/// the default.
fn parse_pct(raw: &str) -> u32 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|pct| pct.is_finite())
        .map(f64::trunc)
        .filter(|pct| *pct >= 1.0 && *pct <= f64::from(u32::MAX))
        .map(|pct| pct as u32)
        .unwrap_or(DEFAULT_PCT)
}

fn parse_amount(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(Some(amount)),
        _ => Err(BillError::InvalidFieldError {
            field: "amount".to_string(),
            value: raw.to_string(),
            reason: "Amount must be a number".to_string(),
        }),
    }
}

/// Pending bill for `email` from raw form values and the uploaded file, if any.
pub fn build_record(
    values: &FormValues,
    attachment: Option<&StoredFile>,
    email: &str,
) -> Result<BillRecord> {
    let expense_type = ExpenseType::from_label(&values.expense_type).ok_or_else(|| {
        BillError::InvalidFieldError {
            field: "expense-type".to_string(),
            value: values.expense_type.clone(),
            reason: "Unknown expense type".to_string(),
        }
    })?;

    let pct = parse_pct(&values.pct);

    Ok(BillRecord {
        id: None,
        email: email.to_string(),
        expense_type,
        name: values.name.clone(),
        amount: parse_amount(&values.amount)?,
        date: values.date.clone(),
        vat: optional_text(&values.vat),
        pct,
        commentary: optional_text(&values.commentary),
        file_url: attachment.map(|a| a.file_url.clone()),
        file_name: attachment.map(|a| a.file_name.clone()),
        status: BillStatus::Pending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> FormValues {
        FormValues {
            expense_type: "Restaurants et bars".to_string(),
            name: "Déjeuner client".to_string(),
            amount: "42.5".to_string(),
            date: "2023-05-12".to_string(),
            vat: "".to_string(),
            pct: "".to_string(),
            commentary: "  ".to_string(),
        }
    }

    #[test]
    fn test_build_record_without_attachment() {
        let record = build_record(&values(), None, "aa@aa.com").unwrap();
        assert_eq!(record.email, "aa@aa.com");
        assert_eq!(record.expense_type, ExpenseType::Restaurants);
        assert_eq!(record.amount, Some(42.5));
        assert_eq!(record.pct, DEFAULT_PCT);
        assert_eq!(record.vat, None);
        assert_eq!(record.commentary, None);
        assert_eq!(record.file_url, None);
        assert_eq!(record.file_name, None);
        assert_eq!(record.status, BillStatus::Pending);
    }

    #[test]
    fn test_build_record_with_attachment_and_pct() {
        let mut form = values();
        form.pct = "10".to_string();
        form.vat = "8".to_string();
        let stored = StoredFile {
            file_url: "https://localhost:3456/images/test.jpg".to_string(),
            file_name: "test.jpg".to_string(),
            key: "1234".to_string(),
        };

        let record = build_record(&form, Some(&stored), "aa@aa.com").unwrap();
        assert_eq!(record.pct, 10);
        assert_eq!(record.vat.as_deref(), Some("8"));
        assert_eq!(record.file_url.as_deref(), Some("https://localhost:3456/images/test.jpg"));
        assert_eq!(record.file_name.as_deref(), Some("test.jpg"));
    }

    #[test]
    fn test_pct_falls_back_when_not_numeric_or_zero() {
        for raw in ["abc", "0", "-5", " "] {
            let mut form = values();
            form.pct = raw.to_string();
            assert_eq!(build_record(&form, None, "a@a").unwrap().pct, DEFAULT_PCT);
        }
    }

    #[test]
    fn test_pct_decimals_are_truncated() {
        for (raw, expected) in [
            ("12.5", 12),
            ("12.99", 12),
            (" 7.0 ", 7),
            ("0.5", DEFAULT_PCT),
            ("NaN", DEFAULT_PCT),
        ] {
            let mut form = values();
            form.pct = raw.to_string();
            assert_eq!(build_record(&form, None, "a@a").unwrap().pct, expected, "pct {raw:?}");
        }
    }

    #[test]
    fn test_non_numeric_amount_is_rejected() {
        let mut form = values();
        form.amount = "douze".to_string();
        let err = build_record(&form, None, "a@a").unwrap_err();
        assert!(matches!(err, BillError::InvalidFieldError { ref field, .. } if field == "amount"));

        form.amount = String::new();
        assert_eq!(build_record(&form, None, "a@a").unwrap().amount, None);
    }

    #[test]
    fn test_unknown_expense_type_is_rejected() {
        let mut form = values();
        form.expense_type = "Voyage".to_string();
        assert!(build_record(&form, None, "a@a").is_err());
    }
}
