use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense categories offered by the bill form, serialized with the labels
/// the API stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseType {
    #[serde(rename = "Transports")]
    Transports,
    #[serde(rename = "Restaurants et bars")]
    Restaurants,
    #[serde(rename = "Hôtel et logement")]
    Hotel,
    #[serde(rename = "Services en ligne")]
    OnlineServices,
    #[serde(rename = "IT et électronique")]
    It,
    #[serde(rename = "Equipement et matériel")]
    Equipment,
    #[serde(rename = "Fournitures de bureau")]
    OfficeSupplies,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 7] = [
        ExpenseType::Transports,
        ExpenseType::Restaurants,
        ExpenseType::Hotel,
        ExpenseType::OnlineServices,
        ExpenseType::It,
        ExpenseType::Equipment,
        ExpenseType::OfficeSupplies,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Transports => "Transports",
            ExpenseType::Restaurants => "Restaurants et bars",
            ExpenseType::Hotel => "Hôtel et logement",
            ExpenseType::OnlineServices => "Services en ligne",
            ExpenseType::It => "IT et électronique",
            ExpenseType::Equipment => "Equipement et matériel",
            ExpenseType::OfficeSupplies => "Fournitures de bureau",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    /// Label shown in the bills listing.
    pub fn display_label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub name: String,
    #[serde(default)]
    pub amount: Option<f64>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<String>,
    pub pct: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
}

/// A file picked in the file control. Lives only for one change event.
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl FileSelection {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// File name without any directory prefix (`C:\fakepath\a.png` -> `a.png`).
    pub fn base_name(&self) -> &str {
        self.file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name)
    }
}

/// Raw values read from the bill form, unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub expense_type: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// What the store returns after persisting a file or a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub file_name: String,
    pub key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub email: String,
}

/// Logical routes of the application and their hash paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
            Route::Dashboard => "#admin/dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        [Route::Login, Route::Bills, Route::NewBill, Route::Dashboard]
            .into_iter()
            .find(|r| r.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_type_labels_round_trip_through_from_label() {
        for t in ExpenseType::ALL {
            assert_eq!(ExpenseType::from_label(t.label()), Some(t));
        }
        assert_eq!(ExpenseType::from_label("Voyage"), None);
    }

    #[test]
    fn test_bill_record_wire_format() {
        let record = BillRecord {
            id: None,
            email: "a@a".to_string(),
            expense_type: ExpenseType::Hotel,
            name: "encore".to_string(),
            amount: Some(400.0),
            date: "2004-04-04".to_string(),
            vat: Some("80".to_string()),
            pct: 20,
            commentary: None,
            file_url: Some("https://localhost:3456/images/test.jpg".to_string()),
            file_name: Some("test.jpg".to_string()),
            status: BillStatus::Pending,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Hôtel et logement");
        assert_eq!(json["fileUrl"], "https://localhost:3456/images/test.jpg");
        assert_eq!(json["fileName"], "test.jpg");
        assert_eq!(json["status"], "pending");
        assert!(json.get("commentary").is_none());
    }

    #[test]
    fn test_base_name_strips_browser_fake_path() {
        let selection = FileSelection::new("C:\\fakepath\\facture.png", "image/png");
        assert_eq!(selection.base_name(), "facture.png");

        let selection = FileSelection::new("/tmp/scans/note.jpg", "image/jpeg");
        assert_eq!(selection.base_name(), "note.jpg");
    }

    #[test]
    fn test_user_session_parses_local_storage_entry() {
        let session: UserSession =
            serde_json::from_str(r#"{"type":"Employee","email":"aa@aa.com"}"#).unwrap();
        assert_eq!(session.user_type, UserType::Employee);
        assert_eq!(session.email, "aa@aa.com");
    }
}
