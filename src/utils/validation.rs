use crate::domain::model::ExpenseType;
use crate::utils::error::{BillError, Result};
use chrono::NaiveDate;
use url::Url;

pub const MAX_TIMEOUT_SECS: u64 = 600;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid_config(field: &str, value: impl ToString, reason: impl Into<String>) -> BillError {
    BillError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn invalid_field(field: &str, value: &str, reason: impl Into<String>) -> BillError {
    BillError::InvalidFieldError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Base URL of the bills API: absolute, over http or https.
pub fn validate_api_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| invalid_config(field, endpoint, format!("bills API URL is not valid: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid_config(
            field,
            endpoint,
            format!("bills API must be served over http or https, not {}", scheme),
        )),
    }
}

/// The session file holds the local storage entries as a JSON object.
pub fn validate_session_file(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() || path.contains('\0') {
        return Err(invalid_config(field, path, "session file path is empty or malformed"));
    }

    let is_json = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(invalid_config(field, path, "session file must be a .json file"));
    }
    Ok(())
}

pub fn validate_timeout_secs(field: &str, secs: u64) -> Result<()> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(invalid_config(
            field,
            secs,
            format!("request timeout must be between 1 and {} seconds", MAX_TIMEOUT_SECS),
        ));
    }
    Ok(())
}

/// Bill dates come from a date picker as `YYYY-MM-DD`.
pub fn validate_bill_date(field: &str, date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| invalid_field(field, date, "expected a date as YYYY-MM-DD"))
}

pub fn validate_expense_label(field: &str, label: &str) -> Result<()> {
    if ExpenseType::from_label(label).is_some() {
        return Ok(());
    }
    let labels: Vec<&str> = ExpenseType::ALL.iter().map(|t| t.label()).collect();
    Err(invalid_field(
        field,
        label,
        format!("expected one of: {}", labels.join(", ")),
    ))
}

pub fn validate_bill_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid_field(field, name, "a bill needs a name"));
    }
    Ok(())
}
