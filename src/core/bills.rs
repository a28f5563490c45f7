use crate::domain::model::BillRecord;
use crate::domain::ports::BillStore;
use crate::utils::error::Result;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// One line of the bills listing, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    pub id: Option<String>,
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub status: String,
    pub file_url: Option<String>,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `2004-04-04` -> `4 Avr. 04`. Dates that do not parse are returned as is.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => format!(
            "{} {}. {:02}",
            date.day(),
            MONTHS_FR[date.month0() as usize],
            date.year().rem_euclid(100)
        ),
        None => raw.to_string(),
    }
}

fn format_amount(amount: Option<f64>) -> String {
    amount.map(|a| format!("{} €", a)).unwrap_or_default()
}

impl From<&BillRecord> for BillRow {
    fn from(bill: &BillRecord) -> Self {
        Self {
            id: bill.id.clone(),
            expense_type: bill.expense_type.label().to_string(),
            name: bill.name.clone(),
            date: format_date(&bill.date),
            amount: format_amount(bill.amount),
            status: bill.status.display_label().to_string(),
            file_url: bill.file_url.clone(),
        }
    }
}

/// Most recent first; bills whose date does not parse go last.
pub fn sort_by_date_desc(bills: &mut [BillRecord]) {
    bills.sort_by(|a, b| parse_date(&b.date).cmp(&parse_date(&a.date)));
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_rows(rows: &[BillRow]) -> String {
    let body: String = rows
        .iter()
        .map(|row| {
            format!(
                "      <tr>\n        <td>{}</td>\n        <td>{}</td>\n        <td>{}</td>\n        <td>{}</td>\n        <td>{}</td>\n        <td><div data-testid=\"icon-eye\" data-bill-url=\"{}\"></div></td>\n      </tr>\n",
                escape(&row.expense_type),
                escape(&row.name),
                escape(&row.date),
                escape(&row.amount),
                escape(&row.status),
                escape(row.file_url.as_deref().unwrap_or_default()),
            )
        })
        .collect();

    format!(
        "<div class=\"content\">\n  <div class=\"content-header\">\n    <div class=\"content-title\">Mes notes de frais</div>\n    <button type=\"button\" data-testid=\"btn-new-bill\">Nouvelle note de frais</button>\n  </div>\n  <table id=\"example\" data-testid=\"tbody\">\n{}  </table>\n</div>\n",
        body
    )
}

pub fn render_error_page(message: &str) -> String {
    format!(
        "<div class=\"content\">\n  <div class=\"content-header\">\n    <div class=\"content-title\">Erreur</div>\n  </div>\n  <div data-testid=\"error-message\">{}</div>\n</div>\n",
        escape(message)
    )
}

/// The employee bills listing, the page a submission lands on.
pub struct BillsPage<S: BillStore> {
    store: Arc<S>,
}

impl<S: BillStore> BillsPage<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn get_bills(&self) -> Result<Vec<BillRow>> {
        let mut bills = self.store.list().await?;
        tracing::debug!("Listed {} bills", bills.len());
        sort_by_date_desc(&mut bills);
        Ok(bills.iter().map(BillRow::from).collect())
    }

    /// Listing markup, or the error page carrying the store's message
    /// verbatim when the list call fails.
    pub async fn render(&self) -> String {
        match self.get_bills().await {
            Ok(rows) => render_rows(&rows),
            Err(e) => {
                tracing::warn!("Could not list bills: {}", e);
                render_error_page(&e.to_string())
            }
        }
    }
}
