use expense_bills::config::session::USER_KEY;
use expense_bills::domain::model::{BillRecord, BillStatus, ExpenseType, Route};
use expense_bills::domain::ports::{BillStore, FieldId, SessionStorage};
use expense_bills::{
    BillsPage, HistoryNavigator, InMemoryBillStore, LocalSessionStorage, NewBillController,
    NewBillForm, SubmitEvent,
};
use std::sync::Arc;

fn bill(name: &str, date: &str, status: BillStatus) -> BillRecord {
    BillRecord {
        id: Some(format!("id-{}", name)),
        email: "a@a".to_string(),
        expense_type: ExpenseType::Transports,
        name: name.to_string(),
        amount: Some(348.0),
        date: date.to_string(),
        vat: Some("70".to_string()),
        pct: 20,
        commentary: None,
        file_url: Some(format!("https://test.storage.tld/{}.jpg", name)),
        file_name: Some(format!("{}.jpg", name)),
        status,
    }
}

#[tokio::test]
async fn test_listing_renders_erreur_404_when_list_fails() {
    let store = Arc::new(InMemoryBillStore::new().failing_list(404));
    let html = BillsPage::new(store).render().await;
    assert!(html.contains("Erreur 404"));
}

#[tokio::test]
async fn test_listing_renders_erreur_500_when_list_fails() {
    let store = Arc::new(InMemoryBillStore::new().failing_list(500));
    let html = BillsPage::new(store).render().await;
    assert!(html.contains("Erreur 500"));
}

#[tokio::test]
async fn test_bills_are_ordered_most_recent_first() {
    let store = Arc::new(InMemoryBillStore::new().with_bills(vec![
        bill("a", "2001-01-01", BillStatus::Refused),
        bill("b", "2022-03-01", BillStatus::Pending),
        bill("c", "2004-04-04", BillStatus::Accepted),
    ]));

    let rows = BillsPage::new(store).get_bills().await.unwrap();
    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["1 Mar. 22", "4 Avr. 04", "1 Jan. 01"]);

    let statuses: Vec<&str> = rows.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(statuses, vec!["En attente", "Accepté", "Refused"]);
}

#[test]
fn test_listing_markup_contains_rows() {
    let store = Arc::new(
        InMemoryBillStore::new().with_bills(vec![bill("train", "2022-03-01", BillStatus::Pending)]),
    );
    let html = tokio_test::block_on(BillsPage::new(store).render());

    assert!(html.contains("Mes notes de frais"));
    assert!(html.contains("train"));
    assert!(html.contains("1 Mar. 22"));
    assert!(html.contains("https://test.storage.tld/train.jpg"));
    assert!(!html.contains("Erreur"));
}

#[tokio::test]
async fn test_submission_failure_surfaces_on_the_listing() {
    let store = Arc::new(InMemoryBillStore::new().failing_create(500).failing_list(500));

    let mut session = LocalSessionStorage::new();
    session.set_item(USER_KEY, r#"{"type":"Employee","email":"aa@aa.com"}"#);

    let form = NewBillForm::new();
    form.set_value(FieldId::ExpenseType, "Transports");
    form.set_value(FieldId::ExpenseName, "Vol");
    form.set_value(FieldId::Amount, "348");
    form.set_value(FieldId::Date, "2022-03-01");

    let navigator = Arc::new(HistoryNavigator::starting_at(Route::NewBill));
    let controller = NewBillController::new(
        Arc::clone(&store),
        Arc::new(form),
        Arc::clone(&navigator),
        &session,
    )
    .unwrap();

    let mut event = SubmitEvent::new();
    controller.on_submit(&mut event).unwrap().await.unwrap();
    assert_eq!(navigator.current(), Some(Route::Bills));

    let html = BillsPage::new(Arc::clone(&store)).render().await;
    assert!(html.contains("Erreur 500"));
    assert!(store.list().await.is_err());
}
