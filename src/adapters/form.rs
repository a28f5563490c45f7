use crate::core::form_collector::COLLECTED_FIELDS;
use crate::domain::model::FormValues;
use crate::domain::ports::{FieldId, FormView};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const INVALID_CLASS: &str = "is-invalid";
pub const ACCEPTED_CLASS: &str = "blue-border";

#[derive(Debug, Default)]
struct FormState {
    values: HashMap<FieldId, String>,
    file_classes: BTreeSet<String>,
    error_message: Option<String>,
}

/// In-memory view-model of the new bill form.
#[derive(Debug)]
pub struct NewBillForm {
    state: Mutex<FormState>,
}

impl NewBillForm {
    /// Every field present and empty, file control unstyled.
    pub fn new() -> Self {
        let mut values: HashMap<FieldId, String> = COLLECTED_FIELDS
            .iter()
            .map(|field| (*field, String::new()))
            .collect();
        values.insert(FieldId::File, String::new());

        Self {
            state: Mutex::new(FormState {
                values,
                ..FormState::default()
            }),
        }
    }

    pub fn from_values(values: &FormValues) -> Self {
        let form = Self::new();
        form.set_value(FieldId::ExpenseType, &values.expense_type);
        form.set_value(FieldId::ExpenseName, &values.name);
        form.set_value(FieldId::Amount, &values.amount);
        form.set_value(FieldId::Date, &values.date);
        form.set_value(FieldId::Vat, &values.vat);
        form.set_value(FieldId::Pct, &values.pct);
        form.set_value(FieldId::Commentary, &values.commentary);
        form
    }

    // A panic while holding the lock leaves plain data behind; keep using it.
    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_value(&self, field: FieldId, value: &str) {
        self.lock().values.insert(field, value.to_string());
    }

    pub fn remove_field(&self, field: FieldId) {
        self.lock().values.remove(&field);
    }

    pub fn has_file_class(&self, class: &str) -> bool {
        self.lock().file_classes.contains(class)
    }

    pub fn file_classes(&self) -> Vec<String> {
        self.lock().file_classes.iter().cloned().collect()
    }

    /// Text of the rejection message element, `None` when the element is absent.
    pub fn error_message(&self) -> Option<String> {
        self.lock().error_message.clone()
    }
}

impl Default for NewBillForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FormView for NewBillForm {
    fn field_value(&self, field: FieldId) -> Option<String> {
        self.lock().values.get(&field).cloned()
    }

    fn show_file_accepted(&self) {
        let mut state = self.lock();
        state.file_classes.remove(INVALID_CLASS);
        state.file_classes.insert(ACCEPTED_CLASS.to_string());
        state.error_message = None;
    }

    fn show_file_rejected(&self, message: &str) {
        let mut state = self.lock();
        state.file_classes.remove(ACCEPTED_CLASS);
        state.file_classes.insert(INVALID_CLASS.to_string());
        state.error_message = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_then_accepted_toggles_classes() {
        let form = NewBillForm::new();
        assert!(form.file_classes().is_empty());
        assert!(form.error_message().is_none());

        form.show_file_rejected("bad file");
        assert!(form.has_file_class(INVALID_CLASS));
        assert!(!form.has_file_class(ACCEPTED_CLASS));
        assert_eq!(form.error_message().as_deref(), Some("bad file"));

        form.show_file_accepted();
        assert!(!form.has_file_class(INVALID_CLASS));
        assert!(form.has_file_class(ACCEPTED_CLASS));
        assert!(form.error_message().is_none());
    }

    #[test]
    fn test_rejecting_twice_keeps_a_single_message() {
        let form = NewBillForm::new();
        form.show_file_rejected("first");
        form.show_file_rejected("second");
        assert_eq!(form.error_message().as_deref(), Some("second"));
        assert_eq!(form.file_classes(), vec![INVALID_CLASS.to_string()]);
    }
}
