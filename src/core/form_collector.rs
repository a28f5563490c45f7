use crate::domain::model::FormValues;
use crate::domain::ports::{FieldId, FormView};
use crate::utils::error::{BillError, Result};

/// Fields read on submit. The file control is handled on change instead.
pub const COLLECTED_FIELDS: [FieldId; 7] = [
    FieldId::ExpenseType,
    FieldId::ExpenseName,
    FieldId::Amount,
    FieldId::Date,
    FieldId::Vat,
    FieldId::Pct,
    FieldId::Commentary,
];

fn read<V: FormView + ?Sized>(view: &V, field: FieldId) -> Result<String> {
    view.field_value(field)
        .ok_or_else(|| BillError::MissingFieldError {
            field: field.test_id().to_string(),
        })
}

/// Reads every bill field from the view. A missing field means the view and
/// the controller disagree on the form layout, so it is an error, not a blank.
pub fn collect<V: FormView + ?Sized>(view: &V) -> Result<FormValues> {
    let values = FormValues {
        expense_type: read(view, FieldId::ExpenseType)?,
        name: read(view, FieldId::ExpenseName)?,
        amount: read(view, FieldId::Amount)?,
        date: read(view, FieldId::Date)?,
        vat: read(view, FieldId::Vat)?,
        pct: read(view, FieldId::Pct)?,
        commentary: read(view, FieldId::Commentary)?,
    };
    tracing::debug!("Collected {} form fields", COLLECTED_FIELDS.len());
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::form::NewBillForm;

    #[test]
    fn test_collect_returns_values_unmodified() {
        let form = NewBillForm::new();
        form.set_value(FieldId::ExpenseType, "Transports");
        form.set_value(FieldId::ExpenseName, "  Vol Paris ");
        form.set_value(FieldId::Amount, "348");
        form.set_value(FieldId::Date, "2022-03-01");
        form.set_value(FieldId::Vat, "70");
        form.set_value(FieldId::Pct, "20");
        form.set_value(FieldId::Commentary, "séminaire");

        let values = collect(&form).unwrap();
        assert_eq!(values.expense_type, "Transports");
        assert_eq!(values.name, "  Vol Paris ");
        assert_eq!(values.amount, "348");
        assert_eq!(values.date, "2022-03-01");
        assert_eq!(values.commentary, "séminaire");
    }

    #[test]
    fn test_missing_field_is_a_contract_error() {
        let form = NewBillForm::new();
        form.remove_field(FieldId::Pct);

        let err = collect(&form).unwrap_err();
        match err {
            BillError::MissingFieldError { field } => assert_eq!(field, "pct"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
