//! Validation of the expense editor form.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    expense::{Amount, Category, Expense, ExpenseId, ItemName},
};

/// The raw form data submitted by the expense editor.
///
/// Every field is kept as text so that invalid input can be shown back to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
}

/// The validation error message for each form field, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub item_name: Option<&'static str>,
    pub category: Option<&'static str>,
    pub amount: Option<&'static str>,
}

/// The fields of an expense that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub item_name: ItemName,
    pub category: Category,
    pub amount: Amount,
}

impl ValidExpense {
    /// A new expense with a freshly generated ID.
    pub fn into_new_expense(self) -> Expense {
        Expense::new(self.item_name, self.category, self.amount)
    }

    /// An updated copy of the expense with the ID `id`.
    pub fn into_expense_with_id(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            item_name: self.item_name,
            category: self.category,
            amount: self.amount,
        }
    }
}

impl ExpenseForm {
    /// Fill the form with the fields of an existing expense.
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            item_name: expense.item_name.to_string(),
            category: expense.category.to_string(),
            amount: expense.amount.value().to_string(),
        }
    }

    /// Check every field and collect the error message for each invalid field.
    ///
    /// # Errors
    ///
    /// Returns the [FieldErrors] if any field is invalid.
    pub fn validate(&self) -> Result<ValidExpense, FieldErrors> {
        let item_name = ItemName::new(&self.item_name).map_err(|error| match error {
            Error::EmptyItemName => "Item name is required",
            _ => "Maximum 30 characters",
        });

        let category = self
            .category
            .parse::<Category>()
            .map_err(|_| "Please select a category");

        let amount = match self.amount.trim().parse::<f64>() {
            Ok(amount) => Amount::new(amount).map_err(|error| match error {
                Error::AmountOutOfRange(_) => "Amount must be between $0.01 and $1,000,000,000",
                _ => "Amount must be positive",
            }),
            Err(_) => Err("Amount is required"),
        };

        match (item_name, category, amount) {
            (Ok(item_name), Ok(category), Ok(amount)) => Ok(ValidExpense {
                item_name,
                category,
                amount,
            }),
            (item_name, category, amount) => Err(FieldErrors {
                item_name: item_name.err(),
                category: category.err(),
                amount: amount.err(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::expense::{Amount, Category, ExpenseForm, ItemName};

    use super::ValidExpense;

    fn valid_form() -> ExpenseForm {
        ExpenseForm {
            item_name: "Scratching Post".to_owned(),
            category: "Furniture".to_owned(),
            amount: "42.5".to_owned(),
        }
    }

    #[test]
    fn valid_form_passes() {
        let got = valid_form().validate();

        assert_eq!(
            got,
            Ok(ValidExpense {
                item_name: ItemName::new_unchecked("Scratching Post"),
                category: Category::Furniture,
                amount: Amount::new(42.5).unwrap(),
            })
        );
    }

    #[test]
    fn empty_item_name_is_required() {
        let form = ExpenseForm {
            item_name: "".to_owned(),
            ..valid_form()
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.item_name, Some("Item name is required"));
        assert_eq!(errors.category, None);
        assert_eq!(errors.amount, None);
    }

    #[test]
    fn long_item_name_is_rejected() {
        let form = ExpenseForm {
            item_name: "a".repeat(31),
            ..valid_form()
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.item_name, Some("Maximum 30 characters"));
    }

    #[test]
    fn missing_category_is_rejected() {
        let form = ExpenseForm {
            category: "".to_owned(),
            ..valid_form()
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.category, Some("Please select a category"));
    }

    #[test]
    fn zero_amount_is_rejected() {
        let form = ExpenseForm {
            amount: "0".to_owned(),
            ..valid_form()
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.amount, Some("Amount must be positive"));
    }

    #[test]
    fn sub_cent_amount_is_out_of_range() {
        let form = ExpenseForm {
            amount: "0.001".to_owned(),
            ..valid_form()
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(
            errors.amount,
            Some("Amount must be between $0.01 and $1,000,000,000")
        );
    }

    #[test]
    fn huge_amount_is_out_of_range() {
        let form = ExpenseForm {
            amount: "1e15".to_owned(),
            ..valid_form()
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(
            errors.amount,
            Some("Amount must be between $0.01 and $1,000,000,000")
        );
    }

    #[test]
    fn non_numeric_amount_is_required() {
        let form = ExpenseForm {
            amount: "lots".to_owned(),
            ..valid_form()
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.amount, Some("Amount is required"));
    }

    #[test]
    fn reports_every_invalid_field() {
        let errors = ExpenseForm::default().validate().unwrap_err();

        assert!(errors.item_name.is_some());
        assert!(errors.category.is_some());
        assert!(errors.amount.is_some());
    }
}
