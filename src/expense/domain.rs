//! Core expense domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

use crate::{
    Error,
    table::{CellValue, TableRow},
};

/// The maximum number of characters in an item name.
pub const MAX_ITEM_NAME_LENGTH: usize = 30;

/// The unique, immutable identifier of an expense.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Generate a fresh, random ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<&str> for ExpenseId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for ExpenseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated item name: trimmed, non-empty and at most [MAX_ITEM_NAME_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Create an item name from `name` with leading and trailing whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyItemName] if `name` is empty after trimming,
    /// or [Error::ItemNameTooLong] if it has more than [MAX_ITEM_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();
        let length = name.graphemes(true).count();

        if length == 0 {
            Err(Error::EmptyItemName)
        } else if length > MAX_ITEM_NAME_LENGTH {
            Err(Error::ItemNameTooLong(length))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create an item name without validation.
    ///
    /// The caller should ensure that the string is trimmed, not empty and not too long.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the invariants
    /// are violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ItemName::new(&value)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

impl Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an expense was spent on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Food and treats.
    Food,
    /// Beds, scratching posts, litter boxes and the like.
    Furniture,
    /// Collars, toys and other things a cat wears or plays with.
    Accessory,
}

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 3] = [Category::Food, Category::Furniture, Category::Accessory];

    /// The name shown to the user, also used in form data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Furniture => "Furniture",
            Category::Accessory => "Accessory",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The largest amount accepted for a single expense.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// An amount of money spent, in whole cents from $0.01 to [MAX_AMOUNT].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// Create an amount from `amount`, rounded to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `amount` is not finite or not greater than zero, or
    /// [Error::AmountOutOfRange] if it rounds to less than one cent or is more than [MAX_AMOUNT].
    pub fn new(amount: f64) -> Result<Self, Error> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        let cents = (amount * 100.0).round() / 100.0;

        if cents < 0.01 || cents > MAX_AMOUNT {
            return Err(Error::AmountOutOfRange(amount));
        }

        Ok(Self(cents))
    }

    /// Create an amount without validation.
    ///
    /// The caller should ensure that `amount` is finite and greater than zero.
    pub fn new_unchecked(amount: f64) -> Self {
        Self(amount)
    }

    /// The amount as a plain number.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

/// Something bought for the cat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Assigned on creation and never changed by edits.
    pub id: ExpenseId,
    /// What was bought.
    pub item_name: ItemName,
    /// What kind of thing was bought.
    pub category: Category,
    /// How much it cost.
    pub amount: Amount,
}

impl Expense {
    /// Create an expense with a freshly generated ID.
    pub fn new(item_name: ItemName, category: Category, amount: Amount) -> Self {
        Self {
            id: ExpenseId::generate(),
            item_name,
            category,
            amount,
        }
    }
}

/// The fields of an [Expense] that can be shown in a table column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpenseField {
    ItemName,
    Category,
    Amount,
}

impl TableRow for Expense {
    type Id = ExpenseId;
    type Field = ExpenseField;

    fn id(&self) -> &ExpenseId {
        &self.id
    }

    fn value(&self, field: ExpenseField) -> CellValue {
        match field {
            ExpenseField::ItemName => CellValue::Text(self.item_name.to_string()),
            ExpenseField::Category => CellValue::Text(self.category.to_string()),
            ExpenseField::Amount => CellValue::Number(self.amount.value()),
        }
    }
}
