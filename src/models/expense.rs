//! Expense model
//!
//! A single shared cost (or income record): who paid, how much, and which
//! users share it. The split group is a set; duplicates are dropped on
//! construction and when records are normalised at the storage boundary.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ids::{ExpenseId, UserId};
use super::money::Money;

/// Largest amount, in whole currency units, a single record may carry
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Spending category of an expense
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transportation,
    Housing,
    Utilities,
    Entertainment,
    Healthcare,
    Shopping,
    #[default]
    Other,
}

impl ExpenseCategory {
    /// All categories in display order
    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Food,
            Self::Transportation,
            Self::Housing,
            Self::Utilities,
            Self::Entertainment,
            Self::Healthcare,
            Self::Shopping,
            Self::Other,
        ]
    }

    /// Parse a category from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "food" => Some(Self::Food),
            "transportation" | "transport" => Some(Self::Transportation),
            "housing" | "rent" => Some(Self::Housing),
            "utilities" => Some(Self::Utilities),
            "entertainment" => Some(Self::Entertainment),
            "healthcare" | "health" => Some(Self::Healthcare),
            "shopping" => Some(Self::Shopping),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Housing => "Housing",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Whether a record is a shared cost or money received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    #[default]
    Expense,
    Income,
}

impl ExpenseType {
    /// Parse an expense type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// A recorded expense or income
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Free-text description
    pub description: String,

    /// Positive amount
    pub amount: Money,

    /// Date of the expense (display and sorting only)
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,

    /// The user who paid
    #[serde(alias = "paidBy")]
    pub paid_by: UserId,

    /// Users sharing the cost
    #[serde(alias = "splitWith")]
    pub split_with: Vec<UserId>,

    /// Spending category
    #[serde(default)]
    pub category: ExpenseCategory,

    /// Expense or income
    #[serde(rename = "type", default)]
    pub expense_type: ExpenseType,

    /// When the expense was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense of type `expense` in category `other`
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        paid_by: UserId,
        split_with: impl IntoIterator<Item = UserId>,
    ) -> Self {
        let now = Utc::now();
        let mut expense = Self {
            id: ExpenseId::new(),
            description: description.into(),
            amount,
            date,
            paid_by,
            split_with: split_with.into_iter().collect(),
            category: ExpenseCategory::default(),
            expense_type: ExpenseType::default(),
            created_at: now,
            updated_at: now,
        };
        expense.normalize();
        expense
    }

    /// Set the category
    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the record type
    pub fn with_type(mut self, expense_type: ExpenseType) -> Self {
        self.expense_type = expense_type;
        self
    }

    /// Set a known id (imports, seeding)
    pub fn with_id(mut self, id: ExpenseId) -> Self {
        self.id = id;
        self
    }

    /// Trim the description and drop duplicate split members, keeping the
    /// first occurrence of each
    pub fn normalize(&mut self) {
        let trimmed = self.description.trim();
        if trimmed.len() != self.description.len() {
            self.description = trimmed.to_string();
        }

        let mut seen = std::collections::HashSet::new();
        self.split_with.retain(|id| seen.insert(id.clone()));
    }

    /// Whether this record is a shared cost
    pub fn is_expense(&self) -> bool {
        self.expense_type == ExpenseType::Expense
    }

    /// Whether the user paid for this record
    pub fn is_paid_by(&self, user: &UserId) -> bool {
        &self.paid_by == user
    }

    /// Whether the user is in the split group
    pub fn involves(&self, user: &UserId) -> bool {
        self.split_with.contains(user)
    }

    /// Each participant's exact share of the amount
    pub fn share(&self) -> Result<Money, ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }
        if self.amount.amount() > Decimal::from(MAX_AMOUNT_UNITS) {
            return Err(ExpenseValidationError::AmountTooLarge(self.amount));
        }
        self.amount
            .split_evenly(self.split_with.len())
            .ok_or(ExpenseValidationError::EmptySplitGroup)
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }

        if self.description.len() > 200 {
            return Err(ExpenseValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }

        self.share().map(|_| ())
    }

    /// Mark the record as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.amount)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    EmptySplitGroup,
    EmptyDescription,
    DescriptionTooLong(usize),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be positive, got {}", amount)
            }
            Self::AmountTooLarge(amount) => write!(
                f,
                "Amount too large ({}, max {})",
                amount,
                Money::new(Decimal::from(MAX_AMOUNT_UNITS))
            ),
            Self::EmptySplitGroup => write!(f, "Split group cannot be empty"),
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::DescriptionTooLong(len) => {
                write!(f, "Description too long ({} chars, max 200)", len)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Parse either a plain date or a full RFC 3339 timestamp (UTC date taken)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw)))
}
