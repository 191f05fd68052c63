// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SplitError;

/// Net position per named member, in member list order.
/// Positive: the group owes them. Negative: they owe the group.
pub type Balances = IndexMap<String, Decimal>;

pub const DEFAULT_CATEGORY: &str = "Other";

/// Largest single expense, one trillion base units.
pub const MAX_EXPENSE_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

pub const EXPENSE_CATEGORIES: [&str; 6] = [
    "Food & Drinks",
    "Rent/Housing",
    "Transport",
    "Entertainment",
    "Shopping",
    DEFAULT_CATEGORY,
];

/// Resolve user input to the canonical category spelling.
pub fn canonical_category(input: &str) -> Result<&'static str, SplitError> {
    let wanted = input.trim();
    if wanted.is_empty() {
        return Ok(DEFAULT_CATEGORY);
    }
    EXPENSE_CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(wanted))
        .copied()
        .ok_or_else(|| SplitError::UnknownCategory(wanted.to_string()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub currency: String, // default for new expenses
    pub emoji: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String, // empty while the member is a placeholder
}

impl Member {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
        }
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

/// A strictly positive expense amount, at most [`MAX_EXPENSE_AMOUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, SplitError> {
        if value > Decimal::ZERO && value <= MAX_EXPENSE_AMOUNT {
            Ok(Self(value))
        } else {
            Err(SplitError::InvalidExpenseAmount(value.to_string()))
        }
    }

    /// Parse user input. Anything that is not a finite positive decimal up
    /// to the cap (including `NaN`, `inf`, `-3`, `0`, `abc`) is rejected.
    pub fn parse(s: &str) -> Result<Self, SplitError> {
        let raw = s.trim();
        let value = raw
            .parse::<Decimal>()
            .map_err(|_| SplitError::InvalidExpenseAmount(raw.to_string()))?;
        Self::new(value).map_err(|_| SplitError::InvalidExpenseAmount(raw.to_string()))
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = SplitError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(a: Amount) -> Self {
        a.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: Amount,
    pub currency: String,
    pub description: String,
    pub category: String,
    pub paid_by: String,
    pub created_at: NaiveDateTime,
}

/// Immutable view of one group's members and expenses at a point in time.
#[derive(Debug, Clone, Default)]
pub struct GroupSnapshot {
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
}

impl GroupSnapshot {
    pub fn new(members: Vec<Member>, expenses: Vec<Expense>) -> Self {
        Self { members, expenses }
    }

    pub fn named_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_named())
    }

    pub fn has_member_named(&self, name: &str) -> bool {
        self.named_members().any(|m| m.name == name)
    }

    /// Expenses whose payer is not a named member anymore.
    pub fn orphaned_expenses(&self) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| !self.has_member_named(&e.paid_by))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: String,
    pub amount: Decimal,
}

/// One proposed transfer: `from` pays `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: Decimal, // base currency
    pub amounts: Vec<CurrencyAmount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_rejects_non_positive_and_garbage() {
        for raw in ["0", "-5", "abc", "", "NaN", "inf", "1e400"] {
            assert!(
                matches!(Amount::parse(raw), Err(SplitError::InvalidExpenseAmount(_))),
                "{raw} should be rejected"
            );
        }
        assert_eq!(
            Amount::parse(" 12.50 ").unwrap().value(),
            Decimal::new(1250, 2)
        );
    }

    #[test]
    fn amount_is_capped() {
        assert_eq!(MAX_EXPENSE_AMOUNT, Decimal::from(1_000_000_000_000_i64));
        assert!(Amount::new(MAX_EXPENSE_AMOUNT).is_ok());
        assert_eq!(
            Amount::parse("1000000000000.01"),
            Err(SplitError::InvalidExpenseAmount("1000000000000.01".into()))
        );
        assert!(Amount::parse("70000000000000000000000000000").is_err());
    }

    #[test]
    fn category_matching_is_case_insensitive() {
        assert_eq!(canonical_category("food & drinks").unwrap(), "Food & Drinks");
        assert_eq!(canonical_category("  ").unwrap(), DEFAULT_CATEGORY);
        assert!(canonical_category("Pets").is_err());
    }

    #[test]
    fn member_names_are_trimmed() {
        let m = Member::new(1, "  Alice ");
        assert_eq!(m.name, "Alice");
        assert!(!Member::new(2, "   ").is_named());
    }
}
