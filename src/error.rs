// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Validation failures raised at the data-entry boundary.
///
/// Balance and settlement computation never produce these; they are checked
/// before a record is accepted into a group.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("Invalid expense amount '{0}', expected a positive decimal up to 1000000000000")]
    InvalidExpenseAmount(String),
    #[error("Group '{0}' has no members")]
    EmptyGroup(String),
    #[error("Payer '{payer}' is not a named member of group '{group}'")]
    UnknownPayer { group: String, payer: String },
    #[error("Expense description must not be empty")]
    EmptyDescription,
    #[error("Unknown currency '{0}'")]
    UnknownCurrency(String),
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("Member name '{name}' is already used in group '{group}'")]
    DuplicateMember { group: String, name: String },
    #[error("Invalid conversion rate '{0}', expected a decimal between 0.000001 and 1000000")]
    InvalidRate(String),
    #[error("Amount '{0}' is too large to convert")]
    AmountOutOfRange(String),
    #[error("Invalid currency code '{0}', expected three letters")]
    InvalidCurrencyCode(String),
}
