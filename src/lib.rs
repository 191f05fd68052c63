// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod balance;
pub mod cli;
pub mod commands;
pub mod currency;
pub mod db;
pub mod error;
pub mod models;
pub mod settle;
pub mod store;
pub mod utils;

pub use balance::compute_balances;
pub use currency::CurrencyTable;
pub use error::SplitError;
pub use models::{Balances, Expense, GroupSnapshot, Member, Settlement};
pub use settle::{EPSILON, compute_settlements};
pub use store::Ledger;
