// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::balances::group_balances;
use crate::currency::round_money;
use crate::models::Settlement;
use crate::settle::compute_settlements;
use crate::store::load_currency_table;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use indexmap::IndexMap;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

/// A transfer as printed: every amount rounded to cents.
#[derive(Debug, Serialize)]
pub struct SettlementRow {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub amounts: IndexMap<String, Decimal>,
}

impl From<&Settlement> for SettlementRow {
    fn from(s: &Settlement) -> Self {
        Self {
            from: s.from.clone(),
            to: s.to.clone(),
            amount: round_money(s.amount),
            amounts: s
                .amounts
                .iter()
                .map(|a| (a.currency.clone(), round_money(a.amount)))
                .collect(),
        }
    }
}

pub fn group_settlements(conn: &Connection, group_name: &str) -> Result<Vec<Settlement>> {
    let balances = group_balances(conn, group_name)?;
    let currencies = load_currency_table(conn)?;
    Ok(compute_settlements(&balances, &currencies))
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group = sub.get_one::<String>("group").unwrap();
    let plan = group_settlements(conn, group)?;
    let rows: Vec<SettlementRow> = plan.iter().map(SettlementRow::from).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    if plan.is_empty() {
        println!("Everyone in '{}' is settled up", group.trim());
        return Ok(());
    }
    let currencies = load_currency_table(conn)?;
    let codes = currencies.codes();
    let mut headers = vec!["From", "To"];
    headers.extend(codes.iter().map(|c| c.as_str()));
    let data = plan
        .iter()
        .map(|s| {
            let mut row = vec![s.from.clone(), s.to.clone()];
            row.extend(
                s.amounts
                    .iter()
                    .map(|a| currencies.format(a.amount, &a.currency)),
            );
            row
        })
        .collect();
    println!("{}", pretty_table(&headers, data));
    Ok(())
}
