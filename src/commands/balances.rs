// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balance::compute_balances;
use crate::currency::{BASE_CURRENCY, round_money};
use crate::models::Balances;
use crate::settle::EPSILON;
use crate::store::{Ledger, find_group, load_currency_table};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BalanceRow {
    pub member: String,
    pub balance: Decimal,
}

pub fn group_balances(conn: &Connection, group_name: &str) -> Result<Balances> {
    let group = find_group(conn, group_name)?;
    let snap = conn.snapshot(group.id)?;
    let orphaned = snap.orphaned_expenses().len();
    if orphaned > 0 {
        tracing::warn!(
            group = %group.name,
            orphaned,
            "expenses paid by non-members are not credited to anyone"
        );
    }
    Ok(compute_balances(&snap.members, &snap.expenses))
}

fn status(b: Decimal) -> &'static str {
    if b.abs() <= EPSILON {
        "settled"
    } else if b.is_sign_positive() {
        "gets back"
    } else {
        "owes"
    }
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let balances = group_balances(conn, sub.get_one::<String>("group").unwrap())?;
    let rows: Vec<BalanceRow> = balances
        .iter()
        .map(|(member, balance)| BalanceRow {
            member: member.clone(),
            balance: round_money(*balance),
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let table = load_currency_table(conn)?;
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.member.clone(),
                table.format(r.balance, BASE_CURRENCY),
                status(r.balance).to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Member", "Balance", "Status"], data));
    Ok(())
}
