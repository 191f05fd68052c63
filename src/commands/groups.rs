// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::normalize_code;
use crate::error::SplitError;
use crate::store::{Ledger, find_group, list_groups, load_currency_table};
use crate::utils::{opt_arg, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let ccy = sub.get_one::<String>("currency").unwrap();
            let emoji = opt_arg(sub, "emoji").unwrap_or_default();
            let id = create_group(conn, &name, ccy, &emoji)?;
            println!("Created group '{}' (id {})", name, id);
        }
        Some(("list", _)) => list(conn)?,
        Some(("show", sub)) => show(conn, sub.get_one::<String>("name").unwrap())?,
        Some(("rm", sub)) => {
            let group = find_group(conn, sub.get_one::<String>("name").unwrap())?;
            conn.execute("DELETE FROM groups WHERE id=?1", params![group.id])?;
            tracing::info!(group = %group.name, "group removed");
            println!("Removed group '{}' with its members and expenses", group.name);
        }
        _ => {}
    }
    Ok(())
}

pub fn create_group(conn: &Connection, name: &str, currency: &str, emoji: &str) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Group name must not be empty");
    }
    let ccy = normalize_code(currency)?;
    if !load_currency_table(conn)?.contains(&ccy) {
        return Err(SplitError::UnknownCurrency(ccy).into());
    }
    conn.execute(
        "INSERT INTO groups(name, currency, emoji) VALUES (?1, ?2, ?3)",
        params![name, ccy, emoji.trim()],
    )
    .with_context(|| format!("Group '{}' already exists", name))?;
    let id = conn.last_insert_rowid();
    tracing::info!(group = name, id, currency = %ccy, "group created");
    Ok(id)
}

fn list(conn: &Connection) -> Result<()> {
    let mut data = Vec::new();
    for g in list_groups(conn)? {
        let snap = conn.snapshot(g.id)?;
        data.push(vec![
            format!("{} {}", g.emoji, g.name).trim().to_string(),
            g.currency,
            snap.named_members().count().to_string(),
            snap.expenses.len().to_string(),
            g.created_at.to_string(),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["Group", "CCY", "Members", "Expenses", "Created"], data)
    );
    Ok(())
}

fn show(conn: &Connection, name: &str) -> Result<()> {
    let group = find_group(conn, name)?;
    let snap = conn.snapshot(group.id)?;
    let table = load_currency_table(conn)?;
    let total = snap
        .expenses
        .iter()
        .filter(|e| e.currency == group.currency)
        .map(|e| e.amount.value())
        .sum::<rust_decimal::Decimal>();
    println!(
        "{} {} (default currency {})",
        group.emoji, group.name, group.currency
    );
    println!(
        "{} members ({} placeholders), {} expenses, {} logged in {}",
        snap.members.len(),
        snap.members.len() - snap.named_members().count(),
        snap.expenses.len(),
        table.format(total, &group.currency),
        group.currency
    );
    Ok(())
}
