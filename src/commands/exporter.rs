// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::settle::group_settlements;
use crate::currency::round_money;
use crate::store::{Ledger, find_group, load_currency_table};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(conn, sub),
        Some(("settlements", sub)) => export_settlements(conn, sub),
        _ => Ok(()),
    }
}

fn target(sub: &clap::ArgMatches) -> Result<(String, String)> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let out = sub.get_one::<String>("out").unwrap().trim().to_string();
    Ok((fmt, out))
}

fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (fmt, out) = target(sub)?;
    let group = find_group(conn, sub.get_one::<String>("group").unwrap())?;
    let mut expenses = conn.list_expenses(group.id)?;
    expenses.reverse(); // oldest first in files

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(&out)?;
        wtr.write_record([
            "id",
            "created_at",
            "description",
            "category",
            "paid_by",
            "amount",
            "currency",
        ])?;
        for e in &expenses {
            wtr.write_record([
                e.id.to_string(),
                e.created_at.to_string(),
                e.description.clone(),
                e.category.clone(),
                e.paid_by.clone(),
                e.amount.to_string(),
                e.currency.clone(),
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(&out, serde_json::to_string_pretty(&expenses)?)?;
    }
    tracing::info!(group = %group.name, count = expenses.len(), out = %out, "expenses exported");
    println!("Exported {} expenses to {}", expenses.len(), out);
    Ok(())
}

fn export_settlements(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (fmt, out) = target(sub)?;
    let group = sub.get_one::<String>("group").unwrap();
    let plan = group_settlements(conn, group)?;
    let codes = load_currency_table(conn)?.codes();

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(&out)?;
        let mut header = vec!["from".to_string(), "to".to_string(), "amount".to_string()];
        header.extend(codes.iter().map(|c| c.to_lowercase()));
        wtr.write_record(&header)?;
        for s in &plan {
            let mut rec = vec![s.from.clone(), s.to.clone(), format!("{:.2}", round_money(s.amount))];
            rec.extend(s.amounts.iter().map(|a| format!("{:.2}", round_money(a.amount))));
            wtr.write_record(&rec)?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = plan
            .iter()
            .map(|s| {
                let amounts: serde_json::Map<String, serde_json::Value> = s
                    .amounts
                    .iter()
                    .map(|a| (a.currency.clone(), json!(format!("{:.2}", round_money(a.amount)))))
                    .collect();
                json!({
                    "from": s.from, "to": s.to, "amount": format!("{:.2}", round_money(s.amount)), "amounts": amounts
                })
            })
            .collect();
        std::fs::write(&out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported {} transfers to {}", plan.len(), out);
    Ok(())
}
