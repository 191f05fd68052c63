// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{CurrencyTable, normalize_code};
use crate::error::SplitError;
use crate::models::{Amount, Group, GroupSnapshot, canonical_category};
use crate::store::{Ledger, find_group, load_currency_table};
use crate::utils::{maybe_print_json, opt_arg, parse_id, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let group = find_group(conn, sub.get_one::<String>("group").unwrap())?;
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let n = conn.execute(
                "DELETE FROM expenses WHERE id=?1 AND group_id=?2",
                params![id, group.id],
            )?;
            if n == 0 {
                return Err(anyhow!("Expense {} not found in group '{}'", id, group.name));
            }
            tracing::info!(group = %group.name, id, "expense removed");
            println!("Removed expense {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Raw user input for a new expense, before validation.
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub amount: String,
    pub paid_by: String,
    pub description: String,
    pub currency: Option<String>,
    pub category: Option<String>,
}

/// An expense that passed every boundary check and may be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Amount,
    pub currency: String,
    pub description: String,
    pub category: String,
    pub paid_by: String,
}

/// Boundary checks, in order: the group has members, the amount is a positive
/// decimal, the description is present, the currency and category are known,
/// and the payer is a named member right now.
pub fn validate_expense(
    group: &Group,
    snapshot: &GroupSnapshot,
    currencies: &CurrencyTable,
    input: &ExpenseInput,
) -> Result<NewExpense, SplitError> {
    if snapshot.members.is_empty() {
        return Err(SplitError::EmptyGroup(group.name.clone()));
    }
    let amount = Amount::parse(&input.amount)?;
    let description = input.description.trim();
    if description.is_empty() {
        return Err(SplitError::EmptyDescription);
    }
    let currency = match input.currency.as_deref() {
        Some(c) if !c.trim().is_empty() => normalize_code(c)?,
        _ => group.currency.clone(),
    };
    if !currencies.contains(&currency) {
        return Err(SplitError::UnknownCurrency(currency));
    }
    let category = canonical_category(input.category.as_deref().unwrap_or(""))?;
    let paid_by = input.paid_by.trim();
    if !snapshot.has_member_named(paid_by) {
        return Err(SplitError::UnknownPayer {
            group: group.name.clone(),
            payer: paid_by.to_string(),
        });
    }
    Ok(NewExpense {
        amount,
        currency,
        description: description.to_string(),
        category: category.to_string(),
        paid_by: paid_by.to_string(),
    })
}

pub fn add_expense(conn: &Connection, group: &Group, input: &ExpenseInput) -> Result<i64> {
    let snapshot = conn.snapshot(group.id)?;
    let currencies = load_currency_table(conn)?;
    let e = validate_expense(group, &snapshot, &currencies, input)?;
    conn.execute(
        "INSERT INTO expenses(group_id, amount, currency, description, category, paid_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            group.id,
            e.amount.to_string(),
            e.currency,
            e.description,
            e.category,
            e.paid_by
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(group = %group.name, id, amount = %e.amount, payer = %e.paid_by, "expense added");
    Ok(id)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group = find_group(conn, sub.get_one::<String>("group").unwrap())?;
    let input = ExpenseInput {
        amount: sub.get_one::<String>("amount").unwrap().clone(),
        paid_by: sub.get_one::<String>("paid-by").unwrap().clone(),
        description: sub.get_one::<String>("description").unwrap().clone(),
        currency: opt_arg(sub, "currency"),
        category: opt_arg(sub, "category"),
    };
    let id = add_expense(conn, &group, &input)?;
    println!(
        "Recorded expense {}: {} {} paid by {} ('{}')",
        id,
        input.amount.trim(),
        input.currency.as_deref().unwrap_or(&group.currency).to_uppercase(),
        input.paid_by.trim(),
        input.description.trim()
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub category: String,
    pub paid_by: String,
    pub amount: String,
    pub currency: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let group = find_group(conn, sub.get_one::<String>("group").unwrap())?;
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    let rows = conn
        .list_expenses(group.id)?
        .into_iter()
        .take(limit)
        .map(|e| ExpenseRow {
            id: e.id,
            date: e.created_at.format("%Y-%m-%d %H:%M").to_string(),
            description: e.description,
            category: e.category,
            paid_by: e.paid_by,
            amount: e.amount.to_string(),
            currency: e.currency,
        })
        .collect();
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.paid_by.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Category", "Paid by", "Amount", "CCY"],
                rows,
            )
        );
    }
    Ok(())
}
