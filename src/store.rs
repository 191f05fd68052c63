// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::currency::{CurrencyTable, parse_rate};
use crate::models::{Amount, Expense, Group, GroupSnapshot, Member};

/// Read side of group persistence. Balances and settlements only ever
/// need these two listings.
pub trait Ledger {
    /// Members in creation order.
    fn list_members(&self, group_id: i64) -> Result<Vec<Member>>;
    /// Expenses, newest first.
    fn list_expenses(&self, group_id: i64) -> Result<Vec<Expense>>;

    fn snapshot(&self, group_id: i64) -> Result<GroupSnapshot> {
        Ok(GroupSnapshot::new(
            self.list_members(group_id)?,
            self.list_expenses(group_id)?,
        ))
    }
}

impl Ledger for Connection {
    fn list_members(&self, group_id: i64) -> Result<Vec<Member>> {
        let mut stmt =
            self.prepare("SELECT id, name FROM members WHERE group_id=?1 ORDER BY created_at, id")?;
        let rows = stmt.query_map(params![group_id], |r| {
            Ok(Member {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn list_expenses(&self, group_id: i64) -> Result<Vec<Expense>> {
        let mut stmt = self.prepare(
            "SELECT id, amount, currency, description, category, paid_by, created_at
             FROM expenses WHERE group_id=?1 ORDER BY created_at DESC, id DESC",
        )?;
        let mut cur = stmt.query(params![group_id])?;
        let mut out = Vec::new();
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let raw: String = r.get(1)?;
            let amount = Amount::parse(&raw)
                .with_context(|| format!("Stored amount for expense {} is corrupt", id))?;
            out.push(Expense {
                id,
                amount,
                currency: r.get(2)?,
                description: r.get(3)?,
                category: r.get(4)?,
                paid_by: r.get(5)?,
                created_at: r.get(6)?,
            });
        }
        Ok(out)
    }
}

pub fn find_group(conn: &Connection, name: &str) -> Result<Group> {
    let name = name.trim();
    conn.query_row(
        "SELECT id, name, currency, emoji, created_at FROM groups WHERE name=?1",
        params![name],
        |r| {
            Ok(Group {
                id: r.get(0)?,
                name: r.get(1)?,
                currency: r.get(2)?,
                emoji: r.get(3)?,
                created_at: r.get(4)?,
            })
        },
    )
    .optional()?
    .with_context(|| format!("Group '{}' not found", name))
}

pub fn list_groups(conn: &Connection) -> Result<Vec<Group>> {
    let mut stmt =
        conn.prepare("SELECT id, name, currency, emoji, created_at FROM groups ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Group {
            id: r.get(0)?,
            name: r.get(1)?,
            currency: r.get(2)?,
            emoji: r.get(3)?,
            created_at: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn load_currency_table(conn: &Connection) -> Result<CurrencyTable> {
    let mut stmt = conn.prepare("SELECT code, symbol, rate FROM currencies ORDER BY position, code")?;
    let mut cur = stmt.query([])?;
    let mut table = CurrencyTable::default();
    while let Some(r) = cur.next()? {
        let code: String = r.get(0)?;
        let symbol: String = r.get(1)?;
        let rate: String = r.get(2)?;
        let rate = parse_rate(&rate).with_context(|| format!("Stored rate for {}", code))?;
        table.insert(&code, &symbol, rate);
    }
    Ok(table)
}
