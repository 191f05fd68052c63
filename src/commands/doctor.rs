// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Group;
use crate::store::{Ledger, find_group, list_groups, load_currency_table};
use crate::utils::{opt_arg, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashSet;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let groups = match opt_arg(m, "group") {
        Some(name) => vec![find_group(conn, &name)?],
        None => list_groups(conn)?,
    };
    let mut rows = Vec::new();
    for g in &groups {
        rows.extend(diagnose(conn, g)?);
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Group", "Issue", "Detail"], rows));
    }
    Ok(())
}

/// One row per problem: `[group, issue, detail]`.
pub fn diagnose(conn: &Connection, group: &Group) -> Result<Vec<Vec<String>>> {
    let snap = conn.snapshot(group.id)?;
    let currencies = load_currency_table(conn)?;
    let mut rows = Vec::new();
    let mut push = |issue: &str, detail: String| {
        rows.push(vec![group.name.clone(), issue.to_string(), detail]);
    };

    // 1) Payers that no longer match a named member
    for e in snap.orphaned_expenses() {
        push(
            "orphaned_payer",
            format!("expense {} paid by '{}'", e.id, e.paid_by),
        );
    }

    // 2) Placeholders still count toward every split
    for m in snap.members.iter().filter(|m| !m.is_named()) {
        push("unnamed_member", format!("member {}", m.id));
    }

    // 3) Duplicate names merge into one balance. Member commands refuse
    // them, so these only come from rows written outside the tool.
    let mut seen = HashSet::new();
    for m in snap.named_members() {
        if !seen.insert(m.name.as_str()) {
            push("duplicate_name", format!("'{}' (member {})", m.name, m.id));
        }
    }

    // 4) Currencies removed from the table after expenses were logged
    for e in snap.expenses.iter().filter(|e| !currencies.contains(&e.currency)) {
        push(
            "unknown_currency",
            format!("expense {} in {}", e.id, e.currency),
        );
    }

    if !snap.expenses.is_empty() && snap.named_members().next().is_none() {
        push("no_named_members", format!("{} expenses", snap.expenses.len()));
    }
    Ok(rows)
}
