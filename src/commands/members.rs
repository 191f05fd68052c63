// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::SplitError;
use crate::models::{Group, Member};
use crate::store::{Ledger, find_group};
use crate::utils::{opt_arg, parse_id, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let Some((cmd, sub)) = m.subcommand() else {
        return Ok(());
    };
    let group = find_group(conn, sub.get_one::<String>("group").unwrap())?;
    match cmd {
        "add" => {
            let name = opt_arg(sub, "name").unwrap_or_default();
            let id = add_member(conn, &group, &name)?;
            if name.is_empty() {
                println!("Added placeholder member {} to '{}'", id, group.name);
            } else {
                println!("Added '{}' to '{}' (id {})", name, group.name, id);
            }
        }
        "rename" => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            let old = rename_member(conn, &group, id, name)?;
            println!("Renamed member {}: '{}' -> '{}'", id, old, name.trim());
        }
        "rm" => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let removed = remove_member(conn, &group, id)?;
            println!("Removed member {} ('{}')", id, removed.name);
        }
        "list" => {
            let data = conn
                .list_members(group.id)?
                .into_iter()
                .map(|m| {
                    let shown = if m.is_named() {
                        m.name
                    } else {
                        "(unnamed)".to_string()
                    };
                    vec![m.id.to_string(), shown]
                })
                .collect();
            println!("{}", pretty_table(&["ID", "Name"], data));
        }
        _ => {}
    }
    Ok(())
}

fn ensure_unique(
    conn: &Connection,
    group: &Group,
    name: &str,
    except: Option<i64>,
) -> Result<()> {
    if name.is_empty() {
        return Ok(());
    }
    let taken = conn
        .list_members(group.id)?
        .into_iter()
        .any(|m| m.name == name && Some(m.id) != except);
    if taken {
        return Err(SplitError::DuplicateMember {
            group: group.name.clone(),
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Add a member; an empty name creates a placeholder.
pub fn add_member(conn: &Connection, group: &Group, name: &str) -> Result<i64> {
    let name = name.trim();
    ensure_unique(conn, group, name, None)?;
    conn.execute(
        "INSERT INTO members(group_id, name) VALUES (?1, ?2)",
        params![group.id, name],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(group = %group.name, id, name, "member added");
    Ok(id)
}

fn member_in_group(conn: &Connection, group: &Group, id: i64) -> Result<Member> {
    conn.list_members(group.id)?
        .into_iter()
        .find(|m| m.id == id)
        .ok_or_else(|| anyhow!("Member {} not found in group '{}'", id, group.name))
}

/// Returns the previous name. Expenses keep the payer name they were logged
/// with, so renaming a payer orphans their expenses.
pub fn rename_member(conn: &Connection, group: &Group, id: i64, name: &str) -> Result<String> {
    let name = name.trim();
    let current = member_in_group(conn, group, id)?;
    ensure_unique(conn, group, name, Some(id))?;
    conn.execute(
        "UPDATE members SET name=?1 WHERE id=?2",
        params![name, id],
    )?;
    let paid: i64 = conn.query_row(
        "SELECT COUNT(*) FROM expenses WHERE group_id=?1 AND paid_by=?2",
        params![group.id, current.name],
        |r| r.get(0),
    )?;
    if current.is_named() && paid > 0 && current.name != name {
        tracing::warn!(
            group = %group.name,
            old = %current.name,
            new = name,
            expenses = paid,
            "renamed member still named as payer on older expenses"
        );
    }
    Ok(current.name)
}

pub fn remove_member(conn: &Connection, group: &Group, id: i64) -> Result<Member> {
    let member = member_in_group(conn, group, id)?;
    conn.execute("DELETE FROM members WHERE id=?1", params![id])?;
    tracing::info!(group = %group.name, id, name = %member.name, "member removed");
    Ok(member)
}
