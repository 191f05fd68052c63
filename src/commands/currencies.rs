// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{BASE_CURRENCY, normalize_code, parse_rate, round_money};
use crate::error::SplitError;
use crate::store::load_currency_table;
use crate::utils::{parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => list(conn)?,
        Some(("set", sub)) => {
            let code = normalize_code(sub.get_one::<String>("code").unwrap())?;
            let symbol = sub.get_one::<String>("symbol").unwrap().trim();
            let rate = parse_rate(sub.get_one::<String>("rate").unwrap())?;
            set_currency(conn, &code, symbol, rate)?;
            println!("1 {} = {} {} ({})", BASE_CURRENCY, rate, code, symbol);
        }
        Some(("rm", sub)) => {
            let code = normalize_code(sub.get_one::<String>("code").unwrap())?;
            remove_currency(conn, &code)?;
            println!("Removed currency {}", code);
        }
        Some(("convert", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let from = normalize_code(sub.get_one::<String>("from").unwrap())?;
            let to = normalize_code(sub.get_one::<String>("to").unwrap())?;
            let res = load_currency_table(conn)?.convert(amount, &from, &to)?;
            println!("{} {} -> {} {}", amount, from, round_money(res), to);
        }
        _ => {}
    }
    Ok(())
}

/// Insert or update a display rate. New codes go to the end of the table.
pub fn set_currency(conn: &Connection, code: &str, symbol: &str, rate: Decimal) -> Result<()> {
    if code == BASE_CURRENCY && rate != Decimal::ONE {
        return Err(SplitError::InvalidRate(rate.to_string()).into());
    }
    conn.execute(
        "INSERT INTO currencies(code, symbol, rate, position)
         VALUES (?1, ?2, ?3, (SELECT IFNULL(MAX(position), -1) + 1 FROM currencies))
         ON CONFLICT(code) DO UPDATE SET symbol=excluded.symbol, rate=excluded.rate",
        params![code, symbol, rate.to_string()],
    )?;
    tracing::info!(code, %rate, "currency rate set");
    Ok(())
}

pub fn remove_currency(conn: &Connection, code: &str) -> Result<()> {
    if code == BASE_CURRENCY {
        anyhow::bail!("{} is the base currency and cannot be removed", BASE_CURRENCY);
    }
    let in_use: i64 = conn.query_row(
        "SELECT COUNT(*) FROM groups WHERE currency=?1",
        params![code],
        |r| r.get(0),
    )?;
    if in_use > 0 {
        anyhow::bail!("{} is the default currency of {} group(s)", code, in_use);
    }
    let n = conn.execute("DELETE FROM currencies WHERE code=?1", params![code])?;
    if n == 0 {
        return Err(SplitError::UnknownCurrency(code.to_string()).into());
    }
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let table = load_currency_table(conn)?;
    let data = table
        .iter()
        .map(|(code, info)| vec![code.clone(), info.symbol.clone(), info.rate.to_string()])
        .collect();
    println!(
        "{}",
        pretty_table(&["Code", "Symbol", &format!("Per 1 {}", BASE_CURRENCY)], data)
    );
    Ok(())
}
