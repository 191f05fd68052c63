// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use splitclip::commands::{balances, expenses, groups, members, settle};
use splitclip::store::find_group;
use splitclip::{Ledger, SplitError, cli, db};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let gid = groups::create_group(&conn, "Trip", "usd", "🏕️").unwrap();
    let group = find_group(&conn, "Trip").unwrap();
    assert_eq!(group.id, gid);
    members::add_member(&conn, &group, "Alice").unwrap();
    members::add_member(&conn, &group, "Bob").unwrap();
    conn
}

fn run_expense(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["splitclip", "expense"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("expense", m)) = matches.subcommand() {
        expenses::handle(conn, m)
    } else {
        panic!("expense command not parsed");
    }
}

fn split_err(err: anyhow::Error) -> SplitError {
    err.downcast::<SplitError>().expect("expected a SplitError")
}

#[test]
fn add_expense_then_balances_and_settle() {
    let conn = setup();
    run_expense(
        &conn,
        &[
            "add", "-g", "Trip", "--amount", " 100 ", "--paid-by", " Alice ", "--description",
            "Groceries run",
        ],
    )
    .unwrap();

    let b = balances::group_balances(&conn, "Trip").unwrap();
    assert_eq!(b["Alice"], Decimal::from(50));
    assert_eq!(b["Bob"], Decimal::from(-50));

    let plan = settle::group_settlements(&conn, "Trip").unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].from, "Bob");
    assert_eq!(plan[0].to, "Alice");
    assert_eq!(plan[0].amount, Decimal::from(50));
}

#[test]
fn expense_defaults_to_group_currency_and_other_category() {
    let conn = setup();
    run_expense(
        &conn,
        &["add", "-g", "Trip", "--amount", "12.5", "--paid-by", "Bob", "--description", "Taxi"],
    )
    .unwrap();
    let group = find_group(&conn, "Trip").unwrap();
    let stored = conn.list_expenses(group.id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].currency, "USD");
    assert_eq!(stored[0].category, "Other");
    assert_eq!(stored[0].amount.value(), Decimal::new(125, 1));
}

#[test]
fn category_is_canonicalised() {
    let conn = setup();
    run_expense(
        &conn,
        &[
            "add", "-g", "Trip", "--amount", "8", "--paid-by", "Bob", "--description", "Bus",
            "--category", "transport", "--currency", "eur",
        ],
    )
    .unwrap();
    let group = find_group(&conn, "Trip").unwrap();
    let e = &conn.list_expenses(group.id).unwrap()[0];
    assert_eq!(e.category, "Transport");
    assert_eq!(e.currency, "EUR");
}

#[test]
fn rejects_bad_amounts() {
    let conn = setup();
    for bad in ["0", "-5", "ten", "NaN"] {
        let err = run_expense(
            &conn,
            &["add", "-g", "Trip", "--amount", bad, "--paid-by", "Alice", "--description", "x"],
        )
        .unwrap_err();
        assert!(
            matches!(split_err(err), SplitError::InvalidExpenseAmount(_)),
            "{bad} accepted"
        );
    }
    let group = find_group(&conn, "Trip").unwrap();
    assert!(conn.list_expenses(group.id).unwrap().is_empty());
}

#[test]
fn oversized_amounts_are_rejected_and_capped_ones_settle() {
    let conn = setup();
    let err = run_expense(
        &conn,
        &[
            "add", "-g", "Trip", "--amount", "70000000000000000000000000000", "--paid-by", "Alice",
            "--description", "yacht",
        ],
    )
    .unwrap_err();
    assert!(matches!(split_err(err), SplitError::InvalidExpenseAmount(_)));

    for _ in 0..2 {
        run_expense(
            &conn,
            &["add", "-g", "Trip", "--amount", "1000000000000", "--paid-by", "Alice", "--description", "yacht"],
        )
        .unwrap();
    }
    let plan = settle::group_settlements(&conn, "Trip").unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].amount, Decimal::from(1_000_000_000_000_i64));
    let cad = plan[0].amounts.iter().find(|a| a.currency == "CAD").unwrap();
    assert_eq!(cad.amount, Decimal::from(1_350_000_000_000_i64));
}

#[test]
fn rejects_unknown_payer() {
    let conn = setup();
    let err = run_expense(
        &conn,
        &["add", "-g", "Trip", "--amount", "10", "--paid-by", "Mallory", "--description", "x"],
    )
    .unwrap_err();
    assert_eq!(
        split_err(err),
        SplitError::UnknownPayer {
            group: "Trip".into(),
            payer: "Mallory".into()
        }
    );
}

#[test]
fn rejects_expense_in_empty_group() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    groups::create_group(&conn, "Solo", "USD", "").unwrap();
    let err = run_expense(
        &conn,
        &["add", "-g", "Solo", "--amount", "10", "--paid-by", "Me", "--description", "x"],
    )
    .unwrap_err();
    assert_eq!(split_err(err), SplitError::EmptyGroup("Solo".into()));
    assert!(balances::group_balances(&conn, "Solo").unwrap().is_empty());
}

#[test]
fn rejects_unknown_currency_and_category() {
    let conn = setup();
    let err = run_expense(
        &conn,
        &[
            "add", "-g", "Trip", "--amount", "10", "--paid-by", "Bob", "--description", "x",
            "--currency", "JPY",
        ],
    )
    .unwrap_err();
    assert_eq!(split_err(err), SplitError::UnknownCurrency("JPY".into()));

    let err = run_expense(
        &conn,
        &[
            "add", "-g", "Trip", "--amount", "10", "--paid-by", "Bob", "--description", "x",
            "--category", "Pets",
        ],
    )
    .unwrap_err();
    assert_eq!(split_err(err), SplitError::UnknownCategory("Pets".into()));
}

#[test]
fn list_is_newest_first_and_limited() {
    let conn = setup();
    for (amt, desc) in [("1", "first"), ("2", "second"), ("3", "third")] {
        run_expense(
            &conn,
            &["add", "-g", "Trip", "--amount", amt, "--paid-by", "Alice", "--description", desc],
        )
        .unwrap();
    }
    let matches =
        cli::build_cli().get_matches_from(["splitclip", "expense", "list", "-g", "Trip", "--limit", "2"]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("no expense subcommand");
    };
    let Some(("list", list_m)) = exp_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = expenses::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].description, "third");
    assert_eq!(rows[1].description, "second");
}

#[test]
fn rm_only_touches_own_group() {
    let conn = setup();
    run_expense(
        &conn,
        &["add", "-g", "Trip", "--amount", "10", "--paid-by", "Alice", "--description", "x"],
    )
    .unwrap();
    groups::create_group(&conn, "Other", "USD", "").unwrap();
    let group = find_group(&conn, "Trip").unwrap();
    let id = conn.list_expenses(group.id).unwrap()[0].id.to_string();

    assert!(run_expense(&conn, &["rm", "-g", "Other", "--id", &id]).is_err());
    run_expense(&conn, &["rm", "-g", "Trip", "--id", &format!(" {id} ")]).unwrap();
    assert!(conn.list_expenses(group.id).unwrap().is_empty());
}
