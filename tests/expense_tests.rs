// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use brokerbook::domain::error::DomainError;
use brokerbook::{cli, commands, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("consultant", sub)) => commands::consultants::handle(conn, sub),
        Some(("tx", sub)) => commands::transactions::handle(conn, sub),
        Some(("expense", sub)) => commands::expenses::handle(conn, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn manual_commission_payout_is_rejected() {
    let mut conn = setup();
    let err = run(
        &mut conn,
        &[
            "brokerbook", "expense", "add", "--category", "commission-payout", "--amount",
            "1000", "--date", "2025-06-01", "--paid-by", "office",
        ],
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::ReservedCategory)
    );
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn manual_expense_is_editable() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "brokerbook", "expense", "add", "--category", "supplies", "--amount", "250.50",
            "--date", "2025-06-01", "--paid-by", "partner-b",
        ],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "brokerbook", "expense", "edit", "--id", "1", "--amount", "300", "--paid", "true",
        ],
    )
    .unwrap();
    let (amount, is_paid): (String, i64) = conn
        .query_row("SELECT amount, is_paid FROM expenses WHERE id=1", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(amount.parse::<rust_decimal::Decimal>().unwrap(), "300".parse().unwrap());
    assert_eq!(is_paid, 1);
}

#[test]
fn settlement_generated_expense_is_immutable() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "brokerbook", "consultant", "add", "--name", "Ayse Demir", "--rate", "45",
            "--start-date", "2024-01-01",
        ],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "brokerbook", "tx", "add", "--property", "Seaview Flat", "--type", "sale",
            "--consultant", "Ayse Demir", "--date", "2025-05-02", "--revenue", "10000",
        ],
    )
    .unwrap();
    run(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "1"]).unwrap();

    let err = run(
        &mut conn,
        &["brokerbook", "expense", "edit", "--id", "1", "--amount", "1"],
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::ImmutableExpense(1))
    );

    let err = run(&mut conn, &["brokerbook", "expense", "rm", "--id", "1"]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::ImmutableExpense(1))
    );

    // Amount unchanged.
    let amount: String = conn
        .query_row("SELECT amount FROM expenses WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(amount.parse::<rust_decimal::Decimal>().unwrap(), "4500".parse().unwrap());
}

#[test]
fn list_filters_by_month_and_category() {
    let mut conn = setup();
    for (cat, date) in [
        ("supplies", "2025-06-01"),
        ("rent", "2025-06-02"),
        ("supplies", "2025-07-01"),
    ] {
        run(
            &mut conn,
            &[
                "brokerbook", "expense", "add", "--category", cat, "--amount", "100",
                "--date", date, "--paid-by", "office",
            ],
        )
        .unwrap();
    }
    let matches = cli::build_cli().get_matches_from([
        "brokerbook", "expense", "list", "--month", "2025-06", "--category", "supplies",
    ]);
    let sub = match matches.subcommand() {
        Some(("expense", m)) => match m.subcommand() {
            Some(("list", s)) => s,
            _ => panic!("no list subcommand"),
        },
        _ => panic!("no expense subcommand"),
    };
    let rows = commands::expenses::query_rows(&conn, sub).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2025-06-01");
    assert_eq!(rows[0].category, "supplies");
}
