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

fn run_tx(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("consultant", sub)) => commands::consultants::handle(conn, sub),
        Some(("tx", sub)) => commands::transactions::handle(conn, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn seed_deal(conn: &mut Connection) {
    run_tx(
        conn,
        &[
            "brokerbook", "consultant", "add", "--name", "Ayse Demir", "--rate", "45",
            "--start-date", "2024-01-01",
        ],
    )
    .unwrap();
    run_tx(
        conn,
        &[
            "brokerbook", "tx", "add", "--property", "Seaview Flat", "--type", "sale",
            "--consultant", "Ayse Demir", "--date", "2025-05-02", "--revenue", "10000",
        ],
    )
    .unwrap();
}

#[test]
fn confirm_creates_exactly_one_payout_expense() {
    let mut conn = setup();
    seed_deal(&mut conn);

    run_tx(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "1"]).unwrap();

    let status: String = conn
        .query_row("SELECT status FROM transactions WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(status, "paid");

    let (n, category, amount, paid_by, is_paid): (i64, String, String, String, i64) = conn
        .query_row(
            "SELECT COUNT(*), category, amount, paid_by, is_paid
             FROM expenses WHERE transaction_id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .unwrap();
    assert_eq!(n, 1);
    assert_eq!(category, "commission-payout");
    assert_eq!(amount.parse::<rust_decimal::Decimal>().unwrap(), "4500".parse().unwrap());
    assert_eq!(paid_by, "office");
    assert_eq!(is_paid, 1);

    // Settlement leaves an APPROVE audit row behind.
    let audits: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM system_logs WHERE action='APPROVE' AND module='TRANSACTION'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(audits, 1);
}

#[test]
fn second_confirm_is_rejected_and_writes_nothing() {
    let mut conn = setup();
    seed_deal(&mut conn);

    run_tx(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "1"]).unwrap();
    let err = run_tx(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "1"]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::AlreadySettled(1))
    );

    let expenses: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses WHERE transaction_id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(expenses, 1);
}

#[test]
fn confirm_unknown_transaction_fails() {
    let mut conn = setup();
    let err = run_tx(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "99"]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::TransactionNotFound(99))
    );
}

#[test]
fn dangling_consultant_aborts_settlement() {
    let mut conn = setup();
    seed_deal(&mut conn);
    // Simulate external corruption: the consultant row vanishes.
    conn.pragma_update(None, "foreign_keys", false).unwrap();
    conn.execute("DELETE FROM consultants WHERE id=1", []).unwrap();

    let err = run_tx(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "1"]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::ConsultantNotFound(1))
    );

    // The abort must leave the transaction pending and no expense behind.
    let status: String = conn
        .query_row("SELECT status FROM transactions WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(status, "pending");
    let expenses: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses", [], |r| r.get(0))
        .unwrap();
    assert_eq!(expenses, 0);
}

#[test]
fn duplicate_confirm_answer_survives_lost_consultant() {
    let mut conn = setup();
    seed_deal(&mut conn);
    run_tx(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "1"]).unwrap();

    // Even with the consultant row gone, a second confirm still reports
    // the settlement state, not the missing consultant.
    conn.pragma_update(None, "foreign_keys", false).unwrap();
    conn.execute("DELETE FROM consultants WHERE id=1", []).unwrap();

    let err = run_tx(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "1"]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::AlreadySettled(1))
    );
}

#[test]
fn payout_amount_ignores_later_rate_change() {
    let mut conn = setup();
    seed_deal(&mut conn);
    run_tx(
        &mut conn,
        &["brokerbook", "consultant", "set-rate", "--name", "Ayse Demir", "--rate", "60"],
    )
    .unwrap();

    run_tx(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "1"]).unwrap();
    let amount: String = conn
        .query_row("SELECT amount FROM expenses WHERE transaction_id=1", [], |r| r.get(0))
        .unwrap();
    // Frozen at creation from the 45% rate, not recomputed at 60%.
    assert_eq!(amount.parse::<rust_decimal::Decimal>().unwrap(), "4500".parse().unwrap());
}
