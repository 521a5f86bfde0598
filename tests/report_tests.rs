// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use brokerbook::domain::reports::{partner_balance, period_summary};
use brokerbook::models::Partner;
use brokerbook::{cli, commands, db, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &mut Connection, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("consultant", sub)) => commands::consultants::handle(conn, sub).unwrap(),
        Some(("tx", sub)) => commands::transactions::handle(conn, sub).unwrap(),
        Some(("expense", sub)) => commands::expenses::handle(conn, sub).unwrap(),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn seed(conn: &mut Connection) {
    run(
        conn,
        &[
            "brokerbook", "consultant", "add", "--name", "Ayse Demir", "--rate", "50",
            "--start-date", "2024-01-01",
        ],
    );
    run(
        conn,
        &[
            "brokerbook", "consultant", "add", "--name", "Mehmet Kaya", "--rate", "45",
            "--start-date", "2024-03-01",
        ],
    );
    // Office revenue 20000.
    run(
        conn,
        &[
            "brokerbook", "tx", "add", "--property", "Hillside Villa", "--type", "sale",
            "--consultant", "Ayse Demir", "--date", "2025-06-10", "--revenue", "40000",
        ],
    );
    // Office revenue 5500.
    run(
        conn,
        &[
            "brokerbook", "tx", "add", "--property", "Harbor Office", "--type", "rent",
            "--consultant", "Mehmet Kaya", "--date", "2025-06-20", "--revenue", "10000",
        ],
    );
    // Outside the window; must not leak into June reports.
    run(
        conn,
        &[
            "brokerbook", "tx", "add", "--property", "Old Town Flat", "--type", "sale",
            "--consultant", "Ayse Demir", "--date", "2025-07-01", "--revenue", "99999",
        ],
    );
    run(
        conn,
        &[
            "brokerbook", "expense", "add", "--category", "marketing", "--amount", "15000",
            "--date", "2025-06-15", "--paid-by", "partner-a", "--paid",
        ],
    );
}

fn june_window(conn: &Connection) -> (Vec<brokerbook::models::Transaction>, Vec<brokerbook::models::Expense>) {
    let matches = cli::build_cli().get_matches_from([
        "brokerbook", "report", "partners", "--month", "2025-06",
    ]);
    let sub = match matches.subcommand() {
        Some(("report", m)) => match m.subcommand() {
            Some(("partners", s)) => s,
            _ => panic!("no partners subcommand"),
        },
        _ => panic!("no report subcommand"),
    };
    let (start, end) = utils::period_from_args(sub).unwrap();
    let txs = utils::load_transactions_between(conn, start, end).unwrap();
    let exps = utils::load_expenses_between(conn, start, end).unwrap();
    (txs, exps)
}

#[test]
fn partner_balances_match_worked_example() {
    let mut conn = setup();
    seed(&mut conn);
    let (txs, exps) = june_window(&conn);
    assert_eq!(txs.len(), 2);
    assert_eq!(exps.len(), 1);

    let a = partner_balance(Partner::A, &txs, &exps);
    assert_eq!(a.gross_share, d("12750"));
    assert_eq!(a.share_of_expenses, d("7500"));
    assert_eq!(a.net_profit_share, d("5250"));
    assert_eq!(a.paid_expenses, d("15000"));
    assert_eq!(a.total_balance, d("20250"));

    let b = partner_balance(Partner::B, &txs, &exps);
    assert_eq!(b.total_balance, d("5250"));
}

#[test]
fn balances_reconcile_with_summary() {
    let mut conn = setup();
    seed(&mut conn);
    let (txs, exps) = june_window(&conn);

    let s = period_summary(&txs, &exps);
    assert_eq!(s.turnover, d("50000"));
    assert_eq!(s.office_revenue, d("25500"));
    assert_eq!(s.total_expenses, d("15000"));
    assert_eq!(s.net_profit, d("10500"));

    let a = partner_balance(Partner::A, &txs, &exps);
    let b = partner_balance(Partner::B, &txs, &exps);
    let fronted = a.paid_expenses + b.paid_expenses;
    assert_eq!(a.total_balance + b.total_balance, s.net_profit + fronted);
}

#[test]
fn payout_expense_flows_into_partner_pool_once_settled() {
    let mut conn = setup();
    seed(&mut conn);
    // Settle the 10000 deal: adds a 4500 payout expense dated today, so
    // reconcile over a window that includes both June and today.
    run(&mut conn, &["brokerbook", "tx", "confirm-payment", "--id", "2"]);

    let start = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let end = chrono::Utc::now().date_naive();
    let txs = utils::load_transactions_between(&conn, start, end).unwrap();
    let exps = utils::load_expenses_between(&conn, start, end).unwrap();

    let payouts: Vec<_> = exps
        .iter()
        .filter(|e| e.category == brokerbook::models::ExpenseCategory::CommissionPayout)
        .collect();
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0].amount, d("4500"));

    let a = partner_balance(Partner::A, &txs, &exps);
    let b = partner_balance(Partner::B, &txs, &exps);
    let office: Decimal = txs.iter().map(|t| t.office_revenue).sum();
    let spent: Decimal = exps.iter().map(|e| e.amount).sum();
    let fronted = a.paid_expenses + b.paid_expenses;
    assert_eq!(a.total_balance + b.total_balance, office - spent + fronted);
}

#[test]
fn empty_window_reports_zeros() {
    let mut conn = setup();
    seed(&mut conn);
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
    let txs = utils::load_transactions_between(&conn, start, end).unwrap();
    let exps = utils::load_expenses_between(&conn, start, end).unwrap();
    assert!(txs.is_empty());
    assert!(exps.is_empty());
    let a = partner_balance(Partner::A, &txs, &exps);
    assert_eq!(a.total_balance, Decimal::ZERO);
    let s = period_summary(&txs, &exps);
    assert_eq!(s.net_profit, Decimal::ZERO);
}
