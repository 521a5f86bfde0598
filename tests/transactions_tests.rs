// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use brokerbook::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

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
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn seed_consultant(conn: &mut Connection, name: &str, rate: &str) {
    run(
        conn,
        &[
            "brokerbook", "consultant", "add", "--name", name, "--rate", rate,
            "--start-date", "2024-01-01",
        ],
    )
    .unwrap();
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn shares(conn: &Connection, id: i64) -> (Decimal, Decimal, Decimal, Decimal, Decimal) {
    conn.query_row(
        "SELECT gross_revenue, office_revenue, consultant_share, partner_a_share, partner_b_share
         FROM transactions WHERE id=?1",
        [id],
        |r| {
            Ok((
                r.get::<_, String>(0)?.parse().unwrap(),
                r.get::<_, String>(1)?.parse().unwrap(),
                r.get::<_, String>(2)?.parse().unwrap(),
                r.get::<_, String>(3)?.parse().unwrap(),
                r.get::<_, String>(4)?.parse().unwrap(),
            ))
        },
    )
    .unwrap()
}

#[test]
fn add_stores_conserving_split() {
    let mut conn = setup();
    seed_consultant(&mut conn, "Ayse Demir", "50");
    run(
        &mut conn,
        &[
            "brokerbook", "tx", "add", "--property", "Hillside Villa", "--type", "sale",
            "--consultant", "Ayse Demir", "--date", "2025-06-10", "--revenue", "40000",
        ],
    )
    .unwrap();
    let (gross, office, consultant, a, b) = shares(&conn, 1);
    assert_eq!(gross, d("40000"));
    assert_eq!(consultant, d("20000"));
    assert_eq!(office, d("20000"));
    assert_eq!(a, d("10000"));
    assert_eq!(b, d("10000"));
    assert_eq!(office + consultant, gross);
    assert_eq!(a + b, office);
}

#[test]
fn rate_change_only_affects_future_transactions() {
    let mut conn = setup();
    seed_consultant(&mut conn, "Ayse Demir", "45");
    run(
        &mut conn,
        &[
            "brokerbook", "tx", "add", "--property", "First", "--type", "sale",
            "--consultant", "Ayse Demir", "--date", "2025-06-01", "--revenue", "10000",
        ],
    )
    .unwrap();
    run(
        &mut conn,
        &["brokerbook", "consultant", "set-rate", "--name", "Ayse Demir", "--rate", "60"],
    )
    .unwrap();
    run(
        &mut conn,
        &[
            "brokerbook", "tx", "add", "--property", "Second", "--type", "sale",
            "--consultant", "Ayse Demir", "--date", "2025-06-02", "--revenue", "10000",
        ],
    )
    .unwrap();

    let (_, _, share1, _, _) = shares(&conn, 1);
    let (_, _, share2, _, _) = shares(&conn, 2);
    assert_eq!(share1, d("4500"));
    assert_eq!(share2, d("6000"));
}

#[test]
fn edit_never_touches_the_frozen_split() {
    let mut conn = setup();
    seed_consultant(&mut conn, "Ayse Demir", "45");
    run(
        &mut conn,
        &[
            "brokerbook", "tx", "add", "--property", "Seaview Flat", "--type", "sale",
            "--consultant", "Ayse Demir", "--date", "2025-06-01", "--revenue", "10000",
        ],
    )
    .unwrap();
    let before = shares(&conn, 1);
    run(
        &mut conn,
        &[
            "brokerbook", "tx", "edit", "--id", "1", "--property", "Seaview Flat (renamed)",
            "--date", "2025-06-05", "--customer", "New Customer",
        ],
    )
    .unwrap();
    let after = shares(&conn, 1);
    assert_eq!(before, after);
    let name: String = conn
        .query_row("SELECT property_name FROM transactions WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(name, "Seaview Flat (renamed)");
}

#[test]
fn inactive_consultant_cannot_take_new_deals() {
    let mut conn = setup();
    seed_consultant(&mut conn, "Ayse Demir", "45");
    run(
        &mut conn,
        &["brokerbook", "consultant", "deactivate", "--name", "Ayse Demir"],
    )
    .unwrap();
    let err = run(
        &mut conn,
        &[
            "brokerbook", "tx", "add", "--property", "Late Deal", "--type", "rent",
            "--consultant", "Ayse Demir", "--date", "2025-06-01", "--revenue", "1000",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("inactive"));
}

#[test]
fn list_limit_respected() {
    let mut conn = setup();
    seed_consultant(&mut conn, "Ayse Demir", "45");
    for i in 1..=3 {
        run(
            &mut conn,
            &[
                "brokerbook", "tx", "add", "--property", "P", "--type", "sale",
                "--consultant", "Ayse Demir", "--date", &format!("2025-01-0{}", i),
                "--revenue", "1000",
            ],
        )
        .unwrap();
    }
    let matches = cli::build_cli().get_matches_from(["brokerbook", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = commands::transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn rm_hard_deletes() {
    let mut conn = setup();
    seed_consultant(&mut conn, "Ayse Demir", "45");
    run(
        &mut conn,
        &[
            "brokerbook", "tx", "add", "--property", "Gone", "--type", "sale",
            "--consultant", "Ayse Demir", "--date", "2025-06-01", "--revenue", "1000",
        ],
    )
    .unwrap();
    run(&mut conn, &["brokerbook", "tx", "rm", "--id", "1"]).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}
