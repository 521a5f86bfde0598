// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit::{self, Action, Module};
use crate::domain::allocation::Allocation;
use crate::domain::error::DomainError;
use crate::domain::settlement;
use crate::models::{PaymentStatus, TransactionKind};
use crate::utils::{
    fmt_money, id_for_consultant, load_consultant, load_transaction, maybe_print_json, parse_date,
    parse_decimal, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("confirm-payment", sub)) => confirm_payment(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn actor(sub: &clap::ArgMatches) -> String {
    sub.get_one::<String>("actor")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "office".into())
}

/// Create a transaction. The revenue split is computed exactly once here,
/// from the consultant's current rate, and stored; later rate changes or
/// edits never touch the four share columns.
fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let property = sub.get_one::<String>("property").unwrap();
    let kind: TransactionKind = sub
        .get_one::<String>("type")
        .unwrap()
        .parse()
        .map_err(anyhow::Error::msg)?;
    let customer = sub.get_one::<String>("customer").unwrap();
    let customer_phone = sub.get_one::<String>("customer-phone").unwrap();
    let consultant_name = sub.get_one::<String>("consultant").unwrap();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let revenue = parse_decimal(sub.get_one::<String>("revenue").unwrap())?;
    let description = sub.get_one::<String>("description").map(|s| s.to_string());

    let consultant_id = id_for_consultant(conn, consultant_name)?;
    let consultant = load_consultant(conn, consultant_id)?
        .ok_or(DomainError::ConsultantNotFound(consultant_id))?;
    if !consultant.is_active {
        return Err(anyhow::anyhow!(
            "Consultant '{}' is inactive",
            consultant.full_name
        ));
    }

    let alloc = Allocation::compute(revenue, consultant.commission_rate)?;
    conn.execute(
        "INSERT INTO transactions(property_name, kind, customer_name, customer_phone,
            consultant_id, date, gross_revenue, office_revenue, consultant_share,
            partner_a_share, partner_b_share, status, description)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,'pending',?12)",
        params![
            property,
            kind.to_string(),
            customer,
            customer_phone,
            consultant_id,
            date.to_string(),
            revenue.to_string(),
            alloc.office_revenue().to_string(),
            alloc.consultant_share().to_string(),
            alloc.partner_a_share().to_string(),
            alloc.partner_b_share().to_string(),
            description
        ],
    )?;
    let id = conn.last_insert_rowid();
    audit::record(
        conn,
        &actor(sub),
        Action::Create,
        Module::Transaction,
        &format!("Transaction created: {} ({}) id={}", property, kind, id),
    )?;
    println!(
        "Recorded {} '{}' on {}: gross {}, consultant {}, office {}",
        kind,
        property,
        date,
        fmt_money(&revenue),
        fmt_money(&alloc.consultant_share()),
        fmt_money(&alloc.office_revenue())
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub property: String,
    pub kind: String,
    pub consultant: String,
    pub gross_revenue: String,
    pub consultant_share: String,
    pub office_revenue: String,
    pub status: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.property_name, t.kind, c.full_name, t.gross_revenue,
                t.consultant_share, t.office_revenue, t.status
         FROM transactions t LEFT JOIN consultants c ON t.consultant_id=c.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(name) = sub.get_one::<String>("consultant") {
        sql.push_str(" AND c.full_name=?");
        params_vec.push(name.into());
    }
    if let Some(status) = sub.get_one::<String>("status") {
        let status: PaymentStatus = status.parse().map_err(anyhow::Error::msg)?;
        sql.push_str(" AND t.status=?");
        params_vec.push(status.to_string());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let consultant: Option<String> = r.get(4)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            property: r.get(2)?,
            kind: r.get(3)?,
            consultant: consultant.unwrap_or_default(),
            gross_revenue: r.get(5)?,
            consultant_share: r.get(6)?,
            office_revenue: r.get(7)?,
            status: r.get(8)?,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.property.clone(),
                    r.kind.clone(),
                    r.consultant.clone(),
                    r.gross_revenue.clone(),
                    r.consultant_share.clone(),
                    r.office_revenue.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Property", "Type", "Consultant", "Gross", "Commission", "Office", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

/// Only descriptive fields may change. Revenue and the four share
/// columns are deliberately not accepted here.
fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if load_transaction(conn, id)?.is_none() {
        return Err(DomainError::TransactionNotFound(id).into());
    }

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();
    if let Some(p) = sub.get_one::<String>("property") {
        sets.push("property_name=?".into());
        values.push(p.clone());
    }
    if let Some(c) = sub.get_one::<String>("customer") {
        sets.push("customer_name=?".into());
        values.push(c.clone());
    }
    if let Some(c) = sub.get_one::<String>("customer-phone") {
        sets.push("customer_phone=?".into());
        values.push(c.clone());
    }
    if let Some(d) = sub.get_one::<String>("date") {
        sets.push("date=?".into());
        values.push(parse_date(d)?.to_string());
    }
    if let Some(d) = sub.get_one::<String>("description") {
        sets.push("description=?".into());
        values.push(d.clone());
    }
    if sets.is_empty() {
        println!("Nothing to change for transaction {}", id);
        return Ok(());
    }
    let sql = format!("UPDATE transactions SET {} WHERE id=?", sets.join(", "));
    values.push(id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> =
        values.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    conn.execute(&sql, rusqlite::params_from_iter(params))?;
    audit::record(
        conn,
        &actor(sub),
        Action::Update,
        Module::Transaction,
        &format!("Transaction updated: id={}", id),
    )?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(DomainError::TransactionNotFound(id).into());
    }
    audit::record(
        conn,
        &actor(sub),
        Action::Delete,
        Module::Transaction,
        &format!("Transaction deleted: id={}", id),
    )?;
    println!("Removed transaction {}", id);
    Ok(())
}

/// Settle a pending transaction: flip it to paid and book the commission
/// payout expense, both inside one storage transaction so the books can
/// never hold one write without the other. A second confirm is rejected
/// with `AlreadySettled` and writes nothing.
pub fn confirm_payment(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let who = actor(sub);

    let db_tx = conn.transaction()?;
    let tx =
        load_transaction(&db_tx, id)?.ok_or(DomainError::TransactionNotFound(id))?;
    // Answer a duplicate confirm the same way no matter what else has
    // happened to the books since the first one.
    if tx.status == PaymentStatus::Paid {
        return Err(DomainError::AlreadySettled(id).into());
    }
    let consultant = load_consultant(&db_tx, tx.consultant_id)?
        .ok_or(DomainError::ConsultantNotFound(tx.consultant_id))?;

    let today = chrono::Utc::now().date_naive();
    let draft = settlement::settle(&tx, &consultant, today)?;

    db_tx.execute(
        "UPDATE transactions SET status='paid' WHERE id=?1",
        params![id],
    )?;
    db_tx.execute(
        "INSERT INTO expenses(category, amount, date, description, paid_by, is_paid, transaction_id)
         VALUES (?1,?2,?3,?4,?5,1,?6)",
        params![
            draft.category.to_string(),
            draft.amount.to_string(),
            draft.date.to_string(),
            draft.description,
            draft.paid_by.to_string(),
            draft.transaction_id
        ],
    )?;
    audit::record(
        &db_tx,
        &who,
        Action::Approve,
        Module::Transaction,
        &format!(
            "Commission payout approved: tx={} consultant='{}' amount={}",
            id,
            consultant.full_name,
            fmt_money(&draft.amount)
        ),
    )?;
    db_tx.commit().context("Commit settlement")?;

    println!(
        "Settled transaction {}: paid {} to {} and booked the payout expense",
        id,
        fmt_money(&draft.amount),
        consultant.full_name
    );
    Ok(())
}
