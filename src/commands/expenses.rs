// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit::{self, Action, Module};
use crate::domain::error::DomainError;
use crate::models::{ExpenseCategory, Payer};
use crate::utils::{
    id_for_vendor, load_expense, maybe_print_json, parse_date, parse_decimal, pretty_table,
};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn actor(sub: &clap::ArgMatches) -> String {
    sub.get_one::<String>("actor")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "office".into())
}

/// Manual expense entry. The commission-payout category is reserved for
/// settlement so payouts can never be double-counted in the shared pool.
fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category: ExpenseCategory = sub
        .get_one::<String>("category")
        .unwrap()
        .parse()
        .map_err(anyhow::Error::msg)?;
    if category == ExpenseCategory::CommissionPayout {
        return Err(DomainError::ReservedCategory.into());
    }
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount < rust_decimal::Decimal::ZERO {
        return Err(anyhow::anyhow!("Expense amount must be non-negative, got {}", amount));
    }
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let paid_by: Payer = sub
        .get_one::<String>("paid-by")
        .unwrap()
        .parse()
        .map_err(anyhow::Error::msg)?;
    let description = sub.get_one::<String>("description").unwrap();
    let notes = sub.get_one::<String>("notes").map(|s| s.to_string());
    let is_paid = sub.get_flag("paid");
    let vendor_id = match sub.get_one::<String>("vendor") {
        Some(name) => Some(id_for_vendor(conn, name)?),
        None => None,
    };

    conn.execute(
        "INSERT INTO expenses(category, amount, date, description, paid_by, is_paid, vendor_id, notes)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            category.to_string(),
            amount.to_string(),
            date.to_string(),
            description,
            paid_by.to_string(),
            is_paid as i64,
            vendor_id,
            notes
        ],
    )?;
    audit::record(
        conn,
        &actor(sub),
        Action::Create,
        Module::Expense,
        &format!("Expense added: {} {} on {}", category, amount, date),
    )?;
    println!("Recorded {} expense of {} on {} (paid by {})", category, amount, date, paid_by);
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub amount: String,
    pub paid_by: String,
    pub paid: bool,
    pub vendor: String,
    pub description: String,
    pub transaction_id: Option<i64>,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT e.id, e.date, e.category, e.amount, e.paid_by, e.is_paid, v.name,
                e.description, e.transaction_id
         FROM expenses e LEFT JOIN vendors v ON e.vendor_id=v.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(e.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        let cat: ExpenseCategory = cat.parse().map_err(anyhow::Error::msg)?;
        sql.push_str(" AND e.category=?");
        params_vec.push(cat.to_string());
    }
    sql.push_str(" ORDER BY e.date DESC, e.id DESC");

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
        let vendor: Option<String> = r.get(6)?;
        data.push(ExpenseRow {
            id: r.get(0)?,
            date: r.get(1)?,
            category: r.get(2)?,
            amount: r.get(3)?,
            paid_by: r.get(4)?,
            paid: r.get::<_, i64>(5)? != 0,
            vendor: vendor.unwrap_or_default(),
            description: r.get(7)?,
            transaction_id: r.get(8)?,
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
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.clone(),
                    e.category.clone(),
                    e.amount.clone(),
                    e.paid_by.clone(),
                    if e.paid { "yes".into() } else { "no".into() },
                    e.vendor.clone(),
                    e.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Category", "Amount", "Paid by", "Paid", "Vendor", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

/// Expenses synthesized at settlement (those carrying a transaction
/// back-reference) are immutable; everything else can be corrected.
fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = load_expense(conn, id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;
    if existing.transaction_id.is_some() {
        return Err(DomainError::ImmutableExpense(id).into());
    }

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();
    if let Some(cat) = sub.get_one::<String>("category") {
        let cat: ExpenseCategory = cat.parse().map_err(anyhow::Error::msg)?;
        if cat == ExpenseCategory::CommissionPayout {
            return Err(DomainError::ReservedCategory.into());
        }
        sets.push("category=?".into());
        values.push(cat.to_string());
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        sets.push("amount=?".into());
        values.push(parse_decimal(a)?.to_string());
    }
    if let Some(d) = sub.get_one::<String>("date") {
        sets.push("date=?".into());
        values.push(parse_date(d)?.to_string());
    }
    if let Some(p) = sub.get_one::<String>("paid-by") {
        let p: Payer = p.parse().map_err(anyhow::Error::msg)?;
        sets.push("paid_by=?".into());
        values.push(p.to_string());
    }
    if let Some(d) = sub.get_one::<String>("description") {
        sets.push("description=?".into());
        values.push(d.clone());
    }
    if let Some(n) = sub.get_one::<String>("notes") {
        sets.push("notes=?".into());
        values.push(n.clone());
    }
    if let Some(p) = sub.get_one::<String>("paid") {
        let flag = match p.to_lowercase().as_str() {
            "true" | "yes" | "1" => 1,
            "false" | "no" | "0" => 0,
            other => return Err(anyhow::anyhow!("Invalid --paid '{}' (use true|false)", other)),
        };
        sets.push("is_paid=?".into());
        values.push(flag.to_string());
    }
    if sets.is_empty() {
        println!("Nothing to change for expense {}", id);
        return Ok(());
    }
    let sql = format!("UPDATE expenses SET {} WHERE id=?", sets.join(", "));
    values.push(id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> =
        values.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    conn.execute(&sql, rusqlite::params_from_iter(params))?;
    audit::record(
        conn,
        &actor(sub),
        Action::Update,
        Module::Expense,
        &format!("Expense updated: id={}", id),
    )?;
    println!("Updated expense {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = load_expense(conn, id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;
    if existing.transaction_id.is_some() {
        return Err(DomainError::ImmutableExpense(id).into());
    }
    conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
    audit::record(
        conn,
        &actor(sub),
        Action::Delete,
        Module::Expense,
        &format!("Expense deleted: id={}", id),
    )?;
    println!("Removed expense {}", id);
    Ok(())
}
