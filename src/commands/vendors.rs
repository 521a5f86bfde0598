// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit::{self, Action, Module};
use crate::models::ExpenseCategory;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let contact = sub.get_one::<String>("contact").map(|s| s.to_string());
    let phone = sub.get_one::<String>("phone").unwrap();
    let category: ExpenseCategory = sub
        .get_one::<String>("category")
        .unwrap()
        .parse()
        .map_err(anyhow::Error::msg)?;
    let notes = sub.get_one::<String>("notes").map(|s| s.to_string());
    conn.execute(
        "INSERT INTO vendors(name, contact_person, phone, category, notes) VALUES (?1,?2,?3,?4,?5)",
        params![name, contact, phone, category.to_string(), notes],
    )?;
    let actor = sub
        .get_one::<String>("actor")
        .map(|s| s.as_str())
        .unwrap_or("office");
    audit::record(
        conn,
        actor,
        Action::Create,
        Module::Vendor,
        &format!("Vendor added: {}", name),
    )?;
    println!("Added vendor '{}' ({})", name, category);
    Ok(())
}

#[derive(Serialize)]
pub struct VendorRow {
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub category: String,
    pub unpaid_balance: Decimal,
}

/// The "cari" view: each vendor with the running total of its unpaid
/// linked expenses. Amounts are summed as `Decimal` like every other
/// money path.
pub fn ledger(conn: &Connection) -> Result<Vec<VendorRow>> {
    let mut unpaid: HashMap<i64, Decimal> = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT vendor_id, amount FROM expenses WHERE is_paid=0 AND vendor_id IS NOT NULL",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let vendor_id: i64 = r.get(0)?;
        let amount: Decimal = r
            .get::<_, String>(1)?
            .parse()
            .map_err(anyhow::Error::msg)?;
        *unpaid.entry(vendor_id).or_default() += amount;
    }

    let mut stmt = conn.prepare(
        "SELECT id, name, contact_person, phone, category FROM vendors ORDER BY name",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        data.push(VendorRow {
            name: r.get(1)?,
            contact: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            phone: r.get(3)?,
            category: r.get(4)?,
            unpaid_balance: unpaid.get(&id).copied().unwrap_or_default(),
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = ledger(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|v| {
                vec![
                    v.name.clone(),
                    v.contact.clone(),
                    v.phone.clone(),
                    v.category.clone(),
                    fmt_money(&v.unpaid_balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Vendor", "Contact", "Phone", "Category", "Unpaid"], rows)
        );
    }
    Ok(())
}
