// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit::{self, Action, Module};
use crate::domain::error::DomainError;
use crate::utils::{id_for_consultant, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-rate", sub)) => set_rate(conn, sub)?,
        Some(("deactivate", sub)) => deactivate(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn actor(sub: &clap::ArgMatches) -> String {
    sub.get_one::<String>("actor")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "office".into())
}

fn check_rate(rate: Decimal) -> Result<Decimal> {
    if rate < Decimal::ZERO || rate > Decimal::from(100) {
        return Err(DomainError::InvalidCommissionRate(rate).into());
    }
    Ok(rate)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let phone = sub.get_one::<String>("phone").unwrap();
    let rate = check_rate(parse_decimal(sub.get_one::<String>("rate").unwrap())?)?;
    let start = parse_date(sub.get_one::<String>("start-date").unwrap())?;
    conn.execute(
        "INSERT INTO consultants(full_name, phone, commission_rate, start_date, is_active)
         VALUES (?1,?2,?3,?4,1)",
        params![name, phone, rate.to_string(), start.to_string()],
    )?;
    audit::record(
        conn,
        &actor(sub),
        Action::Create,
        Module::Consultant,
        &format!("Consultant added: {} (rate {}%)", name, rate),
    )?;
    println!("Added consultant '{}' at {}%", name, rate);
    Ok(())
}

#[derive(Serialize)]
struct ConsultantRow {
    name: String,
    phone: String,
    rate: String,
    start_date: String,
    active: bool,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT full_name, phone, commission_rate, start_date, is_active
         FROM consultants ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(ConsultantRow {
            name: r.get(0)?,
            phone: r.get(1)?,
            rate: r.get(2)?,
            start_date: r.get(3)?,
            active: r.get::<_, i64>(4)? != 0,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.phone.clone(),
                    format!("{}%", c.rate),
                    c.start_date.clone(),
                    if c.active { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Phone", "Rate", "Start", "Active"], rows)
        );
    }
    Ok(())
}

/// Rate changes apply to transactions created afterwards; existing
/// transactions keep their frozen split.
fn set_rate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let rate = check_rate(parse_decimal(sub.get_one::<String>("rate").unwrap())?)?;
    let id = id_for_consultant(conn, name)?;
    conn.execute(
        "UPDATE consultants SET commission_rate=?1 WHERE id=?2",
        params![rate.to_string(), id],
    )?;
    audit::record(
        conn,
        &actor(sub),
        Action::Update,
        Module::Consultant,
        &format!("Consultant rate changed: {} -> {}%", name, rate),
    )?;
    println!("Set rate of '{}' to {}% (future transactions only)", name, rate);
    Ok(())
}

fn deactivate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let id = id_for_consultant(conn, name)?;
    conn.execute("UPDATE consultants SET is_active=0 WHERE id=?1", params![id])?;
    audit::record(
        conn,
        &actor(sub),
        Action::Update,
        Module::Consultant,
        &format!("Consultant deactivated: {}", name),
    )?;
    println!("Deactivated consultant '{}'", name);
    Ok(())
}
