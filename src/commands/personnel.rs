// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit::{self, Action, Module};
use crate::utils::{
    id_for_personnel, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn handle_salary(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("list", sub)) => list_salaries(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn actor(sub: &clap::ArgMatches) -> String {
    sub.get_one::<String>("actor")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "office".into())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let role = sub.get_one::<String>("role").unwrap();
    let salary = parse_decimal(sub.get_one::<String>("salary").unwrap())?;
    let start = parse_date(sub.get_one::<String>("start-date").unwrap())?;
    conn.execute(
        "INSERT INTO personnel(full_name, role, monthly_salary, start_date, is_active)
         VALUES (?1,?2,?3,?4,1)",
        params![name, role, salary.to_string(), start.to_string()],
    )?;
    audit::record(
        conn,
        &actor(sub),
        Action::Create,
        Module::Personnel,
        &format!("Personnel added: {} ({})", name, role),
    )?;
    println!("Added personnel '{}' ({})", name, role);
    Ok(())
}

#[derive(Serialize)]
struct PersonnelRow {
    name: String,
    role: String,
    monthly_salary: String,
    start_date: String,
    active: bool,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT full_name, role, monthly_salary, start_date, is_active FROM personnel ORDER BY full_name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(PersonnelRow {
            name: r.get(0)?,
            role: r.get(1)?,
            monthly_salary: r.get(2)?,
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
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.role.clone(),
                    p.monthly_salary.clone(),
                    p.start_date.clone(),
                    if p.active { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Role", "Salary", "Start", "Active"], rows)
        );
    }
    Ok(())
}

/// Record a salary payment and the matching payroll expense from the
/// office till in one storage transaction, so payroll always reaches the
/// shared expense pool.
fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("personnel").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let period = parse_month(sub.get_one::<String>("period").unwrap())?;
    let who = actor(sub);
    let id = id_for_personnel(conn, name)?;

    let db_tx = conn.transaction()?;
    db_tx.execute(
        "INSERT INTO salary_payments(personnel_id, amount, date, period, is_paid)
         VALUES (?1,?2,?3,?4,1)",
        params![id, amount.to_string(), date.to_string(), period],
    )?;
    db_tx.execute(
        "INSERT INTO expenses(category, amount, date, description, paid_by, is_paid)
         VALUES ('payroll',?1,?2,?3,'office',1)",
        params![
            amount.to_string(),
            date.to_string(),
            format!("Salary: {} - {}", name, period)
        ],
    )?;
    audit::record(
        &db_tx,
        &who,
        Action::Create,
        Module::Salary,
        &format!("Salary paid: {} - {} ({})", name, period, amount),
    )?;
    db_tx.commit()?;
    println!("Paid {} to '{}' for {} and booked the payroll expense", amount, name, period);
    Ok(())
}

#[derive(Serialize)]
struct SalaryRow {
    personnel: String,
    period: String,
    date: String,
    amount: String,
}

fn list_salaries(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut sql = String::from(
        "SELECT p.full_name, s.period, s.date, s.amount
         FROM salary_payments s LEFT JOIN personnel p ON s.personnel_id=p.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(period) = sub.get_one::<String>("period") {
        sql.push_str(" AND s.period=?");
        params_vec.push(period.into());
    }
    sql.push_str(" ORDER BY s.date DESC, s.id DESC");
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
        let name: Option<String> = r.get(0)?;
        data.push(SalaryRow {
            personnel: name.unwrap_or_default(),
            period: r.get(1)?,
            date: r.get(2)?,
            amount: r.get(3)?,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![s.personnel.clone(), s.period.clone(), s.date.clone(), s.amount.clone()]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Personnel", "Period", "Date", "Amount"], rows)
        );
    }
    Ok(())
}
