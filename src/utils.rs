// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::models::{Consultant, Expense, Transaction};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn month_end(month: &str) -> Result<NaiveDate> {
    let parts: Vec<&str> = month.split('-').collect();
    if parts.len() != 2 {
        return Err(anyhow::anyhow!("Invalid month '{}'", month));
    }
    let y: i32 = parts[0].parse()?;
    let m: u32 = parts[1].parse()?;
    let last_day = match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if chrono::NaiveDate::from_ymd_opt(y, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => return Err(anyhow::anyhow!("Invalid month number {}", m)),
    };
    NaiveDate::from_ymd_opt(y, m, last_day)
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{}'", month))
}

/// Resolve an inclusive reporting window from --month or --from/--to.
/// The window is always explicit; there is no ambient "current period".
pub fn period_from_args(sub: &clap::ArgMatches) -> Result<(NaiveDate, NaiveDate)> {
    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month.trim())?;
        let start = parse_date(&format!("{}-01", month))?;
        let end = month_end(&month)?;
        return Ok((start, end));
    }
    let from = sub
        .get_one::<String>("from")
        .context("Provide --month or both --from and --to")?;
    let to = sub
        .get_one::<String>("to")
        .context("Provide --month or both --from and --to")?;
    let start = parse_date(from.trim())?;
    let end = parse_date(to.trim())?;
    if end < start {
        return Err(anyhow::anyhow!("--to {} is before --from {}", end, start));
    }
    Ok((start, end))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn id_for_consultant(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM consultants WHERE full_name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Consultant '{}' not found", name))?;
    Ok(id)
}

pub fn id_for_vendor(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM vendors WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Vendor '{}' not found", name))?;
    Ok(id)
}

pub fn id_for_personnel(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM personnel WHERE full_name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Personnel '{}' not found", name))?;
    Ok(id)
}

// Partner display names live in settings, like any other office-level
// configuration.
pub fn partner_names(conn: &Connection) -> Result<(String, String)> {
    let get = |key: &str, default: &str| -> Result<String> {
        let v: Option<String> = conn
            .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| r.get(0))
            .optional()?;
        Ok(v.unwrap_or_else(|| default.to_string()))
    };
    Ok((
        get("partner_a_name", "Partner A")?,
        get("partner_b_name", "Partner B")?,
    ))
}

pub fn set_partner_names(conn: &Connection, a: &str, b: &str) -> Result<()> {
    for (key, value) in [("partner_a_name", a), ("partner_b_name", b)] {
        conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
    }
    Ok(())
}

fn parse_stored_decimal(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in database", what, s))
}

fn transaction_from_row(r: &rusqlite::Row<'_>) -> Result<Transaction> {
    let date: String = r.get(6)?;
    let kind: String = r.get(2)?;
    let status: String = r.get(12)?;
    Ok(Transaction {
        id: r.get(0)?,
        property_name: r.get(1)?,
        kind: kind.parse().map_err(anyhow::Error::msg)?,
        customer_name: r.get(3)?,
        customer_phone: r.get(4)?,
        consultant_id: r.get(5)?,
        date: parse_date(&date)?,
        gross_revenue: parse_stored_decimal(&r.get::<_, String>(7)?, "gross_revenue")?,
        office_revenue: parse_stored_decimal(&r.get::<_, String>(8)?, "office_revenue")?,
        consultant_share: parse_stored_decimal(&r.get::<_, String>(9)?, "consultant_share")?,
        partner_a_share: parse_stored_decimal(&r.get::<_, String>(10)?, "partner_a_share")?,
        partner_b_share: parse_stored_decimal(&r.get::<_, String>(11)?, "partner_b_share")?,
        status: status.parse().map_err(anyhow::Error::msg)?,
        description: r.get(13)?,
    })
}

const TX_COLUMNS: &str = "id, property_name, kind, customer_name, customer_phone, consultant_id, \
     date, gross_revenue, office_revenue, consultant_share, partner_a_share, partner_b_share, \
     status, description";

pub fn load_transaction(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", TX_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => Ok(Some(transaction_from_row(r)?)),
        None => Ok(None),
    }
}

pub fn load_transactions_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE date>=?1 AND date<=?2 ORDER BY date, id",
        TX_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![start.to_string(), end.to_string()])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transaction_from_row(r)?);
    }
    Ok(out)
}

fn expense_from_row(r: &rusqlite::Row<'_>) -> Result<Expense> {
    let category: String = r.get(1)?;
    let date: String = r.get(3)?;
    let paid_by: String = r.get(5)?;
    Ok(Expense {
        id: r.get(0)?,
        category: category.parse().map_err(anyhow::Error::msg)?,
        amount: parse_stored_decimal(&r.get::<_, String>(2)?, "amount")?,
        date: parse_date(&date)?,
        description: r.get(4)?,
        paid_by: paid_by.parse().map_err(anyhow::Error::msg)?,
        is_paid: r.get::<_, i64>(6)? != 0,
        vendor_id: r.get(7)?,
        notes: r.get(8)?,
        transaction_id: r.get(9)?,
    })
}

const EXPENSE_COLUMNS: &str =
    "id, category, amount, date, description, paid_by, is_paid, vendor_id, notes, transaction_id";

pub fn load_expenses_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Expense>> {
    let sql = format!(
        "SELECT {} FROM expenses WHERE date>=?1 AND date<=?2 ORDER BY date, id",
        EXPENSE_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![start.to_string(), end.to_string()])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(expense_from_row(r)?);
    }
    Ok(out)
}

pub fn load_expense(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    let sql = format!("SELECT {} FROM expenses WHERE id=?1", EXPENSE_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => Ok(Some(expense_from_row(r)?)),
        None => Ok(None),
    }
}

pub fn load_consultant(conn: &Connection, id: i64) -> Result<Option<Consultant>> {
    let mut stmt = conn.prepare(
        "SELECT id, full_name, phone, commission_rate, start_date, is_active
         FROM consultants WHERE id=?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => {
            let rate: String = r.get(3)?;
            let start: String = r.get(4)?;
            Ok(Some(Consultant {
                id: r.get(0)?,
                full_name: r.get(1)?,
                phone: r.get(2)?,
                commission_rate: parse_stored_decimal(&rate, "commission_rate")?,
                start_date: parse_date(&start)?,
                is_active: r.get::<_, i64>(5)? != 0,
            }))
        }
        None => Ok(None),
    }
}

/// All consultants in insertion order; the performance report relies on
/// this order for stable tie-breaking.
pub fn load_consultants(conn: &Connection) -> Result<Vec<Consultant>> {
    let mut stmt = conn.prepare(
        "SELECT id, full_name, phone, commission_rate, start_date, is_active
         FROM consultants ORDER BY id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let rate: String = r.get(3)?;
        let start: String = r.get(4)?;
        out.push(Consultant {
            id: r.get(0)?,
            full_name: r.get(1)?,
            phone: r.get(2)?,
            commission_rate: parse_stored_decimal(&rate, "commission_rate")?,
            start_date: parse_date(&start)?,
            is_active: r.get::<_, i64>(5)? != 0,
        });
    }
    Ok(out)
}
