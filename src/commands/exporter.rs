// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let what = m.get_one::<String>("what").unwrap().to_lowercase();
    match what.as_str() {
        "transactions" => export_transactions(conn, m),
        "expenses" => export_expenses(conn, m),
        other => {
            eprintln!("Unknown export target: {} (use transactions|expenses)", other);
            Ok(())
        }
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.date, t.property_name, t.kind, c.full_name, t.gross_revenue,
                t.consultant_share, t.office_revenue, t.partner_a_share, t.partner_b_share, t.status
         FROM transactions t
         LEFT JOIN consultants c ON t.consultant_id=c.id
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, String>(7)?,
            r.get::<_, String>(8)?,
            r.get::<_, String>(9)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "property", "kind", "consultant", "gross_revenue", "consultant_share",
                "office_revenue", "partner_a_share", "partner_b_share", "status",
            ])?;
            for row in rows {
                let (d, p, k, cons, g, cs, o, pa, pb, st) = row?;
                wtr.write_record([d, p, k, cons.unwrap_or_default(), g, cs, o, pa, pb, st])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, p, k, cons, g, cs, o, pa, pb, st) = row?;
                items.push(json!({
                    "date": d, "property": p, "kind": k, "consultant": cons,
                    "gross_revenue": g, "consultant_share": cs, "office_revenue": o,
                    "partner_a_share": pa, "partner_b_share": pb, "status": st
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT e.date, e.category, e.amount, e.paid_by, e.is_paid, v.name, e.description,
                e.transaction_id
         FROM expenses e
         LEFT JOIN vendors v ON e.vendor_id=v.id
         ORDER BY e.date, e.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, i64>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<i64>>(7)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "category", "amount", "paid_by", "is_paid", "vendor", "description",
                "transaction_id",
            ])?;
            for row in rows {
                let (d, c, a, p, paid, v, desc, tx) = row?;
                wtr.write_record([
                    d,
                    c,
                    a,
                    p,
                    paid.to_string(),
                    v.unwrap_or_default(),
                    desc,
                    tx.map(|t| t.to_string()).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, c, a, p, paid, v, desc, tx) = row?;
                items.push(json!({
                    "date": d, "category": c, "amount": a, "paid_by": p,
                    "is_paid": paid != 0, "vendor": v, "description": desc,
                    "transaction_id": tx
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported expenses to {}", out);
    Ok(())
}
