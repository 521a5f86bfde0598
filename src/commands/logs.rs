// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct LogRow {
    date: String,
    user: String,
    action: String,
    module: String,
    details: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut sql = String::from(
        "SELECT date, user, action, module, details FROM system_logs WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(module) = sub.get_one::<String>("module") {
        sql.push_str(" AND module=?");
        params_vec.push(module.to_uppercase());
    }
    sql.push_str(" ORDER BY id DESC");
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
        data.push(LogRow {
            date: r.get(0)?,
            user: r.get(1)?,
            action: r.get(2)?,
            module: r.get(3)?,
            details: r.get(4)?,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|l| {
                vec![
                    l.date.clone(),
                    l.user.clone(),
                    l.action.clone(),
                    l.module.clone(),
                    l.details.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "User", "Action", "Module", "Details"], rows)
        );
    }
    Ok(())
}
