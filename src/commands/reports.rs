// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::domain::reports::{
    consultant_performance, partner_balance, period_summary, portfolio_mix,
};
use crate::models::Partner;
use crate::utils::{
    fmt_money, load_consultants, load_expenses_between, load_transactions_between,
    maybe_print_json, partner_names, period_from_args, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("partners", sub)) => partners(conn, sub)?,
        Some(("consultants", sub)) => consultants(conn, sub)?,
        Some(("portfolio", sub)) => portfolio(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (start, end) = period_from_args(sub)?;
    let txs = load_transactions_between(conn, start, end)?;
    let exps = load_expenses_between(conn, start, end)?;
    let s = period_summary(&txs, &exps);
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let rows = vec![
            vec!["Turnover".to_string(), fmt_money(&s.turnover)],
            vec!["Office revenue".to_string(), fmt_money(&s.office_revenue)],
            vec!["Expenses".to_string(), fmt_money(&s.total_expenses)],
            vec!["Net profit".to_string(), fmt_money(&s.net_profit)],
        ];
        println!("Period {} .. {}", start, end);
        println!("{}", pretty_table(&["Item", "Amount"], rows));
    }
    Ok(())
}

fn partners(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (start, end) = period_from_args(sub)?;
    let txs = load_transactions_between(conn, start, end)?;
    let exps = load_expenses_between(conn, start, end)?;
    let (name_a, name_b) = partner_names(conn)?;

    let a = partner_balance(Partner::A, &txs, &exps);
    let b = partner_balance(Partner::B, &txs, &exps);

    if json_flag || jsonl_flag {
        let v = json!([
            { "partner": name_a, "balance": a },
            { "partner": name_b, "balance": b },
        ]);
        maybe_print_json(json_flag, jsonl_flag, &v)?;
        return Ok(());
    }

    let rows = vec![
        vec![
            name_a,
            fmt_money(&a.gross_share),
            fmt_money(&a.share_of_expenses),
            fmt_money(&a.net_profit_share),
            fmt_money(&a.paid_expenses),
            fmt_money(&a.total_balance),
        ],
        vec![
            name_b,
            fmt_money(&b.gross_share),
            fmt_money(&b.share_of_expenses),
            fmt_money(&b.net_profit_share),
            fmt_money(&b.paid_expenses),
            fmt_money(&b.total_balance),
        ],
    ];
    println!("Period {} .. {}", start, end);
    println!(
        "{}",
        pretty_table(
            &["Partner", "Gross share", "Expense share", "Net profit", "Fronted", "Balance"],
            rows,
        )
    );
    Ok(())
}

fn consultants(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (start, end) = period_from_args(sub)?;
    let txs = load_transactions_between(conn, start, end)?;
    let all = load_consultants(conn)?;
    let perf = consultant_performance(&all, &txs);
    if !maybe_print_json(json_flag, jsonl_flag, &perf)? {
        let rows: Vec<Vec<String>> = perf
            .iter()
            .map(|p| {
                vec![
                    p.full_name.clone(),
                    p.deal_count.to_string(),
                    fmt_money(&p.gross_revenue),
                    fmt_money(&p.commission),
                ]
            })
            .collect();
        println!("Period {} .. {}", start, end);
        println!(
            "{}",
            pretty_table(&["Consultant", "Deals", "Revenue", "Commission"], rows)
        );
    }
    Ok(())
}

fn portfolio(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (start, end) = period_from_args(sub)?;
    let txs = load_transactions_between(conn, start, end)?;
    let mix = portfolio_mix(&txs);
    if !maybe_print_json(json_flag, jsonl_flag, &mix)? {
        let rows = vec![
            vec![
                "sale".to_string(),
                mix.sale_count.to_string(),
                format!("{}%", mix.sale_percent),
                fmt_money(&mix.avg_sale_revenue),
            ],
            vec![
                "rent".to_string(),
                mix.rent_count.to_string(),
                format!("{}%", mix.rent_percent),
                fmt_money(&mix.avg_rent_revenue),
            ],
        ];
        println!("Period {} .. {}", start, end);
        println!(
            "{}",
            pretty_table(&["Type", "Count", "Share", "Avg revenue"], rows)
        );
    }
    Ok(())
}
