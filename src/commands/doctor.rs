// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::domain::error::DomainError;
use crate::utils::pretty_table;

/// Reconciliation pass over the books. Settlement writes the status flip
/// and the payout expense together, so on healthy books this finds
/// nothing; findings mean the store was corrupted externally and are
/// surfaced to the operator, never auto-repaired.
pub fn handle(conn: &Connection) -> Result<()> {
    let rows = collect_issues(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    let n = rows.len();
    println!("{}", pretty_table(&["Issue", "Detail"], rows));
    Err(DomainError::InconsistentState(n).into())
}

pub fn collect_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Every paid transaction must have exactly one payout expense
    //    referencing it.
    let mut stmt = conn.prepare(
        "SELECT t.id, COUNT(e.id)
         FROM transactions t
         LEFT JOIN expenses e ON e.transaction_id=t.id AND e.category='commission-payout'
         WHERE t.status='paid'
         GROUP BY t.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let n: i64 = r.get(1)?;
        match n {
            0 => rows.push(vec!["paid_tx_missing_payout".into(), format!("tx {}", id)]),
            1 => {}
            _ => rows.push(vec![
                "duplicate_payout".into(),
                format!("tx {} has {} payout expenses", id, n),
            ]),
        }
    }

    // 2) Payout expenses pointing at missing or still-pending transactions.
    let mut stmt2 = conn.prepare(
        "SELECT e.id, e.transaction_id, t.status
         FROM expenses e
         LEFT JOIN transactions t ON t.id=e.transaction_id
         WHERE e.category='commission-payout'",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let eid: i64 = r.get(0)?;
        let txid: Option<i64> = r.get(1)?;
        let status: Option<String> = r.get(2)?;
        match (txid, status.as_deref()) {
            (None, _) => rows.push(vec![
                "payout_without_tx_ref".into(),
                format!("expense {}", eid),
            ]),
            (Some(t), None) => rows.push(vec![
                "orphan_payout".into(),
                format!("expense {} references missing tx {}", eid, t),
            ]),
            (Some(t), Some("pending")) => rows.push(vec![
                "payout_for_pending_tx".into(),
                format!("expense {} references pending tx {}", eid, t),
            ]),
            _ => {}
        }
    }

    // 3) The frozen split must still reconstruct gross revenue.
    let mut stmt3 = conn.prepare(
        "SELECT id, gross_revenue, office_revenue, consultant_share, partner_a_share, partner_b_share
         FROM transactions",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let parse = |i: usize| -> Result<Decimal> {
            let s: String = r.get(i)?;
            Ok(s.parse::<Decimal>()
                .map_err(|e| anyhow::anyhow!("tx {}: bad stored decimal '{}': {}", id, s, e))?)
        };
        let gross = parse(1)?;
        let office = parse(2)?;
        let consultant = parse(3)?;
        let a = parse(4)?;
        let b = parse(5)?;
        if office + consultant != gross {
            rows.push(vec![
                "split_not_conserving".into(),
                format!("tx {}: office {} + consultant {} != gross {}", id, office, consultant, gross),
            ]);
        }
        if a + b != office {
            rows.push(vec![
                "partner_split_broken".into(),
                format!("tx {}: {} + {} != office {}", id, a, b, office),
            ]);
        }
    }

    Ok(rows)
}
