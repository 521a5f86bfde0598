// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{Connection, params};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
    Approve,
    Reset,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Create => "CREATE",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
            Action::Approve => "APPROVE",
            Action::Reset => "RESET",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Transaction,
    Expense,
    Consultant,
    Personnel,
    Vendor,
    Salary,
    System,
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Module::Transaction => "TRANSACTION",
            Module::Expense => "EXPENSE",
            Module::Consultant => "CONSULTANT",
            Module::Personnel => "PERSONNEL",
            Module::Vendor => "VENDOR",
            Module::Salary => "SALARY",
            Module::System => "SYSTEM",
        };
        write!(f, "{}", s)
    }
}

/// Append one row to the audit trail. Every mutating command calls this
/// on the same connection (and, for settlement, inside the same storage
/// transaction) as the write it describes.
pub fn record(
    conn: &Connection,
    actor: &str,
    action: Action,
    module: Module,
    details: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO system_logs(user, action, module, details) VALUES (?1, ?2, ?3, ?4)",
        params![actor, action.to_string(), module.to_string(), details],
    )?;
    Ok(())
}
