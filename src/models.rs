// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultant {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub commission_rate: Decimal, // percent, 0..=100
    pub start_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Sale,
    Rent,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Sale => write!(f, "sale"),
            TransactionKind::Rent => write!(f, "rent"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sale" => Ok(TransactionKind::Sale),
            "rent" => Ok(TransactionKind::Rent),
            other => Err(format!("Unknown transaction type '{}' (use sale|rent)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(format!("Unknown payment status '{}' (use pending|paid)", other)),
        }
    }
}

/// A closed deal. The four share fields are derived once at creation by
/// the allocation calculator and never recomputed afterwards, even if the
/// consultant's rate changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub property_name: String,
    pub kind: TransactionKind,
    pub customer_name: String,
    pub customer_phone: String,
    pub consultant_id: i64,
    pub date: NaiveDate,
    pub gross_revenue: Decimal,
    pub office_revenue: Decimal,
    pub consultant_share: Decimal,
    pub partner_a_share: Decimal,
    pub partner_b_share: Decimal,
    pub status: PaymentStatus,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Rent,
    Supplies,
    Marketing,
    Payroll,
    Utilities,
    Food,
    CommissionPayout,
    Other,
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Supplies => "supplies",
            ExpenseCategory::Marketing => "marketing",
            ExpenseCategory::Payroll => "payroll",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Food => "food",
            ExpenseCategory::CommissionPayout => "commission-payout",
            ExpenseCategory::Other => "other",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rent" => Ok(ExpenseCategory::Rent),
            "supplies" => Ok(ExpenseCategory::Supplies),
            "marketing" => Ok(ExpenseCategory::Marketing),
            "payroll" => Ok(ExpenseCategory::Payroll),
            "utilities" => Ok(ExpenseCategory::Utilities),
            "food" => Ok(ExpenseCategory::Food),
            "commission-payout" => Ok(ExpenseCategory::CommissionPayout),
            "other" => Ok(ExpenseCategory::Other),
            other => Err(format!(
                "Unknown expense category '{}' (use rent|supplies|marketing|payroll|utilities|food|commission-payout|other)",
                other
            )),
        }
    }
}

/// The two equal partners of the brokerage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Partner {
    A,
    B,
}

/// Who fronted an expense: one of the partners personally, or the office
/// till. Partner-paid expenses are a receivable from the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payer {
    PartnerA,
    PartnerB,
    OfficeTill,
}

impl Payer {
    pub fn partner(self) -> Option<Partner> {
        match self {
            Payer::PartnerA => Some(Partner::A),
            Payer::PartnerB => Some(Partner::B),
            Payer::OfficeTill => None,
        }
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payer::PartnerA => write!(f, "partner-a"),
            Payer::PartnerB => write!(f, "partner-b"),
            Payer::OfficeTill => write!(f, "office"),
        }
    }
}

impl FromStr for Payer {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "partner-a" | "a" => Ok(Payer::PartnerA),
            "partner-b" | "b" => Ok(Payer::PartnerB),
            "office" | "office-till" => Ok(Payer::OfficeTill),
            other => Err(format!("Unknown payer '{}' (use partner-a|partner-b|office)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub paid_by: Payer,
    pub is_paid: bool,
    pub vendor_id: Option<i64>,
    pub notes: Option<String>,
    /// Set only on payout expenses synthesized at settlement time; such
    /// expenses are immutable.
    pub transaction_id: Option<i64>,
}
