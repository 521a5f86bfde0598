// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::error::DomainError;
use crate::models::{Consultant, ExpenseCategory, Payer, PaymentStatus, Transaction};

/// The expense to be written alongside the pending->paid flip. Carries
/// the transaction's frozen consultant share, never a recomputed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutDraft {
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub paid_by: Payer,
    pub is_paid: bool,
    pub transaction_id: i64,
}

/// Checks the single legal transition (pending -> paid) and builds the
/// commission-payout expense for it. The caller must persist the status
/// flip and the draft in one storage transaction; splitting them leaves
/// books the doctor command will flag.
pub fn settle(
    tx: &Transaction,
    consultant: &Consultant,
    today: NaiveDate,
) -> Result<PayoutDraft, DomainError> {
    if tx.status == PaymentStatus::Paid {
        return Err(DomainError::AlreadySettled(tx.id));
    }
    Ok(PayoutDraft {
        category: ExpenseCategory::CommissionPayout,
        amount: tx.consultant_share,
        date: today,
        description: format!(
            "Commission payout: {} - {}",
            tx.property_name, consultant.full_name
        ),
        paid_by: Payer::OfficeTill,
        is_paid: true,
        transaction_id: tx.id,
    })
}
