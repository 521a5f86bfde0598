// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Typed outcomes of the bookkeeping core. The CLI layer wraps these in
/// anyhow and turns them into user-facing messages; the core itself never
/// returns partial results on failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid commission rate {0}: must be between 0 and 100")]
    InvalidCommissionRate(Decimal),

    #[error("Invalid revenue {0}: must be non-negative")]
    InvalidRevenue(Decimal),

    #[error("Consultant {0} not found")]
    ConsultantNotFound(i64),

    #[error("Transaction {0} not found")]
    TransactionNotFound(i64),

    #[error("Transaction {0} is already settled")]
    AlreadySettled(i64),

    #[error("Expense {0} was generated by settlement and cannot be modified")]
    ImmutableExpense(i64),

    #[error("Category 'commission-payout' is reserved for settlement-generated expenses")]
    ReservedCategory,

    #[error("Books are inconsistent: {0} reconciliation finding(s); run doctor for detail")]
    InconsistentState(usize),
}
