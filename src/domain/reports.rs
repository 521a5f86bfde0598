// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Consultant, Expense, Partner, Transaction, TransactionKind};

/// One partner's entitlement for a period. All fields are re-derived from
/// the supplied slices on every call; nothing is cached or mutated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PartnerBalance {
    pub gross_share: Decimal,
    pub share_of_expenses: Decimal,
    pub net_profit_share: Decimal,
    pub paid_expenses: Decimal,
    pub total_balance: Decimal,
}

/// Period entitlement for one partner over caller-filtered collections.
///
/// Every expense in the slice is split 50/50 between the partners no
/// matter who fronted it; what a partner paid personally comes back as a
/// receivable on top of the profit share.
pub fn partner_balance(
    partner: Partner,
    transactions: &[Transaction],
    expenses: &[Expense],
) -> PartnerBalance {
    let gross_share: Decimal = transactions
        .iter()
        .map(|t| match partner {
            Partner::A => t.partner_a_share,
            Partner::B => t.partner_b_share,
        })
        .sum();

    let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
    let share_of_expenses = total_expenses / Decimal::from(2);
    let net_profit_share = gross_share - share_of_expenses;

    let paid_expenses: Decimal = expenses
        .iter()
        .filter(|e| e.paid_by.partner() == Some(partner))
        .map(|e| e.amount)
        .sum();

    PartnerBalance {
        gross_share,
        share_of_expenses,
        net_profit_share,
        paid_expenses,
        total_balance: net_profit_share + paid_expenses,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsultantPerformance {
    pub consultant_id: i64,
    pub full_name: String,
    pub deal_count: usize,
    pub gross_revenue: Decimal,
    pub commission: Decimal,
}

/// Ranks consultants by summed gross revenue over the filtered window,
/// descending. The sort is stable, so consultants tied on revenue keep
/// their input order, and consultants with no deals still appear with
/// zeros.
pub fn consultant_performance(
    consultants: &[Consultant],
    transactions: &[Transaction],
) -> Vec<ConsultantPerformance> {
    let mut rows: Vec<ConsultantPerformance> = consultants
        .iter()
        .map(|c| {
            let mut deal_count = 0usize;
            let mut gross_revenue = Decimal::ZERO;
            let mut commission = Decimal::ZERO;
            for t in transactions.iter().filter(|t| t.consultant_id == c.id) {
                deal_count += 1;
                gross_revenue += t.gross_revenue;
                commission += t.consultant_share;
            }
            ConsultantPerformance {
                consultant_id: c.id,
                full_name: c.full_name.clone(),
                deal_count,
                gross_revenue,
                commission,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.gross_revenue.cmp(&a.gross_revenue));
    rows
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PortfolioMix {
    pub sale_count: usize,
    pub rent_count: usize,
    pub sale_percent: Decimal,
    pub rent_percent: Decimal,
    pub avg_sale_revenue: Decimal,
    pub avg_rent_revenue: Decimal,
}

/// Sale/rent counts, percentages, and per-type average gross revenue.
/// An empty window yields all zeros, never a division error.
pub fn portfolio_mix(transactions: &[Transaction]) -> PortfolioMix {
    let mut sale_count = 0usize;
    let mut rent_count = 0usize;
    let mut sale_revenue = Decimal::ZERO;
    let mut rent_revenue = Decimal::ZERO;
    for t in transactions {
        match t.kind {
            TransactionKind::Sale => {
                sale_count += 1;
                sale_revenue += t.gross_revenue;
            }
            TransactionKind::Rent => {
                rent_count += 1;
                rent_revenue += t.gross_revenue;
            }
        }
    }
    let total = sale_count + rent_count;
    let pct = |n: usize| {
        if total == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(n as u64) * Decimal::from(100) / Decimal::from(total as u64))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven)
        }
    };
    let avg = |sum: Decimal, n: usize| {
        if n == 0 {
            Decimal::ZERO
        } else {
            (sum / Decimal::from(n as u64))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        }
    };
    PortfolioMix {
        sale_count,
        rent_count,
        sale_percent: pct(sale_count),
        rent_percent: pct(rent_count),
        avg_sale_revenue: avg(sale_revenue, sale_count),
        avg_rent_revenue: avg(rent_revenue, rent_count),
    }
}

/// Period totals shown on the summary report: turnover, office revenue,
/// expenses, and net office profit.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PeriodSummary {
    pub turnover: Decimal,
    pub office_revenue: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

pub fn period_summary(transactions: &[Transaction], expenses: &[Expense]) -> PeriodSummary {
    let turnover: Decimal = transactions.iter().map(|t| t.gross_revenue).sum();
    let office_revenue: Decimal = transactions.iter().map(|t| t.office_revenue).sum();
    let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
    PeriodSummary {
        turnover,
        office_revenue,
        total_expenses,
        net_profit: office_revenue - total_expenses,
    }
}
