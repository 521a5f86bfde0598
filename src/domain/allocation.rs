// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::error::DomainError;

/// The four-way split of a deal's gross revenue: consultant commission,
/// office revenue, and the two equal partner halves.
///
/// Built only by [`Allocation::compute`]; fields are private so a split
/// can never be edited after construction. The stored values always
/// satisfy `gross == office + consultant` and `office == a + b` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    consultant_share: Decimal,
    office_revenue: Decimal,
    partner_a_share: Decimal,
    partner_b_share: Decimal,
}

impl Allocation {
    /// Split `gross` according to the consultant's commission rate
    /// (percent). The consultant share is rounded to the cent with
    /// banker's rounding; office revenue absorbs the remainder so the
    /// split always reconstructs `gross` exactly. Each partner gets
    /// exactly half of office revenue; when that is an odd number of
    /// cents the halves carry half a cent each, which Decimal represents
    /// exactly.
    pub fn compute(gross: Decimal, rate_percent: Decimal) -> Result<Self, DomainError> {
        if rate_percent < Decimal::ZERO || rate_percent > Decimal::from(100) {
            return Err(DomainError::InvalidCommissionRate(rate_percent));
        }
        if gross < Decimal::ZERO {
            return Err(DomainError::InvalidRevenue(gross));
        }
        let consultant_share = (gross * rate_percent / Decimal::from(100))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        let office_revenue = gross - consultant_share;
        let half = office_revenue / Decimal::from(2);
        Ok(Allocation {
            consultant_share,
            office_revenue,
            partner_a_share: half,
            partner_b_share: half,
        })
    }

    pub fn consultant_share(&self) -> Decimal {
        self.consultant_share
    }

    pub fn office_revenue(&self) -> Decimal {
        self.office_revenue
    }

    pub fn partner_a_share(&self) -> Decimal {
        self.partner_a_share
    }

    pub fn partner_b_share(&self) -> Decimal {
        self.partner_b_share
    }
}
