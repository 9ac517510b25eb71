//! Promo codes with a validity window and an optional usage cap.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PromocodeId;

/// The discount a promo code grants: a percentage or a fixed amount,
/// never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discount {
    /// Percentage off the order total, 0-100.
    Percent(Decimal),
    /// Fixed amount off the order total.
    Amount(Decimal),
}

/// A promo code row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promocode {
    pub id: PromocodeId,
    pub code: String,
    pub discount: Discount,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
    /// Maximum number of redemptions, unlimited when absent.
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
}

impl Promocode {
    /// A code is active iff `now` falls within its validity window and,
    /// when capped, the usage counter has not reached the cap.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if now < self.valid_from {
            return false;
        }
        if self.valid_until.is_some_and(|until| now > until) {
            return false;
        }
        self.usage_limit
            .is_none_or(|limit| self.usage_count < limit)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code(
        from: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
        limit: Option<u32>,
        count: u32,
    ) -> Promocode {
        Promocode {
            id: PromocodeId::generate(),
            code: "RUCHE10".to_string(),
            discount: Discount::Percent(Decimal::new(10, 0)),
            valid_from: from,
            valid_until: until,
            usage_limit: limit,
            usage_count: count,
        }
    }

    #[test]
    fn test_active_within_window() {
        let now = Utc::now();
        let c = code(now - Duration::days(1), Some(now + Duration::days(1)), None, 0);
        assert!(c.is_active(now));
    }

    #[test]
    fn test_inactive_before_window() {
        let now = Utc::now();
        let c = code(now + Duration::days(1), None, None, 0);
        assert!(!c.is_active(now));
    }

    #[test]
    fn test_inactive_after_window() {
        let now = Utc::now();
        let c = code(now - Duration::days(2), Some(now - Duration::days(1)), None, 0);
        assert!(!c.is_active(now));
    }

    #[test]
    fn test_open_ended_window_stays_active() {
        let now = Utc::now();
        let c = code(now - Duration::days(365), None, None, 99);
        assert!(c.is_active(now));
    }

    #[test]
    fn test_usage_cap_exhausts_code() {
        let now = Utc::now();
        let c = code(now - Duration::days(1), None, Some(5), 5);
        assert!(!c.is_active(now));
        let c = code(now - Duration::days(1), None, Some(5), 4);
        assert!(c.is_active(now));
    }
}
