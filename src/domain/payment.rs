use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::moment;

// ============================================================================
// Payment - dependent of exactly one order
// ============================================================================
//
// The order owns its payment: saving or deleting the order cascades to it.
// The payment shares its order's id and points back by id only.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Option<i64>,
    #[serde(with = "moment")]
    pub moment: DateTime<Utc>,
    #[serde(skip)]
    pub order_id: Option<i64>,
}

impl Payment {
    pub fn new(id: Option<i64>, moment: DateTime<Utc>) -> Self {
        Self {
            id,
            moment,
            order_id: id,
        }
    }

    /// Bind the payment to its owning order, adopting the order's id.
    pub(crate) fn attach_to(&mut self, order_id: Option<i64>) {
        self.id = order_id;
        self.order_id = order_id;
    }
}

impl PartialEq for Payment {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl Eq for Payment {}

impl Hash for Payment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.unwrap_or(0).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_payment_moment_wire_format() {
        let paid_at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let payment = Payment::new(Some(7), paid_at);

        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["moment"], "2024-01-15T12:00:00Z");
        assert!(json.get("order_id").is_none());

        let back: Payment = serde_json::from_value(json).unwrap();
        assert_eq!(back.moment, paid_at);
        assert_eq!(back, payment);
    }

    #[test]
    fn test_attach_adopts_order_id() {
        let mut payment = Payment::new(None, Utc::now());
        payment.attach_to(Some(3));

        assert_eq!(payment.id, Some(3));
        assert_eq!(payment.order_id, Some(3));
    }
}
