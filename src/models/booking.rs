use chrono::Utc;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_REJECTED: &str = "rejected";

pub const COL_STATUS: &str = "status";
pub const COL_REJECTION_REASON: &str = "rejectionReason";
pub const COL_REJECTION_COMMENTS: &str = "rejectionComments";
pub const COL_REJECTION_DATE: &str = "rejectionDate";

/// A booking as appended to the sheet. The id is the creation time in
/// milliseconds and is assigned by the service, never by the caller.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub room_type: String,
    pub check_in: String,
    pub check_out: String,
    pub message: String,
    pub status: String,
    pub created_at: String,
    pub price: f64,
}

impl NewBooking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        email: String,
        phone: String,
        room_type: String,
        check_in: String,
        check_out: String,
        message: String,
        price: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            name,
            email,
            phone,
            room_type,
            check_in,
            check_out,
            message,
            status: STATUS_PENDING.to_string(),
            created_at: now.to_rfc3339(),
            price,
        }
    }
}

/// Rejection detail supplied alongside a status update. Only written
/// when the new status is "rejected".
#[derive(Debug, Clone, Default)]
pub struct Rejection {
    pub reason: Option<String>,
    pub comments: Option<String>,
    pub date: Option<String>,
}

/// Normalize a booking id for comparison. Ids are timestamps but may
/// arrive as a number or a string (and some callers send "123.0"), so
/// both sides are reduced to a decimal string before matching.
pub fn canonical_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return n.to_string();
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.fract() == 0.0 && f.abs() < 9e18 {
            return (f as i64).to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_id_integer_string() {
        assert_eq!(canonical_id("1700000000000"), "1700000000000");
    }

    #[test]
    fn test_canonical_id_trims_and_strips_fraction() {
        assert_eq!(canonical_id(" 42 "), "42");
        assert_eq!(canonical_id("42.0"), "42");
    }

    #[test]
    fn test_canonical_id_non_numeric_passthrough() {
        assert_eq!(canonical_id("abc"), "abc");
    }

    #[test]
    fn test_new_booking_defaults() {
        let b = NewBooking::new(
            "A".into(),
            "a@b.co".into(),
            "+15551234".into(),
            "Deluxe Room".into(),
            "2025-01-01".into(),
            "2025-01-02".into(),
            String::new(),
            1500.0,
        );
        assert_eq!(b.status, STATUS_PENDING);
        assert!(b.id > 0);
        assert!(b.created_at.contains('T'));
    }
}
