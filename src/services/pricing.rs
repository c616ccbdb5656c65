use chrono::NaiveDate;

/// Nightly rate in rupees. Unknown room types fall back to the standard
/// rate rather than failing, matching the booking form's select values.
pub fn base_rate(room_type: &str) -> i64 {
    match room_type {
        "standard-room" => 1200,
        "deluxe-room" => 1500,
        "family" => 2000,
        _ => 1200,
    }
}

/// Human-readable label submitted in place of the form's select value.
pub fn room_type_label(room_type: &str) -> &str {
    match room_type {
        "standard-room" => "Standard Room",
        "deluxe-room" => "Deluxe Room",
        "family" => "Family Room",
        other => other,
    }
}

/// The price a booking is submitted with: nightly rate times nights,
/// with no discount. The longer-stay discount in `stay_quote` is
/// display-only and deliberately does not feed this value.
pub fn booking_price(room_type: &str, check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    let nights = (check_out - check_in).num_days().max(0);
    base_rate(room_type) * nights
}

/// Quoted total for the on-page rate tooltip: 10% off from three
/// nights, 15% off from seven, rounded to the nearest rupee.
pub fn stay_quote(room_type: &str, nights: i64) -> i64 {
    let total = (base_rate(room_type) * nights) as f64;
    let discount = if nights >= 7 {
        0.15
    } else if nights >= 3 {
        0.10
    } else {
        0.0
    };
    (total * (1.0 - discount)).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_deluxe_three_nights() {
        assert_eq!(
            booking_price("deluxe-room", date("2024-01-01"), date("2024-01-04")),
            4500
        );
    }

    #[test]
    fn test_unknown_room_type_uses_standard_rate() {
        assert_eq!(
            booking_price("penthouse", date("2024-01-01"), date("2024-01-03")),
            2400
        );
    }

    #[test]
    fn test_single_night() {
        assert_eq!(
            booking_price("family", date("2024-02-10"), date("2024-02-11")),
            2000
        );
    }

    #[test]
    fn test_stay_quote_discount_tiers() {
        assert_eq!(stay_quote("standard-room", 2), 2400);
        assert_eq!(stay_quote("standard-room", 3), 3240);
        assert_eq!(stay_quote("standard-room", 7), 7140);
    }

    #[test]
    fn test_discount_never_reaches_submitted_price() {
        // seven nights would be discounted in the tooltip quote
        let submitted = booking_price("standard-room", date("2024-03-01"), date("2024-03-08"));
        assert_eq!(submitted, 8400);
        assert_ne!(submitted, stay_quote("standard-room", 7));
    }

    #[test]
    fn test_room_labels() {
        assert_eq!(room_type_label("deluxe-room"), "Deluxe Room");
        assert_eq!(room_type_label("igloo"), "igloo");
    }
}
