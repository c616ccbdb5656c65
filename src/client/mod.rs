use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::services::pricing;

/// Raw fields from the booking form, as entered.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub room_type: String,
    pub check_in: String,
    pub check_out: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(String),

    #[error("Network error. Please check your connection and try again.")]
    Transport(#[source] reqwest::Error),

    #[error("Error submitting booking. Please try again.")]
    MalformedResponse,

    #[error("Error submitting booking: {0}")]
    Rejected(String),
}

#[derive(Deserialize)]
struct SubmitResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(rename = "bookingId")]
    booking_id: Option<i64>,
}

impl BookingForm {
    /// The pre-submit checks, in the order the form reports them. The
    /// first failure aborts; nothing is sent.
    pub fn validate(&self, today: NaiveDate) -> Result<(), SubmitError> {
        if self.name.is_empty()
            || self.email.is_empty()
            || self.phone.is_empty()
            || self.room_type.is_empty()
            || self.check_in.is_empty()
            || self.check_out.is_empty()
        {
            return Err(SubmitError::Invalid(
                "Please fill in all required fields.".to_string(),
            ));
        }

        if !email_is_plausible(&self.email) {
            return Err(SubmitError::Invalid(
                "Please enter a valid email address.".to_string(),
            ));
        }

        if !phone_is_plausible(&self.phone) {
            return Err(SubmitError::Invalid(
                "Please enter a valid phone number.".to_string(),
            ));
        }

        let check_in = parse_date(&self.check_in)?;
        let check_out = parse_date(&self.check_out)?;

        if check_in < today {
            return Err(SubmitError::Invalid(
                "Check-in date cannot be in the past.".to_string(),
            ));
        }
        if check_out <= check_in {
            return Err(SubmitError::Invalid(
                "Check-out date must be after check-in date.".to_string(),
            ));
        }

        Ok(())
    }

    /// The price the form submits; derived, never user-supplied.
    pub fn price(&self) -> Result<i64, SubmitError> {
        let check_in = parse_date(&self.check_in)?;
        let check_out = parse_date(&self.check_out)?;
        Ok(pricing::booking_price(&self.room_type, check_in, check_out))
    }
}

/// `local@domain.tld`: one @, no whitespace, a dot somewhere after it.
fn email_is_plausible(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// International shape after stripping whitespace: optional +, first
/// digit 1-9, then up to 15 more digits.
fn phone_is_plausible(phone: &str) -> bool {
    let cleaned: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    let mut chars = digits.chars();
    match chars.next() {
        Some(c) if ('1'..='9').contains(&c) => {}
        _ => return false,
    }
    let rest: Vec<char> = chars.collect();
    rest.len() <= 15 && rest.iter().all(|c| c.is_ascii_digit())
}

fn parse_date(s: &str) -> Result<NaiveDate, SubmitError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| SubmitError::Invalid("Please enter a valid date.".to_string()))
}

/// Validate, price and submit a booking as one form-encoded POST. The
/// room type goes out as its display label, the way the form submits
/// it. No retry on failure: a transport error leaves the server-side
/// outcome unknown, and resubmitting can duplicate the booking.
pub async fn submit(
    http: &reqwest::Client,
    endpoint: &str,
    form: &BookingForm,
) -> Result<i64, SubmitError> {
    form.validate(Local::now().date_naive())?;
    let price = form.price()?;

    let fields = [
        ("name", form.name.as_str()),
        ("email", form.email.as_str()),
        ("phone", form.phone.as_str()),
        ("roomType", pricing::room_type_label(&form.room_type)),
        ("checkIn", form.check_in.as_str()),
        ("checkOut", form.check_out.as_str()),
        ("message", form.message.as_str()),
    ];
    let price_str = price.to_string();
    let mut pairs: Vec<(&str, &str)> = fields.to_vec();
    pairs.push(("price", price_str.as_str()));

    let response = http
        .post(endpoint)
        .form(&pairs)
        .send()
        .await
        .map_err(SubmitError::Transport)?;

    if !response.status().is_success() {
        return Err(SubmitError::MalformedResponse);
    }

    let body = response.text().await.map_err(SubmitError::Transport)?;
    let parsed: SubmitResponse =
        serde_json::from_str(&body).map_err(|_| SubmitError::MalformedResponse)?;

    if parsed.success {
        Ok(parsed.booking_id.unwrap_or_default())
    } else {
        Err(SubmitError::Rejected(
            parsed.error.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn valid_form() -> BookingForm {
        BookingForm {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            room_type: "deluxe-room".to_string(),
            check_in: "2030-01-10".to_string(),
            check_out: "2030-01-13".to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate(date("2030-01-01")).is_ok());
    }

    #[test]
    fn test_missing_field_reported_first() {
        let mut form = valid_form();
        form.email = String::new();
        let err = form.validate(date("2030-01-01")).unwrap_err();
        assert!(err.to_string().contains("required fields"));
    }

    #[test]
    fn test_bad_email() {
        let mut form = valid_form();
        form.email = "asha@nodot".to_string();
        let err = form.validate(date("2030-01-01")).unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_phone_leading_zero_rejected() {
        let mut form = valid_form();
        form.phone = "0123456".to_string();
        assert!(form.validate(date("2030-01-01")).is_err());
    }

    #[test]
    fn test_phone_whitespace_stripped() {
        let mut form = valid_form();
        form.phone = "+1 555 123 4567".to_string();
        assert!(form.validate(date("2030-01-01")).is_ok());
    }

    #[test]
    fn test_checkin_in_past_rejected() {
        let form = valid_form();
        assert!(form.validate(date("2030-02-01")).is_err());
    }

    #[test]
    fn test_checkin_today_accepted() {
        let form = valid_form();
        assert!(form.validate(date("2030-01-10")).is_ok());
    }

    #[test]
    fn test_checkout_equal_checkin_rejected() {
        let mut form = valid_form();
        form.check_out = form.check_in.clone();
        let err = form.validate(date("2030-01-01")).unwrap_err();
        assert!(err.to_string().contains("Check-out"));
    }

    #[test]
    fn test_checkout_next_day_accepted() {
        let mut form = valid_form();
        form.check_out = "2030-01-11".to_string();
        assert!(form.validate(date("2030-01-01")).is_ok());
    }

    #[test]
    fn test_price_matches_schedule() {
        assert_eq!(valid_form().price().unwrap(), 4500);
    }
}
