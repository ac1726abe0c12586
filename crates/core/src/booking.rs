//! Booking form validation.
//!
//! The booking form is a courtesy: a valid submission produces a confirmation
//! message and the submitted data is dropped. Nothing is sent or stored.

use chrono::NaiveDate;
use serde::Serialize;

/// Message shown after a successful submission.
pub const CONFIRMATION_MESSAGE: &str = "Thanks! We'll contact you shortly.";

/// Date formats accepted for the booking date, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Raw booking form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub booking_date: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Name is required")]
    MissingName,

    #[error("Email is required")]
    MissingEmail,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid booking date: {0}. Use YYYY-MM-DD or DD.MM.YYYY")]
    InvalidDate(String),

    #[error("Booking date {0} is in the past")]
    DateInPast(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    pub car_id: String,
    pub booking_date: Option<String>,
    pub message: String,
}

/// Validate a booking form for `car_id`.
///
/// Name and email are required. The booking date is optional but may not be
/// earlier than `today`. The form is consumed and its contents discarded.
pub fn submit(
    form: BookingForm,
    car_id: &str,
    today: NaiveDate,
) -> Result<BookingConfirmation, BookingError> {
    if form.name.trim().is_empty() {
        return Err(BookingError::MissingName);
    }

    let email = form.email.trim();
    if email.is_empty() {
        return Err(BookingError::MissingEmail);
    }
    if !is_valid_email(email) {
        return Err(BookingError::InvalidEmail(email.to_string()));
    }

    let booking_date = match form.booking_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(format_booking_date(parse_booking_date(
            raw, today,
        )?)),
        _ => None,
    };

    Ok(BookingConfirmation {
        car_id: car_id.to_string(),
        booking_date,
        message: CONFIRMATION_MESSAGE.to_string(),
    })
}

/// Parse a booking date and reject days before `today`.
pub fn parse_booking_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, BookingError> {
    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| BookingError::InvalidDate(raw.to_string()))?;

    if date < today {
        return Err(BookingError::DateInPast(format_booking_date(date)));
    }

    Ok(date)
}

/// Render a booking date as `DD.MM.YYYY`.
pub fn format_booking_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
