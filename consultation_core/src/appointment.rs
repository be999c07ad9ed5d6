//! Appointment date/time composition and verification

use chrono::NaiveDateTime;
use std::fmt;

use crate::error::{AppError, Result};

/// Canonical storage format, `YYYY-MM-DD HH:MM`.
pub const APPOINTMENT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// e.g. `March 15, 2024 at 2:30 PM`
const DISPLAY_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AppointmentSlot(NaiveDateTime);

impl AppointmentSlot {
    /// Joins the submitted date and time with a single space and verifies the result.
    pub fn compose(date: &str, time: &str) -> Result<Self> {
        Self::parse(&format!("{} {}", date, time))
    }

    /// Strict parse followed by a round-trip check: the parsed value must
    /// format back to exactly the input. chrono accepts unpadded fields such
    /// as `2024-3-5 9:05`, which the comparison rejects.
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = NaiveDateTime::parse_from_str(input, APPOINTMENT_FORMAT)
            .map_err(|_| AppError::InvalidDateTime(input.to_string()))?;

        if parsed.format(APPOINTMENT_FORMAT).to_string() != input {
            return Err(AppError::InvalidDateTime(input.to_string()));
        }

        Ok(Self(parsed))
    }

    pub fn canonical(&self) -> String {
        self.0.format(APPOINTMENT_FORMAT).to_string()
    }

    pub fn display(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }
}

impl fmt::Display for AppointmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
