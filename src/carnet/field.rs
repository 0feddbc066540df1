//! Validated field values for contact records.
//!
//! Every field is a newtype that can only be constructed through a
//! validating [`FromStr`] parse, so a value that exists has already passed
//! its validator. The types serialize as their canonical string form and
//! re-validate on deserialization — a hand-edited data file cannot smuggle
//! an invalid value into memory.
//!
//! Validators do not trim input; whitespace handling is the caller's job.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CarnetError;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{9}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9-.]+$").expect("valid email regex")
});

const BIRTHDATE_FORMAT: &str = "%Y-%m-%d";

/// A contact's display name. Any non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Name {
    type Err = CarnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CarnetError::invalid_field("name", "must not be empty"));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Name {
    type Error = CarnetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Exactly nine decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = CarnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !PHONE_RE.is_match(s) {
            return Err(CarnetError::invalid_field(
                "phone number",
                format!("`{s}` is not exactly nine digits"),
            ));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = CarnetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An email address of the shape `local@domain.tld`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EmailAddress {
    type Err = CarnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !EMAIL_RE.is_match(s) {
            return Err(CarnetError::invalid_field(
                "email address",
                format!("`{s}` is not a valid address"),
            ));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = CarnetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar date in `YYYY-MM-DD` form. Only dates that exist in the
/// Gregorian calendar parse (February 29 only in leap years).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn month_day(&self) -> (u32, u32) {
        (self.0.month(), self.0.day())
    }
}

impl FromStr for BirthDate {
    type Err = CarnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, BIRTHDATE_FORMAT)
            .map(Self)
            .map_err(|_| {
                CarnetError::invalid_field("birth date", format!("`{s}` is not a YYYY-MM-DD date"))
            })
    }
}

impl TryFrom<String> for BirthDate {
    type Error = CarnetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BirthDate> for String {
    fn from(value: BirthDate) -> Self {
        value.0.format(BIRTHDATE_FORMAT).to_string()
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDATE_FORMAT))
    }
}

/// A postal address. All four parts are free-form; no validation applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.street, self.city, self.postal_code, self.country
        )
    }
}
