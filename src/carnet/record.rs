//! A single contact entry.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CarnetError, Result};
use crate::field::{Address, BirthDate, EmailAddress, Name, PhoneNumber};

/// One contact: a required name plus optional birth date and address, and
/// ordered phone/email lists (duplicates allowed, insertion order kept).
///
/// The `id` stays `None` until the record is inserted into an
/// [`AddressBook`](crate::book::AddressBook), which assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub(crate) id: Option<u64>,
    name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    birthdate: Option<BirthDate>,
    phone_numbers: Vec<PhoneNumber>,
    email_addresses: Vec<EmailAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<Address>,
}

impl Record {
    pub fn new(name: Name) -> Self {
        Self {
            id: None,
            name,
            birthdate: None,
            phone_numbers: Vec::new(),
            email_addresses: Vec::new(),
            address: None,
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn birthdate(&self) -> Option<&BirthDate> {
        self.birthdate.as_ref()
    }

    pub fn phones(&self) -> &[PhoneNumber] {
        &self.phone_numbers
    }

    pub fn emails(&self) -> &[EmailAddress] {
        &self.email_addresses
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn set_name(&mut self, name: Name) {
        self.name = name;
    }

    pub fn set_birthdate(&mut self, birthdate: BirthDate) {
        self.birthdate = Some(birthdate);
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = Some(address);
    }

    pub fn add_phone(&mut self, phone: PhoneNumber) {
        self.phone_numbers.push(phone);
    }

    pub fn add_email(&mut self, email: EmailAddress) {
        self.email_addresses.push(email);
    }

    /// Replaces the whole phone list, keeping the given order.
    pub fn set_phones(&mut self, phones: Vec<PhoneNumber>) {
        self.phone_numbers = phones;
    }

    /// Replaces the whole email list, keeping the given order.
    pub fn set_emails(&mut self, emails: Vec<EmailAddress>) {
        self.email_addresses = emails;
    }

    /// Removes the first phone equal to `phone`.
    pub fn remove_phone(&mut self, phone: &PhoneNumber) -> Result<()> {
        match self.phone_numbers.iter().position(|p| p == phone) {
            Some(pos) => {
                self.phone_numbers.remove(pos);
                Ok(())
            }
            None => Err(CarnetError::PhoneNotFound(phone.as_str().to_string())),
        }
    }

    /// Removes the first email equal to `email`.
    pub fn remove_email(&mut self, email: &EmailAddress) -> Result<()> {
        match self.email_addresses.iter().position(|e| e == email) {
            Some(pos) => {
                self.email_addresses.remove(pos);
                Ok(())
            }
            None => Err(CarnetError::EmailNotFound(email.as_str().to_string())),
        }
    }

    /// Removes `old` and appends `new`. When `old` is absent the record is
    /// left unchanged and the lookup error is returned.
    pub fn edit_phone(&mut self, old: &PhoneNumber, new: PhoneNumber) -> Result<()> {
        self.remove_phone(old)?;
        self.add_phone(new);
        Ok(())
    }

    /// Removes `old` and appends `new`. When `old` is absent the record is
    /// left unchanged and the lookup error is returned.
    pub fn edit_email(&mut self, old: &EmailAddress, new: EmailAddress) -> Result<()> {
        self.remove_email(old)?;
        self.add_email(new);
        Ok(())
    }

    /// Whole days from today's local date to the next occurrence of the
    /// birth date's month and day. `None` without a birth date.
    pub fn days_to_birthdate(&self) -> Option<i64> {
        self.days_to_birthdate_on(Local::now().date_naive())
    }

    /// Deterministic variant of [`days_to_birthdate`](Self::days_to_birthdate)
    /// taking an explicit `today`. Returns `0` when the occurrence is
    /// `today` itself; an anniversary strictly earlier in the year rolls
    /// over to next year's.
    pub fn days_to_birthdate_on(&self, today: NaiveDate) -> Option<i64> {
        let birth = self.birthdate.as_ref()?;
        let candidate = anniversary_in(birth, today.year());
        let next = if candidate < today {
            anniversary_in(birth, today.year() + 1)
        } else {
            candidate
        };
        Some((next - today).num_days())
    }

    /// One line with id, name, phones and emails, plus the birth date and
    /// day count when set; the address goes on a second line.
    pub fn render_on(&self, today: NaiveDate) -> String {
        let phones = self
            .phone_numbers
            .iter()
            .map(PhoneNumber::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let emails = self
            .email_addresses
            .iter()
            .map(EmailAddress::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let id = match self.id {
            Some(id) => id.to_string(),
            None => "-".to_string(),
        };

        let mut line = format!(
            "ID: {}, Name: {}, Phones: {}, Emails: {}",
            id, self.name, phones, emails
        );
        if let (Some(birth), Some(days)) = (&self.birthdate, self.days_to_birthdate_on(today)) {
            line.push_str(&format!(", Birthday: {birth}, Days to birthday: {days}"));
        }
        if let Some(address) = &self.address {
            line.push_str(&format!("\nAddress: {address}"));
        }
        line
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_on(Local::now().date_naive()))
    }
}

/// The birth date's anniversary within `year`. February 29 falls on
/// March 1 in non-leap years.
fn anniversary_in(birth: &BirthDate, year: i32) -> NaiveDate {
    let (month, day) = birth.month_day();
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 3, 1).expect("March 1 exists every year"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> Record {
        Record::new(name.parse().unwrap())
    }

    fn phone(value: &str) -> PhoneNumber {
        value.parse().unwrap()
    }

    fn email(value: &str) -> EmailAddress {
        value.parse().unwrap()
    }

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    #[test]
    fn phones_keep_insertion_order_and_duplicates() {
        let mut r = record("Jan");
        r.add_phone(phone("111111111"));
        r.add_phone(phone("222222222"));
        r.add_phone(phone("111111111"));
        let values: Vec<&str> = r.phones().iter().map(PhoneNumber::as_str).collect();
        assert_eq!(values, ["111111111", "222222222", "111111111"]);
    }

    #[test]
    fn remove_phone_takes_first_match_only() {
        let mut r = record("Jan");
        r.add_phone(phone("111111111"));
        r.add_phone(phone("222222222"));
        r.add_phone(phone("111111111"));
        r.remove_phone(&phone("111111111")).unwrap();
        let values: Vec<&str> = r.phones().iter().map(PhoneNumber::as_str).collect();
        assert_eq!(values, ["222222222", "111111111"]);
    }

    #[test]
    fn remove_missing_phone_fails() {
        let mut r = record("Jan");
        let err = r.remove_phone(&phone("999999999")).unwrap_err();
        assert!(matches!(err, CarnetError::PhoneNotFound(_)));
    }

    #[test]
    fn edit_phone_with_missing_old_leaves_record_unchanged() {
        let mut r = record("Jan");
        r.add_phone(phone("111111111"));
        let before = r.clone();
        assert!(r.edit_phone(&phone("999999999"), phone("222222222")).is_err());
        assert_eq!(r, before);
    }

    #[test]
    fn edit_email_replaces_value() {
        let mut r = record("Jan");
        r.add_email(email("old@x.pl"));
        r.edit_email(&email("old@x.pl"), email("new@x.pl")).unwrap();
        let values: Vec<&str> = r.emails().iter().map(EmailAddress::as_str).collect();
        assert_eq!(values, ["new@x.pl"]);
    }

    #[test]
    fn days_to_birthdate_none_without_birthdate() {
        assert_eq!(record("Jan").days_to_birthdate_on(date("2024-03-01")), None);
    }

    #[test]
    fn days_to_birthdate_counts_whole_days() {
        let mut r = record("Jan");
        r.set_birthdate("2000-03-07".parse().unwrap());
        assert_eq!(r.days_to_birthdate_on(date("2024-03-01")), Some(6));

        let mut r = record("Anna");
        r.set_birthdate("2000-03-08".parse().unwrap());
        assert_eq!(r.days_to_birthdate_on(date("2024-03-01")), Some(7));
    }

    #[test]
    fn birthday_today_is_zero() {
        let mut r = record("Jan");
        r.set_birthdate("1990-03-01".parse().unwrap());
        assert_eq!(r.days_to_birthdate_on(date("2024-03-01")), Some(0));
    }

    #[test]
    fn passed_birthday_rolls_to_next_year() {
        let mut r = record("Jan");
        r.set_birthdate("1990-02-28".parse().unwrap());
        // 2024-03-01 -> 2025-02-28 is 364 days (2024 is a leap year).
        assert_eq!(r.days_to_birthdate_on(date("2024-03-01")), Some(364));
    }

    #[test]
    fn day_count_stays_within_a_year() {
        let mut r = record("Jan");
        r.set_birthdate("1996-02-29".parse().unwrap());
        for start in ["2023-01-01", "2024-02-29", "2024-03-01", "2025-12-31"] {
            let days = r.days_to_birthdate_on(date(start)).unwrap();
            assert!((0..=366).contains(&days), "{start}: {days}");
        }
    }

    #[test]
    fn leap_day_falls_on_march_first_in_common_years() {
        let mut r = record("Jan");
        r.set_birthdate("1996-02-29".parse().unwrap());
        assert_eq!(r.days_to_birthdate_on(date("2023-02-28")), Some(1));
        assert_eq!(r.days_to_birthdate_on(date("2023-03-01")), Some(0));
        // In a leap year the real date is used.
        assert_eq!(r.days_to_birthdate_on(date("2024-02-29")), Some(0));
    }

    #[test]
    fn render_includes_birthday_and_address_lines() {
        let mut r = record("Jan Kowalski");
        r.id = Some(3);
        r.add_phone(phone("501501501"));
        r.add_email(email("jan@x.pl"));
        r.set_birthdate("2000-03-07".parse().unwrap());
        r.set_address(Address::new("Polna 1", "Warszawa", "00-001", "Polska"));

        let rendered = r.render_on(date("2024-03-01"));
        assert_eq!(
            rendered,
            "ID: 3, Name: Jan Kowalski, Phones: 501501501, Emails: jan@x.pl, \
             Birthday: 2000-03-07, Days to birthday: 6\n\
             Address: Polna 1, Warszawa, 00-001, Polska"
        );
    }

    #[test]
    fn render_without_optionals_is_one_line() {
        let mut r = record("Anna Nowak");
        r.id = Some(1);
        let rendered = r.render_on(date("2024-03-01"));
        assert_eq!(rendered, "ID: 1, Name: Anna Nowak, Phones: , Emails: ");
        assert!(!rendered.contains('\n'));
    }
}
