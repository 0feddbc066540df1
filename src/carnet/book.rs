//! The address book aggregate.
//!
//! Records are keyed by small integer ids assigned on insertion. Deleted
//! ids go into a free pool and are reused smallest-first, keeping the id
//! space dense. Listing and search iterate in insertion order.

use chrono::{Local, NaiveDate};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{CarnetError, Result};
use crate::record::Record;
use crate::store::{self, LoadOutcome};

#[derive(Debug)]
pub struct AddressBook {
    records: BTreeMap<u64, Record>,
    /// Ids in the order their records were inserted.
    order: Vec<u64>,
    /// Candidate for the next fresh id; never regresses.
    next_id: u64,
    /// Previously assigned ids freed by deletion, available for reuse.
    free_ids: BTreeSet<u64>,
}

/// On-disk shape: the records in insertion order, each carrying its id.
#[derive(Serialize, Deserialize)]
struct BookSnapshot {
    records: Vec<Record>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            order: Vec::new(),
            next_id: 1,
            free_ids: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, id: u64) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn record_mut(&mut self, id: u64) -> Option<&mut Record> {
        self.records.get_mut(&id)
    }

    /// All records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Inserts `record` and assigns its id: the smallest freed id when one
    /// exists, otherwise the next fresh one. Returns the assigned id.
    ///
    /// The record must not already carry an id.
    pub fn add_record(&mut self, mut record: Record) -> Result<u64> {
        if let Some(id) = record.id {
            return Err(CarnetError::Store(format!(
                "record {id} already belongs to an address book"
            )));
        }

        // Keep next_id a valid fresh candidate so the fresh path below
        // never collides with a live or freed id.
        while self.records.contains_key(&self.next_id) || self.free_ids.contains(&self.next_id) {
            self.next_id += 1;
        }

        let id = match self.free_ids.pop_first() {
            Some(smallest) => smallest,
            None => {
                let fresh = self.next_id;
                self.next_id += 1;
                fresh
            }
        };

        record.id = Some(id);
        self.records.insert(id, record);
        self.order.push(id);
        debug!("assigned contact id {id}");
        Ok(id)
    }

    /// Removes the record with `id` and frees the id for reuse.
    pub fn delete_record(&mut self, id: u64) -> Result<()> {
        if self.records.remove(&id).is_none() {
            return Err(CarnetError::RecordNotFound(id));
        }
        self.order.retain(|&kept| kept != id);
        self.free_ids.insert(id);
        debug!("freed contact id {id}");
        Ok(())
    }

    /// Records matching `term`: case-insensitive substring of the name, or
    /// case-sensitive substring of any phone or email value. Each record
    /// appears at most once, in insertion order.
    pub fn find(&self, term: &str) -> Vec<&Record> {
        let needle = term.to_lowercase();
        self.records()
            .filter(|record| {
                record.name().as_str().to_lowercase().contains(&needle)
                    || record.phones().iter().any(|p| p.as_str().contains(term))
                    || record.emails().iter().any(|e| e.as_str().contains(term))
            })
            .collect()
    }

    /// Records whose birthday comes up in strictly less than `window_days`
    /// whole days from today's local date.
    pub fn with_upcoming_birthdays(&self, window_days: i64) -> Vec<&Record> {
        self.upcoming_birthdays_on(window_days, Local::now().date_naive())
    }

    /// Deterministic variant of
    /// [`with_upcoming_birthdays`](Self::with_upcoming_birthdays) taking an
    /// explicit `today`.
    pub fn upcoming_birthdays_on(&self, window_days: i64, today: NaiveDate) -> Vec<&Record> {
        self.records()
            .filter(|record| {
                matches!(record.days_to_birthdate_on(today), Some(days) if days < window_days)
            })
            .collect()
    }

    /// Writes the whole book to `path` (write-temp-then-rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = BookSnapshot {
            records: self.records().cloned().collect(),
        };
        store::write_snapshot(path, &snapshot)?;
        info!(
            "saved {} contacts to {}",
            snapshot.records.len(),
            path.display()
        );
        Ok(())
    }

    /// Replaces the in-memory state with the file's contents. A missing
    /// file is benign; a corrupt one fails and leaves the book untouched.
    /// After a successful load `next_id` is `max(live ids) + 1` and
    /// `free_ids` is empty.
    pub fn load(&mut self, path: &Path) -> Result<LoadOutcome> {
        let Some(snapshot) = store::read_snapshot::<BookSnapshot>(path)? else {
            info!("no address book at {}", path.display());
            return Ok(LoadOutcome::MissingFile);
        };

        let mut records = BTreeMap::new();
        let mut order = Vec::with_capacity(snapshot.records.len());
        for record in snapshot.records {
            let id = record
                .id()
                .ok_or_else(|| CarnetError::Store("record without an id".to_string()))?;
            if records.insert(id, record).is_some() {
                return Err(CarnetError::Store(format!("duplicate record id {id}")));
            }
            order.push(id);
        }

        self.next_id = records.keys().next_back().map_or(1, |max| max + 1);
        self.free_ids.clear();
        self.order = order;
        self.records = records;
        info!(
            "loaded {} contacts from {}",
            self.records.len(),
            path.display()
        );
        Ok(LoadOutcome::Loaded)
    }
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::PhoneNumber;

    fn record(name: &str) -> Record {
        Record::new(name.parse().unwrap())
    }

    fn contact(name: &str, phone: &str, email: &str) -> Record {
        let mut r = record(name);
        r.add_phone(phone.parse().unwrap());
        r.add_email(email.parse().unwrap());
        r
    }

    #[test]
    fn assigns_sequential_ids_from_one() {
        let mut book = AddressBook::new();
        assert_eq!(book.add_record(record("A")).unwrap(), 1);
        assert_eq!(book.add_record(record("B")).unwrap(), 2);
        assert_eq!(book.add_record(record("C")).unwrap(), 3);
    }

    #[test]
    fn reuses_smallest_freed_id_first() {
        let mut book = AddressBook::new();
        book.add_record(record("A")).unwrap();
        book.add_record(record("B")).unwrap();
        book.add_record(record("C")).unwrap();

        book.delete_record(2).unwrap();
        assert_eq!(book.add_record(record("D")).unwrap(), 2);
        assert_eq!(book.add_record(record("E")).unwrap(), 4);
    }

    #[test]
    fn stored_key_equals_record_id() {
        let mut book = AddressBook::new();
        let id = book.add_record(record("A")).unwrap();
        assert_eq!(book.record(id).unwrap().id(), Some(id));
    }

    #[test]
    fn rejects_record_that_already_has_an_id() {
        let mut book = AddressBook::new();
        let id = book.add_record(record("A")).unwrap();
        let stolen = book.record(id).unwrap().clone();
        assert!(matches!(
            book.add_record(stolen),
            Err(CarnetError::Store(_))
        ));
    }

    #[test]
    fn delete_missing_record_fails() {
        let mut book = AddressBook::new();
        assert!(matches!(
            book.delete_record(7),
            Err(CarnetError::RecordNotFound(7))
        ));
    }

    #[test]
    fn find_matches_name_phone_and_email() {
        let mut book = AddressBook::new();
        book.add_record(contact("Jan Kowalski", "501501501", "jan@x.pl"))
            .unwrap();
        book.add_record(contact("Anna Nowak", "602602602", "anna@y.pl"))
            .unwrap();

        let names = |found: Vec<&Record>| {
            found
                .iter()
                .map(|r| r.name().as_str().to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(book.find("kow")), ["Jan Kowalski"]);
        assert_eq!(names(book.find("602")), ["Anna Nowak"]);
        assert_eq!(names(book.find("@")), ["Jan Kowalski", "Anna Nowak"]);
        assert!(book.find("missing").is_empty());
    }

    #[test]
    fn find_is_case_sensitive_for_emails() {
        let mut book = AddressBook::new();
        book.add_record(contact("Jan", "501501501", "Jan@X.pl")).unwrap();
        assert_eq!(book.find("Jan@X.pl").len(), 1);
        assert!(book.find("jan@x.pl").is_empty());
    }

    #[test]
    fn find_returns_each_record_once() {
        let mut book = AddressBook::new();
        // "jan" hits both the name and the email.
        book.add_record(contact("Jan", "501501501", "jan@x.pl")).unwrap();
        assert_eq!(book.find("jan").len(), 1);
    }

    #[test]
    fn find_follows_insertion_order_after_id_reuse() {
        let mut book = AddressBook::new();
        book.add_record(contact("Adam One", "111111111", "a@x.pl"))
            .unwrap();
        book.add_record(contact("Adam Two", "222222222", "b@x.pl"))
            .unwrap();
        book.delete_record(1).unwrap();
        book.add_record(contact("Adam Three", "333333333", "c@x.pl"))
            .unwrap();

        let found: Vec<&str> = book
            .find("Adam")
            .iter()
            .map(|r| r.name().as_str())
            .collect();
        assert_eq!(found, ["Adam Two", "Adam Three"]);
    }

    #[test]
    fn upcoming_birthdays_use_strict_window() {
        let today: NaiveDate = "2024-03-01".parse().unwrap();
        let mut book = AddressBook::new();

        let mut soon = record("Jan");
        soon.set_birthdate("2000-03-07".parse().unwrap());
        book.add_record(soon).unwrap();

        let mut later = record("Anna");
        later.set_birthdate("2000-03-08".parse().unwrap());
        book.add_record(later).unwrap();

        book.add_record(record("Bez Daty")).unwrap();

        let upcoming = book.upcoming_birthdays_on(7, today);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].name().as_str(), "Jan");
    }

    #[test]
    fn save_load_round_trips_records_and_resets_id_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pickle");

        let mut book = AddressBook::new();
        let mut r = contact("Jan Kowalski", "501501501", "jan@x.pl");
        r.set_birthdate("2000-03-07".parse().unwrap());
        book.add_record(r).unwrap();
        book.add_record(contact("Anna Nowak", "602602602", "anna@y.pl"))
            .unwrap();
        book.add_record(record("Trzeci")).unwrap();
        book.delete_record(2).unwrap();
        book.save(&path).unwrap();

        let mut loaded = AddressBook::new();
        assert_eq!(loaded.load(&path).unwrap(), LoadOutcome::Loaded);

        let original: Vec<Record> = book.records().cloned().collect();
        let restored: Vec<Record> = loaded.records().cloned().collect();
        assert_eq!(original, restored);

        // Freed ids do not survive persistence: ids restart dense above max.
        assert_eq!(loaded.next_id, 4);
        assert!(loaded.free_ids.is_empty());
        assert_eq!(loaded.add_record(record("Nowy")).unwrap(), 4);
    }

    #[test]
    fn load_missing_file_is_benign_and_first_id_is_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pickle");

        let mut book = AddressBook::new();
        assert_eq!(book.load(&path).unwrap(), LoadOutcome::MissingFile);
        assert!(book.is_empty());
        assert_eq!(book.add_record(record("Pierwszy")).unwrap(), 1);
    }

    #[test]
    fn load_corrupt_file_fails_and_leaves_book_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pickle");
        std::fs::write(&path, "definitely not json").unwrap();

        let mut book = AddressBook::new();
        book.add_record(record("Istnieje")).unwrap();

        assert!(matches!(
            book.load(&path),
            Err(CarnetError::Serialization(_))
        ));
        assert_eq!(book.len(), 1);
        assert_eq!(book.record(1).unwrap().name().as_str(), "Istnieje");
    }

    #[test]
    fn load_rejects_unknown_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pickle");
        std::fs::write(&path, r#"{"version": 99, "data": {"records": []}}"#).unwrap();

        let mut book = AddressBook::new();
        assert!(matches!(book.load(&path), Err(CarnetError::Store(_))));
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pickle");
        std::fs::write(
            &path,
            r#"{"version": 1, "data": {"records": [
                {"id": 1, "name": "A", "phone_numbers": [], "email_addresses": []},
                {"id": 1, "name": "B", "phone_numbers": [], "email_addresses": []}
            ]}}"#,
        )
        .unwrap();

        let mut book = AddressBook::new();
        assert!(matches!(book.load(&path), Err(CarnetError::Store(_))));
    }

    #[test]
    fn persisted_phones_keep_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pickle");

        let mut book = AddressBook::new();
        let mut r = record("Jan");
        r.add_phone("333333333".parse().unwrap());
        r.add_phone("111111111".parse().unwrap());
        r.add_phone("333333333".parse().unwrap());
        book.add_record(r).unwrap();
        book.save(&path).unwrap();

        let mut loaded = AddressBook::new();
        loaded.load(&path).unwrap();
        let phones: Vec<&str> = loaded
            .record(1)
            .unwrap()
            .phones()
            .iter()
            .map(PhoneNumber::as_str)
            .collect();
        assert_eq!(phones, ["333333333", "111111111", "333333333"]);
    }
}
