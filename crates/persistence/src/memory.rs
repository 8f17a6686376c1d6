//! In-memory store for tests and database-less development
//!
//! Implements all store traits over a single mutex-guarded state. The
//! cancel path holds the lock across its read-check-write sequence, so
//! it serializes concurrent cancellations the same way the MySQL row
//! lock does.

use crate::bookings::{BookingRecord, BookingStore, CancelOutcome, PnrDetails, UserDetails};
use crate::error::StoreError;
use crate::stations::{Station, StationStore};
use crate::trains::{FareEntry, TrainStore, TrainSummary};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use parking_lot::Mutex;
use rail_assist_core::{Pnr, TicketStatus, UserId};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Reservation {
    train_number: u64,
    travel_date: Option<NaiveDate>,
    class: Option<String>,
    seat: Option<String>,
    status: TicketStatus,
}

#[derive(Default)]
struct Inner {
    trains: Vec<TrainSummary>,
    fares: HashMap<u64, Vec<FareEntry>>,
    reservations: HashMap<u64, Reservation>,
    users: HashMap<u64, UserDetails>,
    history: Vec<(u64, u64, Option<NaiveDate>)>,
    stations: Vec<Station>,
    fail_next_cancel_write: bool,
    busy: bool,
}

/// In-memory implementation of every store trait
#[derive(Clone, Default)]
pub struct InMemoryRailStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryRailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_train(
        self,
        train_number: u64,
        from: &str,
        to: &str,
        departure: Option<NaiveTime>,
        status: &str,
    ) -> Self {
        self.inner.lock().trains.push(TrainSummary {
            train_number,
            from_location: from.to_string(),
            to_location: to.to_string(),
            departure,
            status: status.to_string(),
        });
        self
    }

    pub fn with_fare(self, train_number: u64, class: &str, fare: f64) -> Self {
        self.inner
            .lock()
            .fares
            .entry(train_number)
            .or_default()
            .push(FareEntry {
                class: class.to_string(),
                fare,
            });
        self
    }

    pub fn with_reservation(
        self,
        pnr: Pnr,
        train_number: u64,
        travel_date: Option<NaiveDate>,
        class: Option<&str>,
        seat: Option<&str>,
        status: TicketStatus,
    ) -> Self {
        self.inner.lock().reservations.insert(
            pnr.as_u64(),
            Reservation {
                train_number,
                travel_date,
                class: class.map(str::to_string),
                seat: seat.map(str::to_string),
                status,
            },
        );
        self
    }

    pub fn with_user(self, user_id: UserId, name: &str) -> Self {
        self.with_user_contact(user_id, name, None, None)
    }

    pub fn with_user_contact(
        self,
        user_id: UserId,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Self {
        self.inner.lock().users.insert(
            user_id.as_u64(),
            UserDetails {
                user_id,
                name: name.to_string(),
                email: email.map(str::to_string),
                phone: phone.map(str::to_string),
            },
        );
        self
    }

    pub fn with_booking(self, user_id: UserId, pnr: Pnr, booking_date: Option<NaiveDate>) -> Self {
        self.inner
            .lock()
            .history
            .push((user_id.as_u64(), pnr.as_u64(), booking_date));
        self
    }

    pub fn with_station(self, code: &str, name: &str, city: Option<&str>) -> Self {
        self.inner.lock().stations.push(Station {
            code: code.to_string(),
            name: name.to_string(),
            city: city.map(str::to_string),
            state: None,
        });
        self
    }

    /// Make the next cancel's write report zero affected rows.
    pub fn fail_next_cancel_write(&self) {
        self.inner.lock().fail_next_cancel_write = true;
    }

    /// Make every cancel report a held row lock.
    pub fn set_busy(&self, busy: bool) {
        self.inner.lock().busy = busy;
    }

    /// Current stored status of a reservation, for assertions.
    pub fn reservation_status(&self, pnr: Pnr) -> Option<TicketStatus> {
        self.inner
            .lock()
            .reservations
            .get(&pnr.as_u64())
            .map(|r| r.status.clone())
    }
}

fn matches_location(location: &str, term: &str) -> bool {
    location
        .to_lowercase()
        .contains(&term.trim().to_lowercase())
}

#[async_trait]
impl TrainStore for InMemoryRailStore {
    async fn train(&self, train_number: u64) -> Result<Option<TrainSummary>, StoreError> {
        Ok(self
            .inner
            .lock()
            .trains
            .iter()
            .find(|t| t.train_number == train_number)
            .cloned())
    }

    async fn find_trains(
        &self,
        from: &str,
        to: &str,
        limit: u32,
    ) -> Result<Vec<TrainSummary>, StoreError> {
        let mut out: Vec<TrainSummary> = self
            .inner
            .lock()
            .trains
            .iter()
            .filter(|t| {
                matches_location(&t.from_location, from) && matches_location(&t.to_location, to)
            })
            .cloned()
            .collect();
        out.sort_by_key(|t| t.departure);
        out.truncate(limit as usize);
        Ok(out)
    }

    async fn trains_from(&self, from: &str, limit: u32) -> Result<Vec<TrainSummary>, StoreError> {
        let mut out: Vec<TrainSummary> = self
            .inner
            .lock()
            .trains
            .iter()
            .filter(|t| matches_location(&t.from_location, from))
            .cloned()
            .collect();
        out.sort_by_key(|t| t.departure);
        out.truncate(limit as usize);
        Ok(out)
    }

    async fn all_trains(&self, limit: u32) -> Result<Vec<TrainSummary>, StoreError> {
        let mut out: Vec<TrainSummary> = self.inner.lock().trains.clone();
        out.sort_by_key(|t| t.train_number);
        out.truncate(limit as usize);
        Ok(out)
    }

    async fn fares(&self, train_number: u64) -> Result<Vec<FareEntry>, StoreError> {
        let mut out = self
            .inner
            .lock()
            .fares
            .get(&train_number)
            .cloned()
            .unwrap_or_default();
        out.sort_by(|a, b| a.fare.total_cmp(&b.fare));
        Ok(out)
    }

    async fn train_exists(&self, train_number: u64) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .lock()
            .trains
            .iter()
            .any(|t| t.train_number == train_number))
    }
}

#[async_trait]
impl BookingStore for InMemoryRailStore {
    async fn pnr_details(&self, pnr: Pnr) -> Result<Option<PnrDetails>, StoreError> {
        let inner = self.inner.lock();
        let Some(res) = inner.reservations.get(&pnr.as_u64()) else {
            return Ok(None);
        };
        // Joins against the train row; a dangling reservation yields no
        // result, same as the SQL inner join.
        let Some(train) = inner
            .trains
            .iter()
            .find(|t| t.train_number == res.train_number)
        else {
            return Ok(None);
        };
        Ok(Some(PnrDetails {
            pnr,
            train_number: res.train_number,
            from_location: train.from_location.clone(),
            to_location: train.to_location.clone(),
            departure: train.departure,
            travel_date: res.travel_date,
            class: res.class.clone(),
            seat: res.seat.clone(),
            status: res.status.clone(),
            train_status: train.status.clone(),
        }))
    }

    async fn user(&self, user_id: UserId) -> Result<Option<UserDetails>, StoreError> {
        Ok(self.inner.lock().users.get(&user_id.as_u64()).cloned())
    }

    async fn users(&self, limit: u32) -> Result<Vec<UserDetails>, StoreError> {
        let mut out: Vec<UserDetails> = self.inner.lock().users.values().cloned().collect();
        out.sort_by_key(|u| u.user_id.as_u64());
        out.truncate(limit as usize);
        Ok(out)
    }

    async fn booking_history(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<BookingRecord>, StoreError> {
        let inner = self.inner.lock();
        let mut out: Vec<BookingRecord> = inner
            .history
            .iter()
            .rev()
            .filter(|(uid, _, _)| *uid == user_id.as_u64())
            .filter_map(|(_, pnr_num, booking_date)| {
                let res = inner.reservations.get(pnr_num)?;
                let train = inner
                    .trains
                    .iter()
                    .find(|t| t.train_number == res.train_number)?;
                let pnr = Pnr::parse(&format!("{pnr_num:010}")).ok()?;
                Some(BookingRecord {
                    pnr,
                    train_number: res.train_number,
                    from_location: train.from_location.clone(),
                    to_location: train.to_location.clone(),
                    journey_date: res.travel_date,
                    seat: res.seat.clone(),
                    booking_date: *booking_date,
                    status: res.status.clone(),
                })
            })
            .collect();
        out.sort_by(|a, b| {
            b.journey_date
                .cmp(&a.journey_date)
                .then(b.booking_date.cmp(&a.booking_date))
        });
        out.truncate(limit as usize);
        Ok(out)
    }

    async fn cancel(&self, pnr: Pnr) -> Result<CancelOutcome, StoreError> {
        // One guard across the read-check-write sequence stands in for
        // the FOR UPDATE row lock.
        let mut inner = self.inner.lock();

        if inner.busy {
            return Ok(CancelOutcome::Busy);
        }

        let Some(res) = inner.reservations.get(&pnr.as_u64()) else {
            return Ok(CancelOutcome::NotFound);
        };

        if res.status.is_cancelled() {
            return Ok(CancelOutcome::AlreadyCancelled);
        }

        if inner.fail_next_cancel_write {
            inner.fail_next_cancel_write = false;
            return Err(StoreError::LockAnomaly(0));
        }

        inner
            .reservations
            .get_mut(&pnr.as_u64())
            .map(|r| r.status = TicketStatus::Cancelled);
        Ok(CancelOutcome::Cancelled)
    }
}

#[async_trait]
impl StationStore for InMemoryRailStore {
    async fn find_stations(&self, term: &str, limit: u32) -> Result<Vec<Station>, StoreError> {
        let needle = term.trim().to_lowercase();
        let mut out: Vec<Station> = self
            .inner
            .lock()
            .stations
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle) || s.code.to_lowercase() == needle
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out.truncate(limit as usize);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pnr(n: u64) -> Pnr {
        Pnr::parse(&format!("{n:010}")).unwrap()
    }

    fn seeded() -> InMemoryRailStore {
        InMemoryRailStore::new()
            .with_train(
                12951,
                "Mumbai Central",
                "New Delhi",
                NaiveTime::from_hms_opt(17, 0, 0),
                "On Time",
            )
            .with_reservation(
                pnr(1234567890),
                12951,
                NaiveDate::from_ymd_opt(2025, 6, 1),
                Some("3A"),
                Some("B2-41"),
                TicketStatus::Confirmed,
            )
    }

    #[tokio::test]
    async fn cancel_confirms_then_reports_already_cancelled() {
        let store = seeded();
        assert_eq!(
            store.cancel(pnr(1234567890)).await.unwrap(),
            CancelOutcome::Cancelled
        );
        assert_eq!(
            store.reservation_status(pnr(1234567890)),
            Some(TicketStatus::Cancelled)
        );
        assert_eq!(
            store.cancel(pnr(1234567890)).await.unwrap(),
            CancelOutcome::AlreadyCancelled
        );
    }

    #[tokio::test]
    async fn cancel_unknown_pnr_is_not_found() {
        let store = seeded();
        assert_eq!(
            store.cancel(pnr(9999999999)).await.unwrap(),
            CancelOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn cancel_write_failure_leaves_status_unchanged() {
        let store = seeded();
        store.fail_next_cancel_write();
        let err = store.cancel(pnr(1234567890)).await.unwrap_err();
        assert!(matches!(err, StoreError::LockAnomaly(0)));
        assert_eq!(
            store.reservation_status(pnr(1234567890)),
            Some(TicketStatus::Confirmed)
        );
    }

    #[tokio::test]
    async fn concurrent_cancels_serialize_to_one_winner() {
        let store = seeded();
        let a = store.clone();
        let b = store.clone();
        let (ra, rb) = tokio::join!(
            tokio::spawn(async move { a.cancel(pnr(1234567890)).await.unwrap() }),
            tokio::spawn(async move { b.cancel(pnr(1234567890)).await.unwrap() }),
        );
        let outcomes = [ra.unwrap(), rb.unwrap()];
        assert!(outcomes.contains(&CancelOutcome::Cancelled));
        // The loser either saw the winner's write or raced first and won
        // itself; exactly one Cancelled in every interleaving.
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| **o == CancelOutcome::Cancelled)
                .count(),
            1
        );
        assert_eq!(
            store.reservation_status(pnr(1234567890)),
            Some(TicketStatus::Cancelled)
        );
    }

    #[tokio::test]
    async fn busy_store_reports_busy_without_writing() {
        let store = seeded();
        store.set_busy(true);
        assert_eq!(
            store.cancel(pnr(1234567890)).await.unwrap(),
            CancelOutcome::Busy
        );
        assert_eq!(
            store.reservation_status(pnr(1234567890)),
            Some(TicketStatus::Confirmed)
        );
    }

    #[tokio::test]
    async fn find_trains_matches_substrings_case_insensitively() {
        let store = seeded();
        let found = store.find_trains("mumbai", "DELHI", 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].train_number, 12951);
    }

    #[tokio::test]
    async fn booking_history_orders_most_recent_first() {
        let store = seeded()
            .with_train(12952, "New Delhi", "Mumbai Central", None, "On Time")
            .with_reservation(
                pnr(1111111111),
                12952,
                NaiveDate::from_ymd_opt(2025, 7, 1),
                Some("SL"),
                None,
                TicketStatus::Waitlisted,
            )
            .with_user(UserId::parse("42").unwrap(), "Asha")
            .with_booking(
                UserId::parse("42").unwrap(),
                pnr(1234567890),
                NaiveDate::from_ymd_opt(2025, 5, 20),
            )
            .with_booking(
                UserId::parse("42").unwrap(),
                pnr(1111111111),
                NaiveDate::from_ymd_opt(2025, 6, 25),
            );

        let history = store
            .booking_history(UserId::parse("42").unwrap(), 5)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].pnr, pnr(1111111111));
        assert_eq!(history[1].pnr, pnr(1234567890));
    }

    #[tokio::test]
    async fn booking_history_orders_by_journey_date_before_booking_date() {
        // The earlier booking is for the later journey; journey date wins.
        let store = seeded()
            .with_train(12952, "New Delhi", "Mumbai Central", None, "On Time")
            .with_reservation(
                pnr(1111111111),
                12952,
                NaiveDate::from_ymd_opt(2025, 8, 15),
                Some("SL"),
                Some("S4-12"),
                TicketStatus::Confirmed,
            )
            .with_user(UserId::parse("42").unwrap(), "Asha")
            .with_booking(
                UserId::parse("42").unwrap(),
                pnr(1111111111),
                NaiveDate::from_ymd_opt(2025, 4, 1),
            )
            .with_booking(
                UserId::parse("42").unwrap(),
                pnr(1234567890),
                NaiveDate::from_ymd_opt(2025, 5, 20),
            );

        let history = store
            .booking_history(UserId::parse("42").unwrap(), 5)
            .await
            .unwrap();
        // Journey 2025-08-15 outranks journey 2025-06-01 despite the
        // older booking date.
        assert_eq!(history[0].pnr, pnr(1111111111));
        assert_eq!(history[0].journey_date, NaiveDate::from_ymd_opt(2025, 8, 15));
        assert_eq!(history[0].seat.as_deref(), Some("S4-12"));
        assert_eq!(history[1].pnr, pnr(1234567890));
    }

    #[tokio::test]
    async fn users_lists_in_id_order_up_to_the_limit() {
        let store = InMemoryRailStore::new()
            .with_user(UserId::parse("7").unwrap(), "Ravi")
            .with_user(UserId::parse("3").unwrap(), "Meera")
            .with_user(UserId::parse("11").unwrap(), "Asha");

        let users = store.users(2).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Meera");
        assert_eq!(users[1].name, "Ravi");
    }
}
