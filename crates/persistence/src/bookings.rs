//! Reservation and booking stores
//!
//! Home of the ticket cancellation transaction: the PNR row is read
//! under `SELECT ... FOR UPDATE` so concurrent cancellations of the same
//! ticket serialize, cancelling an already-cancelled ticket is a no-op,
//! and every non-success path rolls the transaction back.

use crate::client::Db;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rail_assist_core::{Pnr, TicketStatus, UserId};
use sqlx::mysql::MySqlDatabaseError;

/// MySQL error 1205: lock wait timeout exceeded
const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;

/// A reservation joined with its train's details
#[derive(Debug, Clone, PartialEq)]
pub struct PnrDetails {
    pub pnr: Pnr,
    pub train_number: u64,
    pub from_location: String,
    pub to_location: String,
    pub departure: Option<NaiveTime>,
    pub travel_date: Option<NaiveDate>,
    pub class: Option<String>,
    pub seat: Option<String>,
    pub status: TicketStatus,
    /// Operational status of the train itself, e.g. "On Time".
    pub train_status: String,
}

/// One past booking of a user, joined with train and ticket details
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub pnr: Pnr,
    pub train_number: u64,
    pub from_location: String,
    pub to_location: String,
    pub journey_date: Option<NaiveDate>,
    pub seat: Option<String>,
    pub booking_date: Option<NaiveDate>,
    pub status: TicketStatus,
}

/// Registered user profile
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Result of a cancellation attempt.
///
/// All four variants are committed-or-rolled-back states: `Cancelled`
/// is the only one that commits, the rest leave the database unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The ticket was live and is now cancelled.
    Cancelled,
    /// The ticket was already cancelled; nothing was written.
    AlreadyCancelled,
    /// No reservation exists under this PNR.
    NotFound,
    /// Another transaction held the row lock past the wait timeout.
    /// The caller may retry.
    Busy,
}

/// Access to reservations, users, and booking history
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Full reservation details for a PNR, joined with the train row.
    async fn pnr_details(&self, pnr: Pnr) -> Result<Option<PnrDetails>, StoreError>;

    /// Profile of a registered user.
    async fn user(&self, user_id: UserId) -> Result<Option<UserDetails>, StoreError>;

    /// Registered users ordered by id, for the admin listing.
    async fn users(&self, limit: u32) -> Result<Vec<UserDetails>, StoreError>;

    /// A user's bookings, most recent first.
    async fn booking_history(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<BookingRecord>, StoreError>;

    /// Cancel the reservation under `pnr`. See [`CancelOutcome`].
    async fn cancel(&self, pnr: Pnr) -> Result<CancelOutcome, StoreError>;
}

/// [`BookingStore`] backed by MySQL
#[derive(Clone)]
pub struct MySqlBookingStore {
    db: Db,
}

impl MySqlBookingStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

fn is_lock_wait_timeout(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.try_downcast_ref::<MySqlDatabaseError>())
        .map(|db| db.number() == ER_LOCK_WAIT_TIMEOUT)
        .unwrap_or(false)
}

type PnrRow = (
    u64,
    u64,
    String,
    String,
    Option<NaiveTime>,
    Option<NaiveDate>,
    Option<String>,
    Option<String>,
    String,
    String,
);

type HistoryRow = (
    u64,
    u64,
    String,
    String,
    Option<NaiveDate>,
    Option<String>,
    Option<NaiveDate>,
    String,
);

#[async_trait]
impl BookingStore for MySqlBookingStore {
    async fn pnr_details(&self, pnr: Pnr) -> Result<Option<PnrDetails>, StoreError> {
        let row: Option<PnrRow> = sqlx::query_as(
            "SELECT p.pnr_number, p.train_number, t.from_location, t.to_location,
                    t.timings, p.travel_date, p.class, p.seat_number, p.status, t.status
             FROM pnr_status p
             JOIN train_details t ON t.train_number = p.train_number
             WHERE p.pnr_number = ?",
        )
        .bind(pnr.as_u64())
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| PnrDetails {
            pnr,
            train_number: r.1,
            from_location: r.2,
            to_location: r.3,
            departure: r.4,
            travel_date: r.5,
            class: r.6,
            seat: r.7,
            status: TicketStatus::from_db(&r.8),
            train_status: r.9,
        }))
    }

    async fn user(&self, user_id: UserId) -> Result<Option<UserDetails>, StoreError> {
        let row: Option<(u64, String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT user_id, name, email, phone FROM user_details WHERE user_id = ?",
        )
        .bind(user_id.as_u64())
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|(_, name, email, phone)| UserDetails {
            user_id,
            name,
            email,
            phone,
        }))
    }

    async fn users(&self, limit: u32) -> Result<Vec<UserDetails>, StoreError> {
        let rows: Vec<(u64, String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT user_id, name, email, phone FROM user_details ORDER BY user_id LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter()
            .map(|(id, name, email, phone)| {
                let user_id = UserId::parse(&id.to_string())
                    .map_err(|e| StoreError::InvalidData(e.to_string()))?;
                Ok(UserDetails {
                    user_id,
                    name,
                    email,
                    phone,
                })
            })
            .collect()
    }

    async fn booking_history(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<BookingRecord>, StoreError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            "SELECT b.pnr_number, b.train_number, t.from_location, t.to_location,
                    p.travel_date, p.seat_number, b.booking_date, p.status
             FROM booking_history b
             JOIN train_details t ON t.train_number = b.train_number
             JOIN pnr_status p ON p.pnr_number = b.pnr_number
             WHERE b.user_id = ?
             ORDER BY p.travel_date DESC, b.booking_date DESC, b.booking_id DESC
             LIMIT ?",
        )
        .bind(user_id.as_u64())
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter()
            .map(|r| {
                let pnr = Pnr::parse(&format!("{:010}", r.0))
                    .map_err(|e| StoreError::InvalidData(e.to_string()))?;
                Ok(BookingRecord {
                    pnr,
                    train_number: r.1,
                    from_location: r.2,
                    to_location: r.3,
                    journey_date: r.4,
                    seat: r.5,
                    booking_date: r.6,
                    status: TicketStatus::from_db(&r.7),
                })
            })
            .collect()
    }

    async fn cancel(&self, pnr: Pnr) -> Result<CancelOutcome, StoreError> {
        let mut tx = self.db.pool().begin().await?;

        // Keep a hung peer from stalling this request indefinitely. The
        // session setting scopes to this pooled connection.
        sqlx::query("SET SESSION innodb_lock_wait_timeout = ?")
            .bind(self.db.lock_wait_timeout().as_secs() as i64)
            .execute(&mut *tx)
            .await?;

        // Lock the PNR row so a concurrent cancel of the same ticket
        // waits here until we commit or roll back.
        let locked: Result<Option<(String,)>, sqlx::Error> =
            sqlx::query_as("SELECT status FROM pnr_status WHERE pnr_number = ? FOR UPDATE")
                .bind(pnr.as_u64())
                .fetch_optional(&mut *tx)
                .await;

        let row = match locked {
            Ok(row) => row,
            Err(err) if is_lock_wait_timeout(&err) => {
                tx.rollback().await?;
                tracing::warn!(%pnr, "Lock wait timeout while cancelling");
                return Ok(CancelOutcome::Busy);
            }
            Err(err) => return Err(err.into()),
        };

        let Some((status,)) = row else {
            tx.rollback().await?;
            return Ok(CancelOutcome::NotFound);
        };

        if TicketStatus::from_db(&status).is_cancelled() {
            tx.rollback().await?;
            return Ok(CancelOutcome::AlreadyCancelled);
        }

        let result = sqlx::query("UPDATE pnr_status SET status = 'Cancelled' WHERE pnr_number = ?")
            .bind(pnr.as_u64())
            .execute(&mut *tx)
            .await?;

        // We hold the row lock, so exactly one row must change. Anything
        // else means the row vanished or multiplied under us.
        let affected = result.rows_affected();
        if affected != 1 {
            tx.rollback().await?;
            return Err(StoreError::LockAnomaly(affected));
        }

        tx.commit().await?;
        tracing::info!(%pnr, "Ticket cancelled");
        Ok(CancelOutcome::Cancelled)
    }
}
