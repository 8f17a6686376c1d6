//! Schema bootstrap
//!
//! Creates the railway tables if they do not exist. Statements are
//! idempotent so startup is safe against an already-provisioned database.

use crate::error::StoreError;
use sqlx::mysql::MySqlPool;

const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS train_details (
        train_number BIGINT UNSIGNED NOT NULL PRIMARY KEY,
        from_location VARCHAR(128) NOT NULL,
        to_location VARCHAR(128) NOT NULL,
        timings TIME NULL,
        status VARCHAR(64) NOT NULL DEFAULT 'On Time'
    )",
    "CREATE TABLE IF NOT EXISTS pnr_status (
        pnr_number BIGINT UNSIGNED NOT NULL PRIMARY KEY,
        train_number BIGINT UNSIGNED NOT NULL,
        travel_date DATE NULL,
        class VARCHAR(16) NULL,
        seat_number VARCHAR(16) NULL,
        status VARCHAR(32) NOT NULL DEFAULT 'Confirmed'
    )",
    "CREATE TABLE IF NOT EXISTS train_fare (
        train_number BIGINT UNSIGNED NOT NULL,
        class VARCHAR(16) NOT NULL,
        fare DOUBLE NOT NULL,
        PRIMARY KEY (train_number, class)
    )",
    "CREATE TABLE IF NOT EXISTS booking_history (
        booking_id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        user_id BIGINT UNSIGNED NOT NULL,
        pnr_number BIGINT UNSIGNED NOT NULL,
        train_number BIGINT UNSIGNED NOT NULL,
        booking_date DATE NULL,
        INDEX idx_booking_user (user_id)
    )",
    "CREATE TABLE IF NOT EXISTS user_details (
        user_id BIGINT UNSIGNED NOT NULL PRIMARY KEY,
        name VARCHAR(128) NOT NULL,
        email VARCHAR(256) NULL,
        phone VARCHAR(32) NULL
    )",
    "CREATE TABLE IF NOT EXISTS stations (
        station_code VARCHAR(16) NOT NULL PRIMARY KEY,
        station_name VARCHAR(128) NOT NULL,
        city VARCHAR(128) NULL,
        state VARCHAR(128) NULL
    )",
];

/// Create all railway tables if missing.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), StoreError> {
    for stmt in CREATE_TABLES {
        sqlx::query(stmt).execute(pool).await?;
    }
    tracing::debug!(tables = CREATE_TABLES.len(), "Schema ensured");
    Ok(())
}
