use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::bookings::dto::{BookHotelRequest, BookingConfirmation, BookingSummary};
use crate::bookings::services;

/// An immutable booking snapshot, decoupled from the travel plan so
/// later plan edits never alter a confirmed booking. Only status and
/// payment status may transition after insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_id: String,
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
    pub destination: Option<String>,
    pub check_in: Option<Date>,
    pub check_out: Option<Date>,
    pub guests: Option<serde_json::Value>,
    pub traveler_info: Option<serde_json::Value>,
    pub total_cost: Option<f64>,
    pub status: String,
    pub payment_status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const BOOKING_COLUMNS: &str = "id, user_id, booking_id, hotel_id, hotel_name, destination, \
     check_in, check_out, guests, traveler_info, total_cost, status, payment_status, created_at";

/// Attempts before a booking-id collision escapes as an error.
const MAX_ID_ATTEMPTS: u32 = 3;

impl Booking {
    /// All of the user's bookings, newest first.
    pub async fn list(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(bookings)
    }

    /// Finalizes a booking: inserts the Booking row and appends the
    /// denormalized summary to the user's booking list in a single
    /// transaction, so a failed append never leaves an orphaned
    /// booking. Bookings are created `confirmed`/`completed` without
    /// consulting the payment flow.
    pub async fn finalize(
        db: &PgPool,
        user_id: Uuid,
        req: &BookHotelRequest,
    ) -> anyhow::Result<BookingConfirmation> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let booking_id = services::generate_booking_id();
            match Self::insert_with_summary(db, user_id, &booking_id, req).await {
                Ok(confirmation) => return Ok(confirmation),
                Err(e) if is_booking_id_collision(&e) && attempt < MAX_ID_ATTEMPTS => {
                    warn!(%booking_id, attempt, "booking id collision, retrying with a fresh id");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn insert_with_summary(
        db: &PgPool,
        user_id: Uuid,
        booking_id: &str,
        req: &BookHotelRequest,
    ) -> anyhow::Result<BookingConfirmation> {
        let mut tx = db.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (user_id, booking_id, hotel_id, hotel_name, destination,
                                  check_in, check_out, guests, traveler_info, total_cost)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(booking_id)
        .bind(&req.hotel_id)
        .bind(&req.hotel_name)
        .bind(&req.destination)
        .bind(req.check_in)
        .bind(req.check_out)
        .bind(&req.guests)
        .bind(&req.traveler_info)
        .bind(req.total_cost)
        .fetch_one(&mut *tx)
        .await?;

        let stored: serde_json::Value =
            sqlx::query_scalar("SELECT bookings FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        let mut summaries: Vec<BookingSummary> = serde_json::from_value(stored).unwrap_or_default();
        summaries.push(services::summary_for(&booking));

        sqlx::query("UPDATE users SET bookings = $1, updated_at = now() WHERE id = $2")
            .bind(serde_json::to_value(&summaries)?)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(BookingConfirmation {
            booking_id: booking.booking_id,
            status: booking.status,
        })
    }
}

/// True only for a unique violation on bookings.booking_id; any other
/// store failure is not retried.
fn is_booking_id_collision(e: &anyhow::Error) -> bool {
    match e.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => {
            db_err.constraint() == Some("bookings_booking_id_key")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_check_ignores_other_errors() {
        assert!(!is_booking_id_collision(&anyhow::anyhow!("boom")));
        let wrapped: anyhow::Error = sqlx::Error::RowNotFound.into();
        assert!(!is_booking_id_collision(&wrapped));
    }
}
