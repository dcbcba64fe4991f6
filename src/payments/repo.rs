use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A payment intent. Status moves one way, `pending` → `succeeded`;
/// failure and refund states are not modeled.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_id: String,
    pub amount: Option<f64>,
    pub currency: String,
    pub status: String,
    pub metadata: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const PAYMENT_COLUMNS: &str =
    "id, user_id, payment_id, amount, currency, status, metadata, created_at";

pub(crate) fn generate_payment_id() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("pi_{millis}")
}

impl Payment {
    /// Inserts a new payment at `pending`.
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        amount: Option<f64>,
        currency: Option<&str>,
        metadata: &serde_json::Value,
    ) -> anyhow::Result<Payment> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (user_id, payment_id, amount, currency, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(generate_payment_id())
        .bind(amount)
        .bind(currency.unwrap_or("USD"))
        .bind(metadata)
        .fetch_one(db)
        .await?;
        Ok(payment)
    }

    /// The payment matching `(payment_id, user_id)`, if any.
    pub async fn find(
        db: &PgPool,
        payment_id: &str,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = $1 AND user_id = $2"
        ))
        .bind(payment_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(payment)
    }

    /// Sets status to `succeeded`. Idempotent by construction: a
    /// second confirmation re-writes the same value.
    pub async fn mark_succeeded(db: &PgPool, payment_id: &str) -> anyhow::Result<Payment> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            UPDATE payments SET status = 'succeeded'
            WHERE payment_id = $1
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment_id)
        .fetch_one(db)
        .await?;
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_id_format() {
        let id = generate_payment_id();
        let millis = id.strip_prefix("pi_").expect("pi_ prefix");
        assert!(millis.len() >= 13, "millisecond timestamp: {millis}");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
    }
}
