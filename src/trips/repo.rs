use rand::Rng;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Shares stop resolving this long after creation.
const SHARE_EXPIRY_DAYS: i64 = 30;

const SHARE_SUFFIX_LEN: usize = 9;
const SHARE_SUFFIX_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random share identifier: "trip_", the current millisecond
/// timestamp, nine random lowercase alphanumerics.
pub(crate) fn generate_share_id() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SHARE_SUFFIX_LEN)
        .map(|_| SHARE_SUFFIX_CHARS[rng.gen_range(0..SHARE_SUFFIX_CHARS.len())] as char)
        .collect();
    format!("trip_{millis}_{suffix}")
}

/// A trip snapshot published under a random share id.
pub struct SharedTrip;

/// One comment on a shared trip, with the commenter's name.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user_name: String,
}

impl SharedTrip {
    /// Stores the snapshot and returns its share id.
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        trip_data: &serde_json::Value,
    ) -> anyhow::Result<String> {
        let share_id = generate_share_id();
        let expires_at = OffsetDateTime::now_utc() + Duration::days(SHARE_EXPIRY_DAYS);

        sqlx::query(
            "INSERT INTO shared_trips (id, user_id, trip_data, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&share_id)
        .bind(user_id)
        .bind(trip_data)
        .bind(expires_at)
        .execute(db)
        .await?;

        Ok(share_id)
    }

    /// Snapshot for an unexpired share; expired and unknown ids both
    /// come back as `None`.
    pub async fn fetch_unexpired(
        db: &PgPool,
        share_id: &str,
    ) -> anyhow::Result<Option<serde_json::Value>> {
        let data = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT trip_data FROM shared_trips WHERE id = $1 \
             AND (expires_at IS NULL OR expires_at > now())",
        )
        .bind(share_id)
        .fetch_optional(db)
        .await?;
        Ok(data)
    }

    pub async fn add_comment(
        db: &PgPool,
        share_id: &str,
        user_id: Uuid,
        comment: &str,
    ) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO trip_comments (share_id, user_id, comment) VALUES ($1, $2, $3)")
            .bind(share_id)
            .bind(user_id)
            .bind(comment)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Comments on a share, newest first.
    pub async fn comments(db: &PgPool, share_id: &str) -> anyhow::Result<Vec<CommentView>> {
        let comments = sqlx::query_as::<_, CommentView>(
            "SELECT tc.comment, tc.created_at, u.name AS user_name \
             FROM trip_comments tc \
             JOIN users u ON u.id = tc.user_id \
             WHERE tc.share_id = $1 \
             ORDER BY tc.created_at DESC",
        )
        .bind(share_id)
        .fetch_all(db)
        .await?;
        Ok(comments)
    }
}

/// True when a comment insert referenced a share id with no row
/// behind it.
pub(crate) fn is_unknown_share(e: &anyhow::Error) -> bool {
    match e.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => {
            db_err.constraint() == Some("trip_comments_share_id_fkey")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_id_format() {
        let id = generate_share_id();
        let rest = id.strip_prefix("trip_").expect("trip_ prefix");
        let (millis, suffix) = rest.split_once('_').expect("timestamp_suffix");
        assert!(millis.len() >= 13, "millisecond timestamp: {millis}");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix.len(), SHARE_SUFFIX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn share_ids_differ_across_draws() {
        assert_ne!(generate_share_id(), generate_share_id());
    }

    #[test]
    fn unknown_share_check_ignores_other_errors() {
        assert!(!is_unknown_share(&anyhow::anyhow!("boom")));
    }
}
