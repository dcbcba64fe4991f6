use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::plans::dto::PlanPatch;

/// A travel plan. At most one row per user has `is_current = true`;
/// the same logical current plan is mutated on every wizard step
/// until finalized, and historical plans stay read-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination: Option<String>,
    pub budget: Option<String>,
    pub departure_date: Option<Date>,
    pub return_date: Option<Date>,
    pub duration: Option<i32>,
    pub adults: i32,
    pub children: i32,
    pub infants: i32,
    pub flight_class: Option<String>,
    pub local_transport: Option<String>,
    pub hotel: Option<String>,
    pub selected_hotel: Option<serde_json::Value>,
    pub total_cost: Option<f64>,
    pub budget_range: Option<serde_json::Value>,
    pub transport_cost: Option<serde_json::Value>,
    pub is_current: bool,
    pub payment_status: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub paid_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const PLAN_COLUMNS: &str = "id, user_id, destination, budget, departure_date, return_date, \
     duration, adults, children, infants, flight_class, local_transport, hotel, \
     selected_hotel, total_cost, budget_range, transport_cost, is_current, \
     payment_status, paid_at, created_at, updated_at";

impl Plan {
    /// The user's current plan, if any. Absence is `None`, never an error.
    pub async fn current(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Plan>> {
        let plan = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM travel_plans WHERE user_id = $1 AND is_current = TRUE"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    /// All of the user's plans, most recently updated first.
    pub async fn list(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Plan>> {
        let plans = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM travel_plans WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(plans)
    }

    /// Upserts the user's current plan. Merges the patch into the
    /// existing current plan, or inserts a fresh one with
    /// `is_current = true`. Returns the resulting row and whether it
    /// was newly created. Concurrent upserts for one user race with
    /// last-write-wins semantics; callers are assumed to drive a
    /// single wizard session per user.
    pub async fn upsert_current(
        db: &PgPool,
        user_id: Uuid,
        patch: &PlanPatch,
    ) -> anyhow::Result<(Plan, bool)> {
        match Plan::current(db, user_id).await? {
            Some(mut plan) => {
                patch.apply(&mut plan);
                let updated = sqlx::query_as::<_, Plan>(&format!(
                    r#"
                    UPDATE travel_plans SET
                        destination = $1, budget = $2, departure_date = $3,
                        return_date = $4, duration = $5, adults = $6,
                        children = $7, infants = $8, flight_class = $9,
                        local_transport = $10, hotel = $11, selected_hotel = $12,
                        total_cost = $13, budget_range = $14, transport_cost = $15,
                        updated_at = now()
                    WHERE id = $16
                    RETURNING {PLAN_COLUMNS}
                    "#
                ))
                .bind(&plan.destination)
                .bind(&plan.budget)
                .bind(plan.departure_date)
                .bind(plan.return_date)
                .bind(plan.duration)
                .bind(plan.adults)
                .bind(plan.children)
                .bind(plan.infants)
                .bind(&plan.flight_class)
                .bind(&plan.local_transport)
                .bind(&plan.hotel)
                .bind(&plan.selected_hotel)
                .bind(plan.total_cost)
                .bind(&plan.budget_range)
                .bind(&plan.transport_cost)
                .bind(plan.id)
                .fetch_one(db)
                .await?;
                Ok((updated, false))
            }
            None => {
                let created = sqlx::query_as::<_, Plan>(&format!(
                    r#"
                    INSERT INTO travel_plans (
                        user_id, destination, budget, departure_date, return_date,
                        duration, adults, children, infants, flight_class,
                        local_transport, hotel, selected_hotel, total_cost,
                        budget_range, transport_cost, is_current
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                            $13, $14, $15, $16, TRUE)
                    RETURNING {PLAN_COLUMNS}
                    "#
                ))
                .bind(user_id)
                .bind(&patch.destination)
                .bind(&patch.budget)
                .bind(patch.departure_date)
                .bind(patch.return_date)
                .bind(patch.duration)
                .bind(patch.adults.unwrap_or(2))
                .bind(patch.children.unwrap_or(0))
                .bind(patch.infants.unwrap_or(0))
                .bind(&patch.flight_class)
                .bind(&patch.local_transport)
                .bind(&patch.hotel)
                .bind(&patch.selected_hotel)
                .bind(patch.total_cost)
                .bind(&patch.budget_range)
                .bind(&patch.transport_cost)
                .fetch_one(db)
                .await?;
                Ok((created, true))
            }
        }
    }

    /// Marks a plan paid. Returns false when no such plan exists for
    /// the user; the caller decides whether that matters.
    pub async fn mark_paid(db: &PgPool, user_id: Uuid, plan_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE travel_plans
            SET payment_status = 'completed', paid_at = now(), updated_at = now()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
