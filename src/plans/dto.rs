use serde::{Deserialize, Serialize};
use time::Date;

use crate::plans::repo::Plan;

/// Partial update sent by one wizard step. Absent fields leave the
/// stored plan untouched (canonical merge policy).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanPatch {
    pub destination: Option<String>,
    pub budget: Option<String>,
    pub departure_date: Option<Date>,
    pub return_date: Option<Date>,
    pub duration: Option<i32>,
    pub adults: Option<i32>,
    pub children: Option<i32>,
    pub infants: Option<i32>,
    pub flight_class: Option<String>,
    pub local_transport: Option<String>,
    pub hotel: Option<String>,
    pub selected_hotel: Option<serde_json::Value>,
    pub total_cost: Option<f64>,
    pub budget_range: Option<serde_json::Value>,
    pub transport_cost: Option<serde_json::Value>,
}

impl PlanPatch {
    /// Field-by-field merge into an existing plan.
    pub fn apply(&self, plan: &mut Plan) {
        if let Some(v) = &self.destination {
            plan.destination = Some(v.clone());
        }
        if let Some(v) = &self.budget {
            plan.budget = Some(v.clone());
        }
        if let Some(v) = self.departure_date {
            plan.departure_date = Some(v);
        }
        if let Some(v) = self.return_date {
            plan.return_date = Some(v);
        }
        if let Some(v) = self.duration {
            plan.duration = Some(v);
        }
        if let Some(v) = self.adults {
            plan.adults = v;
        }
        if let Some(v) = self.children {
            plan.children = v;
        }
        if let Some(v) = self.infants {
            plan.infants = v;
        }
        if let Some(v) = &self.flight_class {
            plan.flight_class = Some(v.clone());
        }
        if let Some(v) = &self.local_transport {
            plan.local_transport = Some(v.clone());
        }
        if let Some(v) = &self.hotel {
            plan.hotel = Some(v.clone());
        }
        if let Some(v) = &self.selected_hotel {
            plan.selected_hotel = Some(v.clone());
        }
        if let Some(v) = self.total_cost {
            plan.total_cost = Some(v);
        }
        if let Some(v) = &self.budget_range {
            plan.budget_range = Some(v.clone());
        }
        if let Some(v) = &self.transport_cost {
            plan.transport_cost = Some(v.clone());
        }
    }
}
