use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use crate::plans::PlanPatch;

/// Client-side draft of the current plan, one value per wizard run.
/// State lives in the value returned by [`apply`], never in a shared
/// mutable object; the draft is persisted through the plan cache
/// after every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanDraft {
    pub destination: String,
    pub budget: String,
    pub departure_date: String,
    pub return_date: String,
    pub duration: i32,
    pub adults: i32,
    pub children: i32,
    pub infants: i32,
    pub flight_class: String,
    pub local_transport: String,
    pub hotel: String,
    pub selected_hotel: Option<serde_json::Value>,
    pub total_cost: f64,
    pub budget_range: Option<serde_json::Value>,
    pub transport_cost: Option<serde_json::Value>,
}

impl Default for PlanDraft {
    fn default() -> Self {
        Self {
            destination: String::new(),
            budget: String::new(),
            departure_date: String::new(),
            return_date: String::new(),
            duration: 0,
            adults: 2,
            children: 0,
            infants: 0,
            flight_class: String::new(),
            local_transport: String::new(),
            hotel: String::new(),
            selected_hotel: None,
            total_cost: 0.0,
            budget_range: None,
            transport_cost: None,
        }
    }
}

/// One wizard step's worth of input.
#[derive(Debug, Clone)]
pub enum WizardStep {
    Destination {
        destination: String,
    },
    DatesAndBudget {
        departure_date: String,
        return_date: String,
        duration: i32,
        adults: i32,
        children: i32,
        infants: i32,
        budget: String,
        budget_range: Option<serde_json::Value>,
    },
    Transport {
        flight_class: String,
        local_transport: String,
        transport_cost: Option<serde_json::Value>,
    },
    Hotel {
        hotel: String,
        selected_hotel: Option<serde_json::Value>,
    },
    TotalCost {
        total_cost: f64,
    },
}

/// Pure reducer: folds one step into the draft and returns the next
/// draft. Fields outside the step carry over unchanged.
pub fn apply(mut draft: PlanDraft, step: WizardStep) -> PlanDraft {
    match step {
        WizardStep::Destination { destination } => {
            draft.destination = destination;
        }
        WizardStep::DatesAndBudget {
            departure_date,
            return_date,
            duration,
            adults,
            children,
            infants,
            budget,
            budget_range,
        } => {
            draft.departure_date = departure_date;
            draft.return_date = return_date;
            draft.duration = duration;
            draft.adults = adults;
            draft.children = children;
            draft.infants = infants;
            draft.budget = budget;
            draft.budget_range = budget_range;
        }
        WizardStep::Transport {
            flight_class,
            local_transport,
            transport_cost,
        } => {
            draft.flight_class = flight_class;
            draft.local_transport = local_transport;
            draft.transport_cost = transport_cost;
        }
        WizardStep::Hotel {
            hotel,
            selected_hotel,
        } => {
            draft.hotel = hotel;
            draft.selected_hotel = selected_hotel;
        }
        WizardStep::TotalCost { total_cost } => {
            draft.total_cost = total_cost;
        }
    }
    draft
}

impl PlanDraft {
    /// Maps the draft onto the save-current request body. Empty
    /// strings and zero-valued costs are treated as unset so a sparse
    /// draft stays a sparse patch; traveler counts always carry.
    pub fn to_patch(&self) -> PlanPatch {
        PlanPatch {
            destination: non_empty(&self.destination),
            budget: non_empty(&self.budget),
            departure_date: parse_wizard_date(&self.departure_date),
            return_date: parse_wizard_date(&self.return_date),
            duration: (self.duration > 0).then_some(self.duration),
            adults: Some(self.adults),
            children: Some(self.children),
            infants: Some(self.infants),
            flight_class: non_empty(&self.flight_class),
            local_transport: non_empty(&self.local_transport),
            hotel: non_empty(&self.hotel),
            selected_hotel: self.selected_hotel.clone(),
            total_cost: (self.total_cost > 0.0).then_some(self.total_cost),
            budget_range: self.budget_range.clone(),
            transport_cost: self.transport_cost.clone(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Date inputs arrive as "2026-03-01"; anything else is unset.
fn parse_wizard_date(s: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(s, &format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn default_draft_matches_documented_zero_plan() {
        let draft = PlanDraft::default();
        assert_eq!(draft.adults, 2);
        assert_eq!(draft.children, 0);
        assert_eq!(draft.infants, 0);
        assert_eq!(draft.total_cost, 0.0);
        assert!(draft.destination.is_empty());
        assert!(draft.hotel.is_empty());
        assert!(draft.selected_hotel.is_none());
    }

    #[test]
    fn steps_fold_into_a_complete_draft() {
        let mut draft = PlanDraft::default();
        draft = apply(
            draft,
            WizardStep::Destination {
                destination: "Paris".into(),
            },
        );
        draft = apply(
            draft,
            WizardStep::DatesAndBudget {
                departure_date: "2026-03-01".into(),
                return_date: "2026-03-08".into(),
                duration: 7,
                adults: 2,
                children: 1,
                infants: 0,
                budget: "mid".into(),
                budget_range: Some(json!({"min": 1000, "max": 2500})),
            },
        );
        draft = apply(
            draft,
            WizardStep::Transport {
                flight_class: "economy".into(),
                local_transport: "metro".into(),
                transport_cost: Some(json!({"min": 300, "max": 700})),
            },
        );
        draft = apply(
            draft,
            WizardStep::Hotel {
                hotel: "boutique".into(),
                selected_hotel: Some(json!({"id": "htl-42", "name": "Hotel du Lac"})),
            },
        );
        draft = apply(draft, WizardStep::TotalCost { total_cost: 1800.0 });

        assert_eq!(draft.destination, "Paris");
        assert_eq!(draft.duration, 7);
        assert_eq!(draft.children, 1);
        assert_eq!(draft.flight_class, "economy");
        assert_eq!(draft.hotel, "boutique");
        assert_eq!(draft.total_cost, 1800.0);
    }

    #[test]
    fn a_step_leaves_other_fields_untouched() {
        let before = apply(
            PlanDraft::default(),
            WizardStep::Destination {
                destination: "Goa".into(),
            },
        );
        let after = apply(
            before.clone(),
            WizardStep::TotalCost { total_cost: 900.0 },
        );

        assert_eq!(after.destination, "Goa");
        assert_eq!(after.adults, before.adults);
        assert_eq!(after.total_cost, 900.0);
        // the prior draft value is unchanged
        assert_eq!(before.total_cost, 0.0);
    }

    #[test]
    fn empty_draft_maps_to_a_sparse_patch() {
        let patch = PlanDraft::default().to_patch();
        assert!(patch.destination.is_none());
        assert!(patch.departure_date.is_none());
        assert!(patch.duration.is_none());
        assert!(patch.total_cost.is_none());
        assert_eq!(patch.adults, Some(2));
        assert_eq!(patch.children, Some(0));
        assert_eq!(patch.infants, Some(0));
    }

    #[test]
    fn wizard_dates_parse_into_the_patch() {
        let draft = PlanDraft {
            departure_date: "2026-03-01".into(),
            return_date: "not a date".into(),
            ..Default::default()
        };
        let patch = draft.to_patch();
        assert_eq!(patch.departure_date, Some(date!(2026 - 03 - 01)));
        assert!(patch.return_date.is_none());
    }

    #[test]
    fn camel_case_wire_format() {
        let draft: PlanDraft = serde_json::from_str(
            r#"{"destination": "Rome", "flightClass": "business", "totalCost": 2400.0}"#,
        )
        .unwrap();
        assert_eq!(draft.destination, "Rome");
        assert_eq!(draft.flight_class, "business");
        assert_eq!(draft.total_cost, 2400.0);
        // unspecified fields keep their defaults
        assert_eq!(draft.adults, 2);
    }
}
