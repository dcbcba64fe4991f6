use serde::Deserialize;
use uuid::Uuid;

/// Request body for creating a pending payment intent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Request body for confirming a payment. `plan_id`, when present,
/// additionally marks that plan paid.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: String,
    pub plan_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults() {
        let req: CreatePaymentRequest =
            serde_json::from_str(r#"{"amount": 1800.0}"#).unwrap();
        assert_eq!(req.amount, Some(1800.0));
        assert!(req.currency.is_none());
        assert!(req.metadata.is_null());
    }

    #[test]
    fn confirm_request_camel_case_wire_format() {
        let req: ConfirmPaymentRequest = serde_json::from_str(
            r#"{"paymentIntentId": "pi_1700000000000", "planId": "7f8b6e1a-4c0f-4f6e-9e0e-2a5d6b7c8d9e"}"#,
        )
        .unwrap();
        assert_eq!(req.payment_intent_id, "pi_1700000000000");
        assert!(req.plan_id.is_some());
    }

    #[test]
    fn confirm_request_plan_id_optional() {
        let req: ConfirmPaymentRequest =
            serde_json::from_str(r#"{"paymentIntentId": "pi_1"}"#).unwrap();
        assert!(req.plan_id.is_none());
    }
}
