use serde::Deserialize;

/// Request body for publishing a shareable trip snapshot. The
/// snapshot is an opaque blob; the server never interprets it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTripRequest {
    #[serde(default)]
    pub trip_data: serde_json::Value,
}

/// Request body for commenting on a shared trip.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
}
