use serde::{Deserialize, Serialize};
use time::Date;

/// Request body for finalizing a hotel booking.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookHotelRequest {
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
    pub destination: Option<String>,
    pub check_in: Option<Date>,
    pub check_out: Option<Date>,
    #[serde(default)]
    pub guests: serde_json::Value,
    #[serde(default)]
    pub traveler_info: serde_json::Value,
    pub total_cost: Option<f64>,
}

/// Denormalized summary appended to the user's booking list for
/// profile display. Never resynchronized with the Booking row after
/// the fact; the two are independent once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub booking_id: String,
    pub destination: Option<String>,
    pub dates: BookingDates,
    pub hotel: BookingHotel,
    pub total_cost: Option<f64>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDates {
    pub check_in: Option<Date>,
    pub check_out: Option<Date>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingHotel {
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
}

/// Minimal confirmation returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn book_request_camel_case_wire_format() {
        let req: BookHotelRequest = serde_json::from_str(
            r#"{
                "hotelId": "htl-42",
                "hotelName": "Hotel du Lac",
                "destination": "Paris",
                "checkIn": "2026-03-01",
                "checkOut": "2026-03-08",
                "guests": {"adults": 2, "children": 1},
                "totalCost": 1800.0
            }"#,
        )
        .unwrap();

        assert_eq!(req.hotel_id.as_deref(), Some("htl-42"));
        assert_eq!(req.check_in, Some(date!(2026 - 03 - 01)));
        assert_eq!(req.guests["adults"], 2);
        assert!(req.traveler_info.is_null());
        assert_eq!(req.total_cost, Some(1800.0));
    }
}
