use rand::Rng;
use time::OffsetDateTime;

use crate::bookings::dto::{BookingDates, BookingHotel, BookingSummary};
use crate::bookings::repo::Booking;

const BOOKING_ID_PREFIX: &str = "VR";
const SUFFIX_LEN: usize = 5;
const SUFFIX_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Short booking code: "VR", the current millisecond timestamp, five
/// random uppercase alphanumerics. Uniqueness is probabilistic; the
/// unique index on bookings.booking_id is the backstop and the caller
/// retries with a fresh id on collision.
pub(crate) fn generate_booking_id() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARS[rng.gen_range(0..SUFFIX_CHARS.len())] as char)
        .collect();
    format!("{BOOKING_ID_PREFIX}{millis}{suffix}")
}

/// Denormalized summary for the user's booking list, built from the
/// inserted row so both records carry the same booking id. Once
/// written the summary is never resynchronized with the Booking row.
pub(crate) fn summary_for(booking: &Booking) -> BookingSummary {
    BookingSummary {
        booking_id: booking.booking_id.clone(),
        destination: booking.destination.clone(),
        dates: BookingDates {
            check_in: booking.check_in,
            check_out: booking.check_out,
        },
        hotel: BookingHotel {
            hotel_id: booking.hotel_id.clone(),
            hotel_name: booking.hotel_name.clone(),
        },
        total_cost: booking.total_cost,
        status: booking.status.clone(),
        created_at: booking
            .created_at
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    #[test]
    fn booking_id_format() {
        let id = generate_booking_id();
        assert!(id.starts_with("VR"));

        let rest = &id[2..];
        let (millis, suffix) = rest.split_at(rest.len() - SUFFIX_LEN);
        assert!(millis.len() >= 13, "millisecond timestamp: {millis}");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn booking_ids_differ_across_draws() {
        let ids: HashSet<String> = (0..16).map(|_| generate_booking_id()).collect();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn summary_carries_the_booking_id() {
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            booking_id: "VR1700000000000AB12C".into(),
            hotel_id: Some("htl-42".into()),
            hotel_name: Some("Hotel du Lac".into()),
            destination: Some("Paris".into()),
            check_in: Some(date!(2026 - 03 - 01)),
            check_out: Some(date!(2026 - 03 - 08)),
            guests: None,
            traveler_info: None,
            total_cost: Some(1800.0),
            status: "confirmed".into(),
            payment_status: "completed".into(),
            created_at: datetime!(2026-01-01 0:00 UTC),
        };

        let summary = summary_for(&booking);
        assert_eq!(summary.booking_id, booking.booking_id);
        assert_eq!(summary.destination.as_deref(), Some("Paris"));
        assert_eq!(summary.dates.check_in, booking.check_in);
        assert_eq!(summary.dates.check_out, booking.check_out);
        assert_eq!(summary.hotel.hotel_id.as_deref(), Some("htl-42"));
        assert_eq!(summary.hotel.hotel_name.as_deref(), Some("Hotel du Lac"));
        assert_eq!(summary.total_cost, Some(1800.0));
        assert_eq!(summary.status, "confirmed");
        assert!(summary.created_at.starts_with("2026-01-01"));
    }
}
