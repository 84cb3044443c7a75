//! Display helpers shared by every presentation.

use chrono::DateTime;

use crate::Location;

/// Public page on avalanche.ca for a submission.
pub const PERMALINK_BASE: &str =
    "https://avalanche.ca/map?panel=mountain-information-network-submissions/";

/// Formats an ISO 8601 timestamp like `Jan 10, 2025, 6:22 PM`, in the
/// timestamp's own offset. Unparseable input is returned unchanged.
#[must_use]
pub fn format_timestamp(datetime: &str) -> String {
    DateTime::parse_from_rfc3339(datetime).map_or_else(
        |_| datetime.to_string(),
        |parsed| parsed.format("%b %-d, %Y, %-I:%M %p").to_string(),
    )
}

/// Formats a location as `latitude, longitude` to four decimal places.
#[must_use]
pub fn format_coordinates(location: &Location) -> String {
    format!("{:.4}, {:.4}", location.latitude, location.longitude)
}

/// Link to the submission on avalanche.ca.
#[must_use]
pub fn permalink(id: &str) -> String {
    format!("{PERMALINK_BASE}{id}")
}

/// Header subtitle, e.g. `Southwest Coast • 12 observations from the last week`.
#[must_use]
pub fn subtitle(region: &str, item_count: u64) -> String {
    format!("{region} \u{2022} {item_count} observations from the last week")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_utc_timestamp() {
        assert_eq!(
            format_timestamp("2025-01-10T18:22:00.000Z"),
            "Jan 10, 2025, 6:22 PM"
        );
    }

    #[test]
    fn formats_in_source_offset() {
        assert_eq!(
            format_timestamp("2025-01-11T09:05:00-08:00"),
            "Jan 11, 2025, 9:05 AM"
        );
    }

    #[test]
    fn passes_through_garbage() {
        assert_eq!(format_timestamp("yesterday-ish"), "yesterday-ish");
    }

    #[test]
    fn formats_coordinates_to_four_places() {
        let location = Location {
            latitude: 49.123_456,
            longitude: -123.1,
        };
        assert_eq!(format_coordinates(&location), "49.1235, -123.1000");
    }

    #[test]
    fn builds_permalink() {
        assert_eq!(
            permalink("abc123"),
            "https://avalanche.ca/map?panel=mountain-information-network-submissions/abc123"
        );
    }

    #[test]
    fn subtitle_uses_item_count() {
        assert_eq!(
            subtitle("Southwest Coast", 57),
            "Southwest Coast \u{2022} 57 observations from the last week"
        );
    }
}
