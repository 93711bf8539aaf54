// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting.
//!
//! All timestamps are persisted as RFC3339 strings with a `Z` suffix so
//! that lexicographic comparison in store queries matches chronological
//! order.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current wall-clock time as a stored timestamp string.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Parse a stored timestamp back into a UTC datetime.
pub fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
