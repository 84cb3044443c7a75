//! The date window and region a list request covers.

use chrono::{Days, NaiveDate, Utc};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First day (inclusive).
    pub from: NaiveDate,
    /// Last day (inclusive).
    pub to: NaiveDate,
}

impl DateWindow {
    /// The `days` days before `today`, through `today`.
    #[must_use]
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { from, to: today }
    }

    /// [`Self::trailing`] ending on the current UTC date.
    #[must_use]
    pub fn trailing_from_now(days: u32) -> Self {
        Self::trailing(Utc::now().date_naive(), days)
    }
}

/// Parameters of one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Dates to cover.
    pub window: DateWindow,
    /// Forecast region label.
    pub region: String,
}

impl ListQuery {
    /// Creates a query.
    #[must_use]
    pub fn new(window: DateWindow, region: impl Into<String>) -> Self {
        Self {
            window,
            region: region.into(),
        }
    }

    /// Query-string pairs in the order the API documents them.
    #[must_use]
    pub fn params(&self) -> [(&'static str, String); 3] {
        [
            ("fromdate", self.window.from.format("%Y-%m-%d").to_string()),
            ("todate", self.window.to.format("%Y-%m-%d").to_string()),
            ("region", self.region.clone()),
        ]
    }
}
