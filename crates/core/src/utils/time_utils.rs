use chrono::{Duration, Local, NaiveDate};

/// Today's calendar date in the host's local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The inclusive `[start, today]` range covering `days` days back from `today`.
///
/// `days` of zero yields a single-day window.
pub fn trailing_window(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_signed(Duration::days(days.max(0)))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}
