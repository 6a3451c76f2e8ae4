//! Epoch-millisecond clock helpers.

use chrono::{DateTime, NaiveDate, Utc};

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// UTC calendar date of an epoch-millisecond timestamp.
///
/// Returns `None` for timestamps outside chrono's representable range.
pub fn utc_date(epoch_ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms).map(|value| value.date_naive())
}

#[cfg(test)]
mod tests {
    use super::utc_date;
    use chrono::NaiveDate;

    #[test]
    fn utc_date_converts_epoch_millis() {
        assert_eq!(
            utc_date(1_729_036_800_000),
            NaiveDate::from_ymd_opt(2024, 10, 16)
        );
        assert_eq!(utc_date(i64::MAX), None);
    }
}
