use chrono::{Duration, NaiveDate};

/// Record keys are ISO dates, the same format serde uses for [NaiveDate].
pub fn record_name_to_date(name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name, "%Y-%m-%d").ok()
}

/// Formats a duration as `<minutes>m <seconds>s`. Minutes are not wrapped into hours, so two
/// hours read as `120m 0s`.
pub fn format_minutes_seconds(v: Duration) -> String {
    let v = v.max(Duration::zero());
    format!("{}m {}s", v.num_minutes(), v.num_seconds() % 60)
}
