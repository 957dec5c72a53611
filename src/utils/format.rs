use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp format used by the data provider.
pub const PROVIDER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1440;

/// Two decimals with an explicit sign. Zero (and -0.0) is `+0.00`.
pub fn format_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}", value.abs())
    } else {
        format!("-{:.2}", value.abs())
    }
}

/// `+3.21 (+1.34%)`
pub fn format_delta(change: f64, percent_change: f64) -> String {
    format!("{} ({}%)", format_signed(change), format_signed(percent_change))
}

pub fn format_price(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// `$179.45 - $256.78`
pub fn format_price_range(low: f64, high: f64) -> String {
    format!("{} - {}", format_price(low), format_price(high))
}

/// Market cap given in trillions.
pub fn format_market_cap(trillions: f64) -> String {
    format!("${:.2}T", trillions)
}

/// Volume given in millions.
pub fn format_volume(millions: f64) -> String {
    format!("{:.1}M", millions)
}

/// Parse a provider timestamp. Accepts the space-separated form and ISO 8601.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, PROVIDER_TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// `3/12/2025`
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// `3/12/2025, 3:15:22 AM`
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => raw.to_string(),
    }
}

/// Relative label for an elapsed number of whole minutes.
/// Under an hour reports minutes, under a day whole hours, otherwise `date`.
pub fn format_elapsed(elapsed_minutes: i64, date: NaiveDate) -> String {
    let minutes = elapsed_minutes.max(0);
    if minutes < MINUTES_PER_HOUR {
        format!("{} min ago", minutes)
    } else if minutes < MINUTES_PER_DAY {
        format!("{} hr ago", minutes / MINUTES_PER_HOUR)
    } else {
        format_calendar_date(date)
    }
}

/// "N min ago" / "N hr ago" / calendar date for a provider timestamp.
/// Timestamps in the future count as zero minutes; unparseable ones are returned as-is.
pub fn format_time_ago(raw: &str, now: NaiveDateTime) -> String {
    match parse_timestamp(raw) {
        Some(ts) => {
            let elapsed = now.signed_duration_since(ts).num_minutes();
            format_elapsed(elapsed, ts.date())
        }
        None => raw.to_string(),
    }
}
