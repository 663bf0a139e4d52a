use chrono::{DateTime, FixedOffset, Utc};

const KST_OFFSET_SECONDS: i32 = 9 * 3600;

/// Converts a UTC timestamp to Korea Standard Time (UTC+9).
pub fn to_kst(time: DateTime<Utc>) -> DateTime<FixedOffset> {
    match FixedOffset::east_opt(KST_OFFSET_SECONDS) {
        Some(kst) => time.with_timezone(&kst),
        None => time.fixed_offset(),
    }
}

/// Formats a UTC timestamp as a KST wall-clock string.
pub fn format_kst(time: DateTime<Utc>) -> String {
    to_kst(time).format("%Y-%m-%d %H:%M:%S").to_string()
}
