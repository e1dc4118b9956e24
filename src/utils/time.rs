//! Date and time helpers for XMLTV timestamps

use chrono::{DateTime, FixedOffset};

/// XMLTV timestamp layout, e.g. `20240301200000 +0100`
pub const XMLTV_TIME_FORMAT: &str = "%Y%m%d%H%M%S %z";

/// Layout of the `date` attribute on the guide root
pub const XMLTV_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

pub fn format_xmltv_time(time: &DateTime<FixedOffset>) -> String {
    time.format(XMLTV_TIME_FORMAT).to_string()
}

/// 23:59:59 on the same calendar day as `start`, in `start`'s own offset
///
/// Falls back to `start` itself if that wall-clock time cannot be built.
pub fn end_of_day(start: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    start
        .date_naive()
        .and_hms_opt(23, 59, 59)
        .and_then(|naive| naive.and_local_timezone(*start.offset()).single())
        .unwrap_or(*start)
}
