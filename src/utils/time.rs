//! Timecode parsing and formatting utilities

use crate::error::{HighlightError, HighlightResult};

/// Format whole seconds as `HH:MM:SS`.
///
/// Hours are not wrapped, so values past 99 hours simply grow wider.
pub fn to_timecode(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Parse `HH:MM:SS`, `MM:SS` or `SS` into whole seconds.
///
/// Fields are right-aligned: the last one is always seconds.
pub fn to_seconds(timecode: &str) -> HighlightResult<u64> {
    let format_error = || HighlightError::Format {
        timecode: timecode.to_string(),
    };

    let parts: Vec<&str> = timecode.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(format_error());
    }

    let mut fields = Vec::with_capacity(parts.len());
    for part in parts {
        let value: u64 = part.trim().parse().map_err(|_| format_error())?;
        fields.push(value);
    }

    let mut fields = fields.into_iter().rev();
    let secs = fields.next().unwrap_or(0);
    let minutes = fields.next().unwrap_or(0);
    let hours = fields.next().unwrap_or(0);

    hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(secs))
        .ok_or_else(format_error)
}
