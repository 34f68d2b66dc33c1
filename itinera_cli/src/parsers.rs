use jiff::{SignedDuration, SpanRelativeTo};

/// Parses a non-negative duration given as `SignedDuration` text ("30s",
/// "PT5M"), a friendly span ("1h 30m") or a plain number of seconds.
pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let duration = if let Ok(duration) = input.parse::<SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(seconds) = input.parse::<i64>() {
        SignedDuration::from_secs(seconds)
    } else {
        return Err(format!("invalid duration `{input}`"));
    };

    if duration.is_negative() {
        return Err(format!("duration `{input}` must not be negative"));
    }

    Ok(duration)
}
