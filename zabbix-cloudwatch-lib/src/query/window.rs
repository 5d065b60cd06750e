use super::QueryError;
use chrono::{DateTime, TimeDelta, Utc};
use core::time::Duration;

/// Lookback span used when no duration is given.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(300);

/// Offset from now used when no delay is given, including a `window` without a `:<delay>` part.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(300);

/// Sampling period used when none is given, in seconds.
pub const DEFAULT_PERIOD_SECS: u32 = 60;

/// Largest period CloudWatch can represent, in seconds.
const MAX_PERIOD_SECS: u32 = i32::MAX.unsigned_abs();

/// The absolute time range and sampling period of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period_secs: u32,
}

impl TimeWindow {
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub const fn period_secs(&self) -> u32 {
        self.period_secs
    }

    /// Replace the sampling period.
    pub fn with_period(self, period_secs: u32) -> Result<Self, QueryError> {
        if period_secs == 0 {
            return Err(QueryError::bad_duration("0", "period must be at least one second"));
        }

        if period_secs > MAX_PERIOD_SECS {
            return Err(QueryError::bad_duration(
                &period_secs.to_string(),
                format!("period must not exceed {MAX_PERIOD_SECS} seconds"),
            ));
        }

        Ok(Self { period_secs, ..self })
    }
}

/// Fallbacks applied when the duration or delay string is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDefaults {
    pub duration: Duration,
    pub delay: Duration,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            delay: DEFAULT_DELAY,
        }
    }
}

/// Resolve the query window with the built-in defaults.
///
/// See [`resolve_with_defaults`].
pub fn resolve(duration: &str, delay: &str, window: &str, now: DateTime<Utc>) -> Result<TimeWindow, QueryError> {
    resolve_with_defaults(duration, delay, window, now, WindowDefaults::default())
}

/// Resolve the query window.
///
/// A non-empty `window` of the form `<duration>[:<delay>]` takes precedence over `duration` and
/// `delay`. When it has no `:<delay>` part the delay is [`DEFAULT_DELAY`], whatever
/// `defaults.delay` says. Otherwise an empty `duration` or `delay` falls back to `defaults`.
///
/// The window ends `delay` before `now` and starts `duration` before its end.
pub fn resolve_with_defaults(
    duration: &str,
    delay: &str,
    window: &str,
    now: DateTime<Utc>,
    defaults: WindowDefaults,
) -> Result<TimeWindow, QueryError> {
    let (duration, delay) = if window.is_empty() {
        (
            parse_or_default(duration, defaults.duration)?,
            parse_or_default(delay, defaults.delay)?,
        )
    } else {
        match window.split_once(':') {
            Some((duration, delay)) => (parse_span(duration)?, parse_span(delay)?),
            None => (parse_span(window)?, DEFAULT_DELAY),
        }
    };

    if duration.is_zero() {
        return Err(QueryError::bad_duration(
            &humantime::format_duration(duration).to_string(),
            "duration must be greater than zero",
        ));
    }

    let end = shift_back(now, delay)?;
    let start = shift_back(end, duration)?;

    Ok(TimeWindow {
        start,
        end,
        period_secs: DEFAULT_PERIOD_SECS,
    })
}

fn parse_or_default(value: &str, default: Duration) -> Result<Duration, QueryError> {
    if value.is_empty() { Ok(default) } else { parse_span(value) }
}

fn parse_span(value: &str) -> Result<Duration, QueryError> {
    if value.is_empty() {
        return Err(QueryError::bad_duration(value, "empty duration"));
    }

    humantime::parse_duration(value).map_err(|e| QueryError::bad_duration(value, e.to_string()))
}

fn shift_back(instant: DateTime<Utc>, span: Duration) -> Result<DateTime<Utc>, QueryError> {
    let out_of_range = || QueryError::bad_duration(&humantime::format_duration(span).to_string(), "time span out of range");

    TimeDelta::from_std(span)
        .ok()
        .and_then(|delta| instant.checked_sub_signed(delta))
        .ok_or_else(out_of_range)
}
