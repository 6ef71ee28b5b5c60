//! Wall-clock formatting of shift templates.
//!
//! Ends past midnight wrap around, so a 22:00 start with an 8h duration
//! renders as `22:00-06:00`. Parsing reverses this: an end at or before the
//! start is read as the next day.

use shiftforge_core::{ShiftStart, ShiftTemplate};

use crate::error::RenderError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Formats minutes since midnight as `HH:MM`, wrapping at 24h.
///
/// # Examples
///
/// ```
/// use shiftforge_render::format_clock;
///
/// assert_eq!(format_clock(450), "07:30");
/// assert_eq!(format_clock(1830), "06:30");
/// ```
pub fn format_clock(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Formats a template as `HH:MM-HH:MM`.
pub fn format_range(template: &ShiftTemplate) -> String {
    format!(
        "{}-{}",
        format_clock(template.start().minutes()),
        format_clock(template.end_minutes())
    )
}

/// Parses `HH:MM` into minutes since midnight.
pub fn parse_clock(input: &str) -> Result<u32, RenderError> {
    let trimmed = input.trim();
    let (hours, minutes) = trimmed
        .split_once(':')
        .ok_or_else(|| RenderError::clock(input, "expected HH:MM"))?;
    let hours: u32 = hours
        .parse()
        .map_err(|_| RenderError::clock(input, "hours are not a number"))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| RenderError::clock(input, "minutes are not a number"))?;
    if hours >= 24 || minutes >= 60 {
        return Err(RenderError::clock(input, "time of day out of range"));
    }
    Ok(hours * 60 + minutes)
}

/// Parses `HH:MM-HH:MM` back into a start and a duration in minutes.
///
/// # Examples
///
/// ```
/// use shiftforge_render::parse_clock_range;
///
/// let (start, duration) = parse_clock_range("14:30-22:30").unwrap();
/// assert_eq!(start.to_string(), "14:30");
/// assert_eq!(duration, 480);
///
/// let (_, overnight) = parse_clock_range("22:00-06:00").unwrap();
/// assert_eq!(overnight, 480);
/// ```
pub fn parse_clock_range(input: &str) -> Result<(ShiftStart, u32), RenderError> {
    let (start, end) = input
        .trim()
        .split_once('-')
        .ok_or_else(|| RenderError::clock(input, "expected HH:MM-HH:MM"))?;
    let start = parse_clock(start)?;
    let end = parse_clock(end)?;
    let duration = if end > start {
        end - start
    } else {
        end + MINUTES_PER_DAY - start
    };
    let start = ShiftStart::from_minutes(start)
        .ok_or_else(|| RenderError::clock(input, "start out of range"))?;
    Ok((start, duration))
}

#[cfg(test)]
mod tests;
