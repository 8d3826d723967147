//! Record-to-card transformation and card markup

use crate::errors::{DashboardError, Result};
use crate::status::{PingAttempt, StatusRecord};
use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use serde_json::Number;

/// Time zone used when displaying last-check times
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DisplayZone {
    /// The host's local time zone
    #[default]
    Local,
    /// A fixed offset from UTC, e.g. `+07:00`
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// Parse `Z`, `UTC`, `±HH`, `±HHMM` or `±HH:MM`
    pub fn parse(offset: &str) -> std::result::Result<Self, String> {
        let offset = offset.trim();
        if offset.eq_ignore_ascii_case("z") || offset.eq_ignore_ascii_case("utc") {
            return Ok(DisplayZone::Fixed(FixedOffset::east_opt(0).ok_or("invalid offset")?));
        }

        let invalid = || format!("invalid UTC offset \"{}\", expected ±HH:MM", offset);

        let (sign, digits) = match offset.chars().next() {
            Some('+') => (1, &offset[1..]),
            Some('-') => (-1, &offset[1..]),
            _ => return Err(invalid()),
        };

        let digits = digits.replace(':', "");
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (hours, minutes) = match digits.len() {
            2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
            4 => (
                digits[..2].parse::<i32>().map_err(|_| invalid())?,
                digits[2..].parse::<i32>().map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };

        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(DisplayZone::Fixed)
            .ok_or_else(invalid)
    }

    /// Interpret a wall-clock time in this zone
    pub fn from_local(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            DisplayZone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            DisplayZone::Fixed(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

pub fn status_label(is_up: bool) -> &'static str {
    if is_up { "Alive" } else { "Dead" }
}

pub fn status_class(is_up: bool) -> &'static str {
    if is_up { "alive" } else { "dead" }
}

/// `YYYY-MM-DD HH:MM:SS` in the display zone. The year is not padded.
pub fn format_timestamp(at: &DateTime<Utc>, zone: &DisplayZone) -> String {
    match zone {
        DisplayZone::Local => format_wall_clock(&at.with_timezone(&Local)),
        DisplayZone::Fixed(offset) => format_wall_clock(&at.with_timezone(offset)),
    }
}

fn format_wall_clock<T: Datelike + Timelike>(dt: &T) -> String {
    format!(
        "{}-{:02}-{:02} {:02}:{:02}:{:02}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

/// `"<n>ms"` for a measured attempt, `"N/A"` otherwise
pub fn latency_display(ping: &PingAttempt) -> String {
    match &ping.response_time {
        Some(ms) => format!("{}ms", format_number(ms)),
        None => "N/A".to_string(),
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }

    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => format!("{}", f),
        None => n.to_string(),
    }
}

/// The per-service visual unit appended to the container
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub service_id: String,
    pub description: String,
    pub url: String,
    pub is_up: bool,
    pub status: &'static str,
    pub status_class: &'static str,
    pub latency: String,
    pub last_checked: String,
}

impl Card {
    pub fn from_record(service_id: &str, record: &StatusRecord, zone: &DisplayZone) -> Result<Self> {
        let checked_at = record.time.resolve(zone).ok_or_else(|| {
            DashboardError::shape(service_id, format!("unusable time value {:?}", record.time))
        })?;
        let first_ping = record.first_ping(service_id)?;

        Ok(Self {
            service_id: service_id.to_string(),
            description: record.description.clone(),
            url: record.url.clone(),
            is_up: record.is_up,
            status: status_label(record.is_up),
            status_class: status_class(record.is_up),
            latency: latency_display(first_ping),
            last_checked: format_timestamp(&checked_at, zone),
        })
    }

    /// Card markup. Values are interpolated verbatim unless `escape` is set.
    pub fn to_html(&self, escape: bool) -> String {
        let interpolate = |value: &str| -> String {
            if escape {
                html_escape::encode_safe(value).into_owned()
            } else {
                value.to_string()
            }
        };

        format!(
            r#"<div class="card">
  <div class="description">{}</div>
  <div>Service: <span class="service-url">{}</span></div>
  <div>Status: <span class="{}">{}</span></div>
  <div>Latency: {}</div>
  <div>Last checked: {}</div>
</div>"#,
            interpolate(&self.description),
            interpolate(&self.url),
            self.status_class,
            self.status,
            interpolate(&self.latency),
            self.last_checked,
        )
    }
}
