//! Named value formats checked by `validation/json/format`.

use chrono::{DateTime, NaiveDate};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use url::Url;
use uuid::Uuid;

/// A JSON schema string format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// RFC 3339 full-date, `2024-02-29`.
    Date,
    /// RFC 3339 date-time, `2024-02-29T10:00:00Z`.
    DateTime,
    /// RFC 3339 full-time, `10:00:00+02:00`.
    Time,
    Email,
    /// Absolute URI with a scheme.
    Uri,
    Ipv4,
    Uuid,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Date => "date",
            Format::DateTime => "date-time",
            Format::Time => "time",
            Format::Email => "email",
            Format::Uri => "uri",
            Format::Ipv4 => "ipv4",
            Format::Uuid => "uuid",
        }
    }

    /// Returns true if `value` is written in this format.
    pub fn is_valid(self, value: &str) -> bool {
        match self {
            Format::Date => is_date(value),
            Format::DateTime => is_date_time(value),
            Format::Time => is_time(value),
            Format::Email => is_email(value),
            Format::Uri => is_uri(value),
            Format::Ipv4 => Ipv4Addr::from_str(value).is_ok(),
            Format::Uuid => is_uuid(value),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Format::Date),
            "date-time" => Ok(Format::DateTime),
            "time" => Ok(Format::Time),
            "email" => Ok(Format::Email),
            "uri" => Ok(Format::Uri),
            "ipv4" => Ok(Format::Ipv4),
            "uuid" => Ok(Format::Uuid),
            other => Err(format!("unknown format: {}", other)),
        }
    }
}

fn is_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_date_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
}

fn is_time(s: &str) -> bool {
    is_date_time(&format!("1970-01-01T{}", s))
}

fn is_hostname(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 253
        && s.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && local.len() <= 64
        && !local.contains(|c: char| c == '@' || c.is_whitespace())
        && !local.starts_with('.')
        && !local.ends_with('.')
        && is_hostname(domain)
}

fn is_uri(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// Hyphenated form only; `Uuid` also accepts bare and braced forms.
fn is_uuid(s: &str) -> bool {
    s.len() == 36 && Uuid::parse_str(s).is_ok()
}
