//! Bucket widths accepted by the prices API.
//!
//! The API only knows four widths, so a [`Timestep`] is a closed enum rather
//! than an arbitrary `amount × unit` pair. The wire form (`"5m"`, `"1h"`,
//! `"6h"`, `"24h"`) is both the `Display` output and the `FromStr` input.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of seconds in a day.
pub const SECS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestepError {
    #[error("Invalid timestep {input:?}: expected one of 5m, 1h, 6h, 24h")]
    Unknown { input: String },

    #[error("Invalid input: {}", message)]
    InvalidInput { message: String },
}

/// Width of a single time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timestep {
    FiveMinutes,
    OneHour,
    SixHours,
    OneDay,
}

impl Timestep {
    pub const ALL: [Timestep; 4] = [
        Timestep::FiveMinutes,
        Timestep::OneHour,
        Timestep::SixHours,
        Timestep::OneDay,
    ];

    /// The value sent as the `timestep` query parameter.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Timestep::FiveMinutes => "5m",
            Timestep::OneHour => "1h",
            Timestep::SixHours => "6h",
            Timestep::OneDay => "24h",
        }
    }

    pub const fn bucket_secs(&self) -> i64 {
        match self {
            Timestep::FiveMinutes => 5 * 60,
            Timestep::OneHour => 60 * 60,
            Timestep::SixHours => 6 * 60 * 60,
            Timestep::OneDay => SECS_PER_DAY,
        }
    }

    pub const fn buckets_per_day(&self) -> u64 {
        (SECS_PER_DAY / self.bucket_secs()) as u64
    }

    /// How many buckets cover `window_secs`, never less than one.
    pub const fn buckets_in(&self, window_secs: i64) -> usize {
        let n = window_secs / self.bucket_secs();
        if n < 1 { 1 } else { n as usize }
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timestep {
    type Err = TimestepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TimestepError::InvalidInput {
                message: "empty timestep".into(),
            });
        }
        match trimmed.to_lowercase().as_str() {
            "5m" | "5min" => Ok(Timestep::FiveMinutes),
            "1h" | "60m" => Ok(Timestep::OneHour),
            "6h" => Ok(Timestep::SixHours),
            "24h" | "1d" => Ok(Timestep::OneDay),
            _ => Err(TimestepError::Unknown {
                input: trimmed.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Timestep {
    type Error = TimestepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timestep> for String {
    fn from(value: Timestep) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_round_trip() {
        for ts in Timestep::ALL {
            assert_eq!(ts.to_string().parse::<Timestep>().unwrap(), ts);
        }
    }

    #[test]
    fn accepts_aliases() {
        assert_eq!("5MIN".parse::<Timestep>().unwrap(), Timestep::FiveMinutes);
        assert_eq!(" 1d ".parse::<Timestep>().unwrap(), Timestep::OneDay);
    }

    #[test]
    fn rejects_unknown_widths() {
        match "15m".parse::<Timestep>() {
            Err(TimestepError::Unknown { input }) => assert_eq!(input, "15m"),
            other => panic!("expected Unknown error, got {other:?}"),
        }
        assert!(matches!(
            "".parse::<Timestep>(),
            Err(TimestepError::InvalidInput { .. })
        ));
    }

    #[test]
    fn buckets_per_day() {
        assert_eq!(Timestep::FiveMinutes.buckets_per_day(), 288);
        assert_eq!(Timestep::OneHour.buckets_per_day(), 24);
        assert_eq!(Timestep::SixHours.buckets_per_day(), 4);
        assert_eq!(Timestep::OneDay.buckets_per_day(), 1);
    }

    #[test]
    fn window_lengths_in_buckets() {
        assert_eq!(Timestep::FiveMinutes.buckets_in(60 * 60), 12);
        assert_eq!(Timestep::FiveMinutes.buckets_in(SECS_PER_DAY), 288);
        assert_eq!(Timestep::SixHours.buckets_in(60 * 60), 1);
    }

    #[test]
    fn serde_uses_wire_form() {
        let json = serde_json::to_string(&Timestep::SixHours).unwrap();
        assert_eq!(json, "\"6h\"");
        let back: Timestep = serde_json::from_str("\"24h\"").unwrap();
        assert_eq!(back, Timestep::OneDay);
    }
}
