//! The activity value object and its derived fields.
//!
//! An [`Activity`] is a read-only view over one raw record from the
//! activity-search endpoint. The upstream fields are loosely typed display
//! strings; every accessor parses on demand and reports a lookup or parse
//! failure as a named [`GarminError`].

use crate::GarminError;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

/// Shape of the start-timestamp display string, e.g. `"Wed, Sep 25, 2013 19:09"`.
const START_TIME_FORMAT: &str = "%a, %b %d, %Y %H:%M";

/// Unit of measure for an activity's distance.
///
/// The wire tags come verbatim from the upstream API, including its literal
/// `"kilomiter"` misspelling; only the display abbreviations are spelled
/// conventionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Mile,
    Kilometer,
}

impl Unit {
    /// Map the upstream unit-of-measure tag to a [`Unit`].
    pub fn from_uom(uom: &str) -> Result<Self, GarminError> {
        match uom {
            "mile" => Ok(Unit::Mile),
            "kilomiter" => Ok(Unit::Kilometer),
            other => Err(GarminError::UnknownUnit(other.to_string())),
        }
    }

    /// The tag the upstream API uses for this unit, typo and all.
    pub fn wire_name(self) -> &'static str {
        match self {
            Unit::Mile => "mile",
            Unit::Kilometer => "kilomiter",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Unit::Mile => "Mi",
            Unit::Kilometer => "Km",
        }
    }

    pub fn pace_abbreviation(self) -> &'static str {
        match self {
            Unit::Mile => "Min/Mi",
            Unit::Kilometer => "Min/Km",
        }
    }
}

/// Seconds-per-unit-distance as a clock value.
///
/// The result is the pace added to the midnight origin, usable only for
/// formatting hours:minutes:seconds of pace, not as a calendar time.
pub fn pace_clock(duration_seconds: i64, distance: f64) -> Result<NaiveTime, GarminError> {
    if distance <= 0.0 {
        return Err(GarminError::ZeroDistance);
    }
    let seconds_per_unit = duration_seconds as f64 / distance;
    Ok(NaiveTime::MIN + TimeDelta::milliseconds((seconds_per_unit * 1000.0) as i64))
}

/// One activity record, wrapped immutably.
#[derive(Clone, Debug)]
pub struct Activity {
    raw: serde_json::Value,
}

impl Activity {
    /// Wrap a raw page entry of the form `{"activity": {...}}`.
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    /// The underlying record as decoded from the page response.
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    fn field(&self, path: &[&str]) -> Result<&serde_json::Value, GarminError> {
        let mut current = &self.raw;
        for key in std::iter::once(&"activity").chain(path) {
            current = current.get(key).ok_or_else(|| {
                GarminError::MalformedResponse(format!(
                    "activity record is missing activity.{}",
                    path.join(".")
                ))
            })?;
        }
        Ok(current)
    }

    fn str_field(&self, path: &[&str]) -> Result<&str, GarminError> {
        self.field(path)?.as_str().ok_or_else(|| {
            GarminError::MalformedResponse(format!(
                "activity.{} is not a string",
                path.join(".")
            ))
        })
    }

    pub fn name(&self) -> Result<&str, GarminError> {
        self.str_field(&["activityName", "value"])
    }

    /// Elapsed time, parsed from the `"H:MM:SS"` display string.
    ///
    /// Components are unbounded non-negative integers; hours past 23 are
    /// valid (the upstream keeps counting).
    pub fn duration(&self) -> Result<TimeDelta, GarminError> {
        let display = self.str_field(&["sumDuration", "display"])?;
        let mut parts = display.split(':');
        let (Some(h), Some(m), Some(s), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(GarminError::MalformedResponse(format!(
                "duration {display:?} is not of the form H:MM:SS"
            )));
        };
        let parse = |v: &str| {
            v.parse::<i64>().ok().filter(|n| *n >= 0).ok_or_else(|| {
                GarminError::MalformedResponse(format!(
                    "duration component {v:?} in {display:?} is not a non-negative integer"
                ))
            })
        };
        Ok(TimeDelta::hours(parse(h)?)
            + TimeDelta::minutes(parse(m)?)
            + TimeDelta::seconds(parse(s)?))
    }

    pub fn duration_seconds(&self) -> Result<i64, GarminError> {
        Ok(self.duration()?.num_seconds())
    }

    /// Distance in the activity's unit of measure.
    pub fn distance(&self) -> Result<f64, GarminError> {
        let value = self.str_field(&["sumDistance", "value"])?;
        value.parse::<f64>().map_err(|_| {
            GarminError::MalformedResponse(format!("distance {value:?} is not numeric"))
        })
    }

    /// Distance rounded up to two decimal places.
    pub fn distance_short(&self) -> Result<f64, GarminError> {
        Ok((self.distance()? * 100.0).ceil() / 100.0)
    }

    pub fn unit(&self) -> Result<Unit, GarminError> {
        Unit::from_uom(self.str_field(&["sumDistance", "uom"])?)
    }

    pub fn short_unit(&self) -> Result<&'static str, GarminError> {
        Ok(self.unit()?.abbreviation())
    }

    pub fn pace_unit(&self) -> Result<&'static str, GarminError> {
        Ok(self.unit()?.pace_abbreviation())
    }

    /// Time per unit distance as a clock value, see [`pace_clock`].
    pub fn pace(&self) -> Result<NaiveTime, GarminError> {
        pace_clock(self.duration_seconds()?, self.distance()?)
    }

    /// Start of the activity, parsed from the display timestamp.
    pub fn start_time(&self) -> Result<NaiveDateTime, GarminError> {
        let display = self.str_field(&["beginTimestamp", "display"])?;
        NaiveDateTime::parse_from_str(display, START_TIME_FORMAT).map_err(|e| {
            GarminError::MalformedResponse(format!("start timestamp {display:?}: {e}"))
        })
    }
}
