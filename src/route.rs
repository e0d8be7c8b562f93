//! Routes between tour stops

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TourError;

/// How the visitor moves between stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    #[default]
    Walk,
    Drive,
    Bicycle,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "WALK",
            Self::Drive => "DRIVE",
            Self::Bicycle => "BICYCLE",
            Self::Transit => "TRANSIT",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "walk" | "walking" => Ok(Self::Walk),
            "drive" | "driving" => Ok(Self::Drive),
            "bicycle" | "bike" => Ok(Self::Bicycle),
            "transit" => Ok(Self::Transit),
            other => Err(TourError::InvalidInput(format!(
                "unknown travel mode '{}'",
                other
            ))),
        }
    }
}

/// Distance and duration of one route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub distance_meters: u64,
    pub duration_secs: u64,
}

impl Route {
    /// Parse the `"950s"` duration format used by the Routes service
    pub fn parse_duration(value: &str) -> Option<u64> {
        value.strip_suffix('s')?.parse().ok()
    }

    pub fn humanized_distance(&self) -> String {
        format!("{:?} km", self.distance_meters as f64 / 1000.0)
    }

    pub fn humanized_duration(&self) -> String {
        let hours = self.duration_secs / 3600;
        let minutes = (self.duration_secs % 3600) / 60;
        let seconds = self.duration_secs % 60;
        format!("{} hours, {} minutes, {} seconds", hours, minutes, seconds)
    }
}

/// Route between two consecutive tour stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    /// `None` when the service found no route for this pair
    pub route: Option<Route>,
}

impl RouteLeg {
    pub fn describe(&self) -> String {
        match &self.route {
            Some(route) => format!(
                "{} -> {}: {}, {}",
                self.from,
                self.to,
                route.humanized_distance(),
                route.humanized_duration()
            ),
            None => format!("{} -> {}: no route found", self.from, self.to),
        }
    }
}
