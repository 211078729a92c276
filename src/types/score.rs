// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

/// The highest grade-point value a course can earn.
pub const MAX_GRADE_POINTS: f64 = 4.3;

/// A score range on a course, e.g. a final score between 85 and 89.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ScoreRange {
    #[serde(rename = "90-100")]
    S90To100,
    #[serde(rename = "85-89")]
    S85To89,
    #[serde(rename = "80-84")]
    S80To84,
    #[serde(rename = "77-79")]
    S77To79,
    #[serde(rename = "73-76")]
    S73To76,
    #[serde(rename = "70-72")]
    S70To72,
    #[serde(rename = "67-69")]
    S67To69,
    #[serde(rename = "63-66")]
    S63To66,
    #[serde(rename = "60-62")]
    S60To62,
    #[serde(rename = "50-59")]
    S50To59,
    #[serde(rename = "1-49")]
    S1To49,
    #[serde(rename = "0")]
    S0,
}

impl ScoreRange {
    /// All score ranges, in display order from best to worst.
    pub fn all() -> [ScoreRange; 12] {
        [
            ScoreRange::S90To100,
            ScoreRange::S85To89,
            ScoreRange::S80To84,
            ScoreRange::S77To79,
            ScoreRange::S73To76,
            ScoreRange::S70To72,
            ScoreRange::S67To69,
            ScoreRange::S63To66,
            ScoreRange::S60To62,
            ScoreRange::S50To59,
            ScoreRange::S1To49,
            ScoreRange::S0,
        ]
    }

    /// The grade-point value of this score range.
    pub fn points(self) -> f64 {
        match self {
            ScoreRange::S90To100 => 4.3,
            ScoreRange::S85To89 => 4.0,
            ScoreRange::S80To84 => 3.7,
            ScoreRange::S77To79 => 3.3,
            ScoreRange::S73To76 => 3.0,
            ScoreRange::S70To72 => 2.7,
            ScoreRange::S67To69 => 2.3,
            ScoreRange::S63To66 => 2.0,
            ScoreRange::S60To62 => 1.7,
            ScoreRange::S50To59 => 1.0,
            ScoreRange::S1To49 => 0.0,
            ScoreRange::S0 => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreRange::S90To100 => "90-100",
            ScoreRange::S85To89 => "85-89",
            ScoreRange::S80To84 => "80-84",
            ScoreRange::S77To79 => "77-79",
            ScoreRange::S73To76 => "73-76",
            ScoreRange::S70To72 => "70-72",
            ScoreRange::S67To69 => "67-69",
            ScoreRange::S63To66 => "63-66",
            ScoreRange::S60To62 => "60-62",
            ScoreRange::S50To59 => "50-59",
            ScoreRange::S1To49 => "1-49",
            ScoreRange::S0 => "0",
        }
    }
}

impl FromStr for ScoreRange {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for range in ScoreRange::all() {
            if range.as_str() == s {
                return Ok(range);
            }
        }
        Err(ErrorReport::new(format!("unknown score range: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(ScoreRange::S90To100.points(), 4.3);
        assert_eq!(ScoreRange::S80To84.points(), 3.7);
        assert_eq!(ScoreRange::S50To59.points(), 1.0);
        assert_eq!(ScoreRange::S1To49.points(), 0.0);
        assert_eq!(ScoreRange::S0.points(), 0.0);
    }

    #[test]
    fn test_max_points() {
        for range in ScoreRange::all() {
            assert!(range.points() <= MAX_GRADE_POINTS);
        }
    }

    #[test]
    fn test_string_round_trip() {
        for range in ScoreRange::all() {
            assert_eq!(range.as_str().parse::<ScoreRange>().unwrap(), range);
        }
    }

    #[test]
    fn test_unknown_label() {
        assert!("A+".parse::<ScoreRange>().is_err());
        assert!("".parse::<ScoreRange>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&ScoreRange::S90To100).unwrap();
        assert_eq!(json, "\"90-100\"");
        let range: ScoreRange = serde_json::from_str("\"85-89\"").unwrap();
        assert_eq!(range, ScoreRange::S85To89);
    }
}
