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

/// One of the twelve fixed semesters: six academic years, two terms each.
/// The set is fixed for the lifetime of the application; semesters are never
/// created or deleted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Semester {
    #[serde(rename = "y1-fall")]
    Y1Fall,
    #[serde(rename = "y1-spring")]
    Y1Spring,
    #[serde(rename = "y2-fall")]
    Y2Fall,
    #[serde(rename = "y2-spring")]
    Y2Spring,
    #[serde(rename = "y3-fall")]
    Y3Fall,
    #[serde(rename = "y3-spring")]
    Y3Spring,
    #[serde(rename = "y4-fall")]
    Y4Fall,
    #[serde(rename = "y4-spring")]
    Y4Spring,
    #[serde(rename = "y5-fall")]
    Y5Fall,
    #[serde(rename = "y5-spring")]
    Y5Spring,
    #[serde(rename = "y6-fall")]
    Y6Fall,
    #[serde(rename = "y6-spring")]
    Y6Spring,
}

impl Semester {
    /// All semesters in chronological order.
    pub fn all() -> [Semester; 12] {
        [
            Semester::Y1Fall,
            Semester::Y1Spring,
            Semester::Y2Fall,
            Semester::Y2Spring,
            Semester::Y3Fall,
            Semester::Y3Spring,
            Semester::Y4Fall,
            Semester::Y4Spring,
            Semester::Y5Fall,
            Semester::Y5Spring,
            Semester::Y6Fall,
            Semester::Y6Spring,
        ]
    }

    /// The default selection: the first semester.
    pub fn first() -> Semester {
        Semester::Y1Fall
    }

    fn parts(self) -> (u8, &'static str) {
        let index = Semester::all()
            .iter()
            .position(|s| *s == self)
            .unwrap() as u8;
        let year = index / 2 + 1;
        let term = if index % 2 == 0 { "fall" } else { "spring" };
        (year, term)
    }

    pub fn id(self) -> String {
        let (year, term) = self.parts();
        format!("y{year}-{term}")
    }

    pub fn label(self) -> String {
        let (year, term) = self.parts();
        let term = if term == "fall" { "Fall" } else { "Spring" };
        format!("Year {year} {term}")
    }
}

impl FromStr for Semester {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for semester in Semester::all() {
            if semester.id() == s {
                return Ok(semester);
            }
        }
        Err(ErrorReport::new(format!("unknown semester: {s}")))
    }
}
