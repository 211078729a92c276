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

use serde::Deserialize;
use serde::Serialize;

use crate::types::row::CourseRow;

/// Weighted totals over a set of course rows.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_credits: u32,
    pub total_points: f64,
    pub gpa: f64,
}

impl Totals {
    pub fn zero() -> Self {
        Self {
            total_credits: 0,
            total_points: 0.0,
            gpa: 0.0,
        }
    }
}

/// Compute totals over a row list. A row contributes only when both its
/// credits and its score range are set; everything else contributes zero.
/// The GPA is exactly zero when no credits were earned.
pub fn compute_totals(rows: &[CourseRow]) -> Totals {
    let mut total_credits: u32 = 0;
    let mut total_points: f64 = 0.0;
    for row in rows {
        let (credits, range) = match (row.credits, row.score_range) {
            (Some(credits), Some(range)) => (credits, range),
            _ => continue,
        };
        total_credits += credits as u32;
        total_points += credits as f64 * range.points();
    }
    let gpa = if total_credits > 0 {
        total_points / total_credits as f64
    } else {
        0.0
    };
    Totals {
        total_credits,
        total_points,
        gpa,
    }
}
