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

use crate::types::score::ScoreRange;

/// Identifies a course row within the active row list.
pub type RowId = u64;

/// The credit counts a course can carry.
pub const CREDIT_CHOICES: [u8; 6] = [1, 2, 3, 4, 5, 6];

/// Parse a credit count from form or file input. Anything outside the fixed
/// choice set is treated as unset.
pub fn parse_credits(s: &str) -> Option<u8> {
    let credits = s.trim().parse::<u8>().ok()?;
    if CREDIT_CHOICES.contains(&credits) {
        Some(credits)
    } else {
        None
    }
}

/// One course in a semester. Rows with unset credits or score range are
/// excluded from totals.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRow {
    pub id: RowId,
    pub name: String,
    pub credits: Option<u8>,
    pub score_range: Option<ScoreRange>,
}

impl CourseRow {
    pub fn empty(id: RowId) -> Self {
        Self {
            id,
            name: String::new(),
            credits: None,
            score_range: None,
        }
    }
}
