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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::totals::Totals;
use crate::totals::compute_totals;
use crate::types::row::CourseRow;
use crate::types::row::RowId;
use crate::types::score::MAX_GRADE_POINTS;
use crate::types::score::ScoreRange;
use crate::types::semester::Semester;
use crate::types::timestamp::Timestamp;

pub const DEFAULT_TARGET_GPA: f64 = 4.0;

/// A saved snapshot of one semester's rows and their totals. Immutable once
/// created; re-saving replaces the whole record.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterRecord {
    pub rows: Vec<CourseRow>,
    pub totals: Totals,
    pub saved_at: Timestamp,
}

/// An edit to a single field of a course row.
#[derive(Clone, Debug)]
pub enum RowField {
    Name(String),
    Credits(Option<u8>),
    Score(Option<ScoreRange>),
}

/// The whole session: the active (unsaved) row list, the selected semester,
/// every semester's saved record, and the target GPA. All mutation goes
/// through the named operations below; persistence is the caller's concern.
pub struct SessionState {
    pub rows: Vec<CourseRow>,
    pub selected: Semester,
    pub records: BTreeMap<Semester, SemesterRecord>,
    pub target_gpa: f64,
    next_row_id: RowId,
}

impl SessionState {
    /// The default state: one fresh row, first semester, nothing saved.
    pub fn new() -> Self {
        Self {
            rows: vec![CourseRow::empty(1)],
            selected: Semester::first(),
            records: BTreeMap::new(),
            target_gpa: DEFAULT_TARGET_GPA,
            next_row_id: 2,
        }
    }

    /// Reassemble a session from loaded parts. The row id counter resumes
    /// past the highest id present; ids are not durable identity, so if the
    /// counter cannot advance past them the rows are renumbered from 1.
    pub fn from_parts(
        mut rows: Vec<CourseRow>,
        selected: Semester,
        records: BTreeMap<Semester, SemesterRecord>,
        target_gpa: f64,
    ) -> Self {
        let max_id = rows.iter().map(|row| row.id).max().unwrap_or(0);
        let next_row_id = match max_id.checked_add(1) {
            Some(next) => next,
            None => {
                for (index, row) in rows.iter_mut().enumerate() {
                    row.id = index as RowId + 1;
                }
                rows.len() as RowId + 1
            }
        };
        Self {
            rows,
            selected,
            records,
            target_gpa,
            next_row_id,
        }
    }

    fn fresh_id(&mut self) -> RowId {
        let id = self.next_row_id;
        self.next_row_id += 1;
        id
    }

    fn reset_to_fresh_row(&mut self) {
        let id = self.fresh_id();
        self.rows = vec![CourseRow::empty(id)];
    }

    /// Replace one field on the row with the given id. Unknown ids are a
    /// no-op.
    pub fn update_row(&mut self, id: RowId, field: RowField) {
        let row = match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => row,
            None => return,
        };
        match field {
            RowField::Name(name) => row.name = name,
            RowField::Credits(credits) => row.credits = credits,
            RowField::Score(score_range) => row.score_range = score_range,
        }
    }

    /// Append a fresh empty row.
    pub fn add_row(&mut self) {
        let id = self.fresh_id();
        self.rows.push(CourseRow::empty(id));
    }

    /// Delete the row with the given id. The store places no floor on the
    /// list length; keeping at least one row on screen is the UI's policy.
    pub fn remove_row(&mut self, id: RowId) {
        self.rows.retain(|row| row.id != id);
    }

    /// Discard all unsaved edits and start over with one fresh row.
    pub fn reset_rows(&mut self) {
        self.reset_to_fresh_row();
    }

    /// Snapshot the active rows and their totals into the selected
    /// semester's record, unconditionally overwriting any prior record.
    pub fn save_selected(&mut self, saved_at: Timestamp) {
        let record = SemesterRecord {
            rows: self.rows.clone(),
            totals: compute_totals(&self.rows),
            saved_at,
        };
        self.records.insert(self.selected, record);
    }

    /// Select a semester and load its saved rows into the active list, or a
    /// single fresh row if nothing was saved. Unsaved edits on the
    /// previously selected semester are discarded.
    pub fn load_semester(&mut self, semester: Semester) {
        self.selected = semester;
        let saved_rows = self
            .records
            .get(&semester)
            .map(|record| record.rows.clone())
            .filter(|rows| !rows.is_empty());
        match saved_rows {
            Some(mut rows) => {
                // Saved rows get fresh ids so they can't collide with ids
                // handed out earlier in the session.
                for row in rows.iter_mut() {
                    row.id = self.fresh_id();
                }
                self.rows = rows;
            }
            None => self.reset_to_fresh_row(),
        }
    }

    /// Delete the selected semester's record and reset the active list.
    pub fn clear_selected(&mut self) {
        self.records.remove(&self.selected);
        self.reset_to_fresh_row();
    }

    /// Set the target GPA. Non-finite or out-of-range values are ignored
    /// and the prior value retained.
    pub fn set_target_gpa(&mut self, target: f64) {
        if target.is_finite() && (0.0..=MAX_GRADE_POINTS).contains(&target) {
            self.target_gpa = target;
        }
    }

    /// Totals over the active (unsaved) row list.
    pub fn current_totals(&self) -> Totals {
        compute_totals(&self.rows)
    }

    /// Totals over every saved record, summing each record's precomputed
    /// totals. The active buffer does not contribute.
    pub fn cumulative_totals(&self) -> Totals {
        let mut total_credits: u32 = 0;
        let mut total_points: f64 = 0.0;
        for record in self.records.values() {
            total_credits += record.totals.total_credits;
            total_points += record.totals.total_points;
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
}
