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

use serde::Serialize;

use crate::error::Fallible;
use crate::projection::CREDIT_BUCKETS;
use crate::projection::required_for;
use crate::storage::load_state;
use crate::storage::state_file_path;
use crate::store::SessionState;
use crate::totals::Totals;
use crate::types::semester::Semester;
use crate::types::timestamp::Timestamp;

/// Print the session and its derived values as pretty JSON on stdout. Uses
/// the tolerant reader, so a missing or corrupt file reports over defaults,
/// the same state the running app would start with.
pub fn export_state(file: Option<String>) -> Fallible<()> {
    let path = state_file_path(file);
    let state = load_state(&path);
    let export = get_export(&state);
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    target_gpa: f64,
    cumulative: Totals,
    semesters: Vec<SemesterExport>,
    projection: Vec<ProjectionExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SemesterExport {
    id: String,
    label: String,
    saved: bool,
    totals: Option<Totals>,
    saved_at: Option<Timestamp>,
    courses: Vec<CourseExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseExport {
    name: String,
    credits: Option<u8>,
    score_range: Option<String>,
    points: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionExport {
    credits: u32,
    required_gpa: Option<f64>,
}

fn get_export(state: &SessionState) -> Export {
    let cumulative = state.cumulative_totals();
    let mut semesters: Vec<SemesterExport> = Vec::new();
    for semester in Semester::all() {
        let record = state.records.get(&semester);
        let courses = match record {
            Some(record) => record
                .rows
                .iter()
                .map(|row| CourseExport {
                    name: row.name.clone(),
                    credits: row.credits,
                    score_range: row.score_range.map(|range| range.as_str().to_string()),
                    points: row.score_range.map(|range| range.points()),
                })
                .collect(),
            None => Vec::new(),
        };
        semesters.push(SemesterExport {
            id: semester.id(),
            label: semester.label(),
            saved: record.is_some(),
            totals: record.map(|record| record.totals),
            saved_at: record.map(|record| record.saved_at),
            courses,
        });
    }
    let projection = CREDIT_BUCKETS
        .iter()
        .map(|&bucket| ProjectionExport {
            credits: bucket,
            required_gpa: required_for(bucket, &cumulative, state.target_gpa).as_gpa(),
        })
        .collect();
    Export {
        target_gpa: state.target_gpa,
        cumulative,
        semesters,
        projection,
    }
}
