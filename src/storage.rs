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
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::Fallible;
use crate::error::fail;
use crate::store::DEFAULT_TARGET_GPA;
use crate::store::SemesterRecord;
use crate::store::SessionState;
use crate::totals::Totals;
use crate::totals::compute_totals;
use crate::types::row::CREDIT_CHOICES;
use crate::types::row::CourseRow;
use crate::types::row::RowId;
use crate::types::score::MAX_GRADE_POINTS;
use crate::types::score::ScoreRange;
use crate::types::semester::Semester;
use crate::types::timestamp::Timestamp;

pub const DEFAULT_STATE_FILE: &str = "gradebook.json";

/// Resolve the state file path from the optional CLI argument.
pub fn state_file_path(file: Option<String>) -> PathBuf {
    match file {
        Some(file) => PathBuf::from(file),
        None => PathBuf::from(DEFAULT_STATE_FILE),
    }
}

/// The on-disk shape of the session. All twelve semesters appear under
/// `records`, absent ones as `null`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    rows: Vec<CourseRow>,
    selected_semester: Semester,
    records: BTreeMap<Semester, Option<SemesterRecord>>,
    target_gpa: f64,
}

/// Serialize the whole session to the state file. Callers treat a failure
/// as non-fatal: the in-memory session keeps working.
pub fn save_state(path: &Path, state: &SessionState) -> Fallible<()> {
    let mut records: BTreeMap<Semester, Option<SemesterRecord>> = BTreeMap::new();
    for semester in Semester::all() {
        records.insert(semester, state.records.get(&semester).cloned());
    }
    let snapshot = Snapshot {
        rows: state.rows.clone(),
        selected_semester: state.selected,
        records,
        target_gpa: state.target_gpa,
    };
    let json = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load the session from the state file, tolerating anything: a missing or
/// unreadable file, invalid JSON, or a malformed field all fall back to
/// defaults, field by field. Never returns an error.
pub fn load_state(path: &Path) -> SessionState {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return SessionState::new(),
    };
    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("state file is not valid JSON, starting fresh: {e}");
            return SessionState::new();
        }
    };
    let map = match value {
        Value::Object(map) => map,
        _ => return SessionState::new(),
    };
    let rows = map
        .get("rows")
        .and_then(decode_rows)
        .unwrap_or_else(|| vec![CourseRow::empty(1)]);
    let selected = map
        .get("selectedSemester")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Semester>().ok())
        .unwrap_or_else(Semester::first);
    let records = map.get("records").map(decode_records).unwrap_or_default();
    let target_gpa = map
        .get("targetGpa")
        .and_then(Value::as_f64)
        .filter(|target| target.is_finite() && (0.0..=MAX_GRADE_POINTS).contains(target))
        .unwrap_or(DEFAULT_TARGET_GPA);
    SessionState::from_parts(rows, selected, records, target_gpa)
}

/// Decode the active row list, skipping malformed elements and clearing
/// out-of-set values. Returns None when the result would be empty.
fn decode_rows(value: &Value) -> Option<Vec<CourseRow>> {
    let elements = value.as_array()?;
    let mut rows: Vec<CourseRow> = Vec::new();
    for element in elements {
        match decode_row(element) {
            Some(row) => rows.push(row),
            None => log::warn!("skipping malformed row in state file"),
        }
    }
    if rows.is_empty() {
        return None;
    }
    // Missing or duplicated ids invalidate the whole numbering.
    let ids: HashSet<RowId> = rows.iter().map(|row| row.id).collect();
    if ids.len() != rows.len() || ids.contains(&0) {
        for (index, row) in rows.iter_mut().enumerate() {
            row.id = index as RowId + 1;
        }
    }
    Some(rows)
}

fn decode_row(value: &Value) -> Option<CourseRow> {
    let map = value.as_object()?;
    let id = map.get("id").and_then(Value::as_u64).unwrap_or(0);
    let name = map
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let credits = decode_credits(map.get("credits"));
    let score_range = map
        .get("scoreRange")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<ScoreRange>().ok());
    Some(CourseRow {
        id,
        name,
        credits,
        score_range,
    })
}

/// Credits were historically stored as strings; accept both forms. Values
/// outside the fixed choice set are cleared.
fn decode_credits(value: Option<&Value>) -> Option<u8> {
    let credits = match value {
        Some(Value::Number(n)) => u8::try_from(n.as_u64()?).ok()?,
        Some(Value::String(s)) => s.trim().parse::<u8>().ok()?,
        _ => return None,
    };
    if CREDIT_CHOICES.contains(&credits) {
        Some(credits)
    } else {
        None
    }
}

/// Decode the record map. Keys that are not semester ids are ignored; a
/// malformed record is treated as absent.
fn decode_records(value: &Value) -> BTreeMap<Semester, SemesterRecord> {
    let mut records: BTreeMap<Semester, SemesterRecord> = BTreeMap::new();
    let map = match value.as_object() {
        Some(map) => map,
        None => return records,
    };
    for (key, value) in map {
        let semester = match key.parse::<Semester>() {
            Ok(semester) => semester,
            Err(_) => {
                log::warn!("ignoring unknown semester key in state file: {key}");
                continue;
            }
        };
        if value.is_null() {
            continue;
        }
        match decode_record(value) {
            Some(record) => {
                records.insert(semester, record);
            }
            None => log::warn!("treating malformed record for {key} as absent"),
        }
    }
    records
}

/// Record rows go through the same tolerant path as the active rows, so
/// legacy snapshots that stored credits and score ranges as strings keep
/// their saved semesters. Missing or malformed totals are recomputed from
/// the rows; a record without a usable timestamp is absent.
fn decode_record(value: &Value) -> Option<SemesterRecord> {
    let map = value.as_object()?;
    let rows = map.get("rows").and_then(decode_rows)?;
    let totals = map
        .get("totals")
        .and_then(|totals| serde_json::from_value::<Totals>(totals.clone()).ok())
        .unwrap_or_else(|| compute_totals(&rows));
    let saved_at = map
        .get("savedAt")
        .and_then(|saved_at| serde_json::from_value::<Timestamp>(saved_at.clone()).ok())?;
    Some(SemesterRecord {
        rows,
        totals,
        saved_at,
    })
}

/// Strict reader: the state file must exist and parse as the exact snapshot
/// shape. Used by `gradebook check`.
pub fn load_state_strict(path: &Path) -> Fallible<SessionState> {
    if !path.exists() {
        return fail("state file does not exist.");
    }
    let raw = std::fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&raw)?;
    let mut ids: HashSet<RowId> = HashSet::new();
    for row in &snapshot.rows {
        if !ids.insert(row.id) {
            return fail("duplicate row id in state file.");
        }
        if let Some(credits) = row.credits {
            if !CREDIT_CHOICES.contains(&credits) {
                return fail("credit count outside the allowed set.");
            }
        }
    }
    if !snapshot.target_gpa.is_finite()
        || !(0.0..=MAX_GRADE_POINTS).contains(&snapshot.target_gpa)
    {
        return fail("target GPA out of range.");
    }
    let records = snapshot
        .records
        .into_iter()
        .filter_map(|(semester, record)| record.map(|record| (semester, record)))
        .collect();
    Ok(SessionState::from_parts(
        snapshot.rows,
        snapshot.selected_semester,
        records,
        snapshot.target_gpa,
    ))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::store::RowField;
    use crate::types::timestamp::Timestamp;

    fn state_in(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("gradebook.json")
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let state = load_state(&state_in(&dir));
        assert_eq!(state.rows, vec![CourseRow::empty(1)]);
        assert_eq!(state.selected, Semester::Y1Fall);
        assert!(state.records.is_empty());
        assert_eq!(state.target_gpa, 4.0);
    }

    #[test]
    fn test_invalid_json_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        std::fs::write(&path, "{not json").unwrap();
        let state = load_state(&path);
        assert_eq!(state.rows, vec![CourseRow::empty(1)]);
        assert_eq!(state.selected, Semester::Y1Fall);
        assert!(state.records.is_empty());
        assert_eq!(state.target_gpa, 4.0);
    }

    #[test]
    fn test_non_object_root_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let state = load_state(&path);
        assert_eq!(state.rows, vec![CourseRow::empty(1)]);
    }

    #[test]
    fn test_write_read_round_trip() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        let mut state = SessionState::new();
        state.update_row(1, RowField::Name("Calculus".to_string()));
        state.update_row(1, RowField::Credits(Some(3)));
        state.update_row(1, RowField::Score(Some(ScoreRange::S90To100)));
        state.save_selected(Timestamp::now());
        state.load_semester(Semester::Y2Spring);
        state.set_target_gpa(3.9);
        save_state(&path, &state).unwrap();

        let loaded = load_state(&path);
        assert_eq!(loaded.selected, Semester::Y2Spring);
        assert_eq!(loaded.target_gpa, 3.9);
        let record = loaded.records.get(&Semester::Y1Fall).unwrap();
        assert_eq!(record.rows[0].name, "Calculus");
        assert_eq!(record.totals.total_credits, 3);
        assert!(!loaded.records.contains_key(&Semester::Y2Spring));
    }

    #[test]
    fn test_per_field_fallback() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        // rows is malformed, the rest is fine.
        let json = r#"{
            "rows": 42,
            "selectedSemester": "y3-fall",
            "records": {},
            "targetGpa": 3.2
        }"#;
        std::fs::write(&path, json).unwrap();
        let state = load_state(&path);
        assert_eq!(state.rows, vec![CourseRow::empty(1)]);
        assert_eq!(state.selected, Semester::Y3Fall);
        assert_eq!(state.target_gpa, 3.2);
    }

    #[test]
    fn test_row_normalization() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        // String credits, an out-of-set credit count, a duplicate id, and a
        // non-object element.
        let json = r#"{
            "rows": [
                {"id": 1, "name": "A", "credits": "3", "scoreRange": "90-100"},
                {"id": 1, "name": "B", "credits": 9, "scoreRange": "nope"},
                "junk"
            ]
        }"#;
        std::fs::write(&path, json).unwrap();
        let state = load_state(&path);
        assert_eq!(state.rows.len(), 2);
        assert_eq!(state.rows[0].id, 1);
        assert_eq!(state.rows[1].id, 2);
        assert_eq!(state.rows[0].credits, Some(3));
        assert_eq!(state.rows[1].credits, None);
        assert_eq!(state.rows[1].score_range, None);
    }

    #[test]
    fn test_empty_rows_become_one_fresh_row() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        std::fs::write(&path, r#"{"rows": []}"#).unwrap();
        let state = load_state(&path);
        assert_eq!(state.rows, vec![CourseRow::empty(1)]);
    }

    #[test]
    fn test_huge_row_id_does_not_break_numbering() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        let json = format!(
            r#"{{"rows": [{{"id": {}, "name": "A", "credits": 3, "scoreRange": "90-100"}}]}}"#,
            u64::MAX
        );
        std::fs::write(&path, json).unwrap();
        let mut state = load_state(&path);
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.rows[0].name, "A");
        // The id counter still advances and hands out unique ids.
        state.add_row();
        let ids: Vec<_> = state.rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_legacy_record_with_string_credits_survives() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        // What the original web app put in localStorage: string credits and
        // score ranges inside saved records too.
        let json = r#"{
            "rows": [{"id": 1, "name": "", "credits": "", "scoreRange": ""}],
            "selectedSemester": "y1-fall",
            "records": {
                "y1-fall": {
                    "rows": [
                        {"id": 1, "name": "Calculus", "credits": "3", "scoreRange": "90-100"}
                    ],
                    "totals": {"totalCredits": 3, "totalPoints": 12.9, "gpa": 4.3},
                    "savedAt": "2025-08-29T10:00:00.000Z"
                }
            },
            "targetGpa": 4.0
        }"#;
        std::fs::write(&path, json).unwrap();
        let state = load_state(&path);
        let record = state.records.get(&Semester::Y1Fall).unwrap();
        assert_eq!(record.rows[0].name, "Calculus");
        assert_eq!(record.rows[0].credits, Some(3));
        assert_eq!(record.rows[0].score_range, Some(ScoreRange::S90To100));
        assert_eq!(record.totals.total_credits, 3);
    }

    #[test]
    fn test_record_without_totals_recomputes_them() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        let json = r#"{
            "records": {
                "y2-spring": {
                    "rows": [{"id": 1, "name": "", "credits": 4, "scoreRange": "80-84"}],
                    "savedAt": "2025-08-29T10:00:00+00:00"
                }
            }
        }"#;
        std::fs::write(&path, json).unwrap();
        let state = load_state(&path);
        let record = state.records.get(&Semester::Y2Spring).unwrap();
        assert_eq!(record.totals.total_credits, 4);
        assert!((record.totals.total_points - 14.8).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_record_treated_as_absent() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        let json = r#"{
            "records": {
                "y1-fall": {"rows": "nope"},
                "y2-fall": null,
                "not-a-semester": {"rows": []}
            }
        }"#;
        std::fs::write(&path, json).unwrap();
        let state = load_state(&path);
        assert!(state.records.is_empty());
    }

    #[test]
    fn test_out_of_range_target_yields_default() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        std::fs::write(&path, r#"{"targetGpa": 9.9}"#).unwrap();
        let state = load_state(&path);
        assert_eq!(state.target_gpa, 4.0);
    }

    #[test]
    fn test_strict_reader_accepts_saved_state() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        let state = SessionState::new();
        save_state(&path, &state).unwrap();
        assert!(load_state_strict(&path).is_ok());
    }

    #[test]
    fn test_strict_reader_rejects_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_state_strict(&state_in(&dir));
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: state file does not exist."
        );
    }

    #[test]
    fn test_strict_reader_rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        std::fs::write(&path, r#"{"rows": []}"#).unwrap();
        assert!(load_state_strict(&path).is_err());
    }

    #[test]
    fn test_strict_reader_rejects_bad_credits() {
        let dir = tempdir().unwrap();
        let path = state_in(&dir);
        let state = SessionState::new();
        save_state(&path, &state).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let raw = raw.replace("\"credits\": null", "\"credits\": 9");
        std::fs::write(&path, raw).unwrap();
        assert!(load_state_strict(&path).is_err());
    }
}
