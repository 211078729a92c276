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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;

use crate::server::state::ServerState;
use crate::storage::save_state;
use crate::store::RowField;
use crate::store::SessionState;
use crate::types::row::RowId;
use crate::types::row::parse_credits;
use crate::types::score::ScoreRange;
use crate::types::semester::Semester;
use crate::types::timestamp::Timestamp;

/// The whole page is one form. Every POST carries every row field plus the
/// target, and at most one `action` pair from the clicked button. Field
/// edits are applied first, then the action.
pub async fn post_handler(
    State(state): State<ServerState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    let mut session = state.session.lock().unwrap();
    let mut action: Option<String> = None;
    for (key, value) in fields {
        if key == "action" {
            action = Some(value);
        } else {
            apply_field(&mut session, &key, value);
        }
    }
    if let Some(action) = action {
        apply_action(&mut session, &action);
    }
    if let Err(e) = save_state(&state.state_path, &session) {
        log::warn!("could not write state file: {e}");
    }
    Redirect::to("/")
}

fn apply_field(session: &mut SessionState, key: &str, value: String) {
    if let Some(id) = row_id(key, "name-") {
        session.update_row(id, RowField::Name(value));
    } else if let Some(id) = row_id(key, "credits-") {
        session.update_row(id, RowField::Credits(parse_credits(&value)));
    } else if let Some(id) = row_id(key, "score-") {
        session.update_row(id, RowField::Score(value.parse::<ScoreRange>().ok()));
    } else if key == "target" {
        if let Ok(target) = value.parse::<f64>() {
            session.set_target_gpa(target);
        }
    } else {
        log::debug!("ignoring unknown form field: {key}");
    }
}

fn apply_action(session: &mut SessionState, action: &str) {
    if action == "add" {
        session.add_row();
    } else if action == "reset" {
        session.reset_rows();
    } else if action == "save" {
        session.save_selected(Timestamp::now());
    } else if action == "clear" {
        session.clear_selected();
    } else if let Some(id) = row_id(action, "remove-") {
        session.remove_row(id);
    } else if let Some(semester) = action
        .strip_prefix("load-")
        .and_then(|s| s.parse::<Semester>().ok())
    {
        session.load_semester(semester);
    } else {
        log::error!("unknown action: {action}");
    }
}

fn row_id(key: &str, prefix: &str) -> Option<RowId> {
    key.strip_prefix(prefix)?.parse::<RowId>().ok()
}
