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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::projection::CREDIT_BUCKETS;
use crate::projection::Requirement;
use crate::projection::required_for;
use crate::server::state::ServerState;
use crate::server::template::page_template;
use crate::store::SessionState;
use crate::types::row::CREDIT_CHOICES;
use crate::types::score::ScoreRange;
use crate::types::semester::Semester;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let session = state.session.lock().unwrap();
    let body = html! {
        form #page-form .layout action="/" method="post" {
            (sidebar(&session))
            (course_card(&session))
            (projection_panel(&session))
        }
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}

fn sidebar(session: &SessionState) -> Markup {
    let cumulative = session.cumulative_totals();
    html! {
        aside.sidebar {
            div.sidebar-title { "Semesters" }
            div.semester-list {
                @for semester in Semester::all() {
                    button.semester-item.active[semester == session.selected]
                        type="submit" name="action" value=(format!("load-{}", semester.id())) {
                        span { (semester.label()) }
                        @match session.records.get(&semester) {
                            Some(record) => {
                                span.semester-gpa { (format!("{:.2}", record.totals.gpa)) }
                            }
                            None => {
                                span.semester-empty { "not yet saved" }
                            }
                        }
                    }
                }
            }
            button.secondary.sidebar-clear type="submit" name="action" value="clear" {
                "Clear this semester"
            }
            div.semester-total {
                div.sidebar-title { "All semesters" }
                div.semester-total-row {
                    "Total credits "
                    span { (cumulative.total_credits) }
                }
                div.semester-total-row {
                    "Cumulative GPA "
                    span { (format!("{:.2}", cumulative.gpa)) }
                }
            }
        }
    }
}

fn course_card(session: &SessionState) -> Markup {
    let totals = session.current_totals();
    let remove_disabled = session.rows.len() == 1;
    html! {
        div.card {
            div.header {
                div {
                    div.title { "GPA Calculator" }
                    div.subtitle { "Score ranges convert to grade points" }
                }
                div.note { "Editing: " (session.selected.label()) }
            }
            div.summary {
                div { "Credits " span { (totals.total_credits) } }
                div { "Points " span { (format!("{:.2}", totals.total_points)) } }
                div { "GPA " span { (format!("{:.2}", totals.gpa)) } }
            }
            div.actions {
                button.primary type="submit" name="action" value="add" { "Add course" }
                button.secondary type="submit" name="action" value="reset" { "Reset" }
                button.primary type="submit" name="action" value="save" { "Save to semester" }
            }
            table.table {
                thead {
                    tr {
                        th { "Course" }
                        th { "Name" }
                        th { "Credits" }
                        th { "Score range" }
                        th { "" }
                    }
                }
                tbody {
                    @for (index, row) in session.rows.iter().enumerate() {
                        tr {
                            td { "Course " (index + 1) }
                            td {
                                input.course-name type="text"
                                    name=(format!("name-{}", row.id))
                                    value=(row.name)
                                    placeholder="Course name (optional)";
                            }
                            td {
                                select name=(format!("credits-{}", row.id)) {
                                    option value="" selected[row.credits.is_none()] { "Credits" }
                                    @for credits in CREDIT_CHOICES {
                                        option value=(credits)
                                            selected[row.credits == Some(credits)] {
                                            (credits)
                                        }
                                    }
                                }
                            }
                            td {
                                select name=(format!("score-{}", row.id)) {
                                    option value="" selected[row.score_range.is_none()] { "Score range" }
                                    @for range in ScoreRange::all() {
                                        option value=(range.as_str())
                                            selected[row.score_range == Some(range)] {
                                            (range.as_str())
                                        }
                                    }
                                }
                            }
                            td {
                                @if remove_disabled {
                                    button.secondary type="submit" name="action"
                                        value=(format!("remove-{}", row.id)) disabled { "Remove" }
                                } @else {
                                    button.secondary type="submit" name="action"
                                        value=(format!("remove-{}", row.id)) { "Remove" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn projection_panel(session: &SessionState) -> Markup {
    let cumulative = session.cumulative_totals();
    html! {
        aside.side-panel {
            div.sidebar-title { "Projection" }
            div.target-input {
                label.target-label for="target" { "Target GPA" }
                input #target type="number" name="target"
                    min="0" max="4.3" step="0.1"
                    value=(session.target_gpa);
            }
            table.table.compact {
                thead {
                    tr {
                        th { "Credits" }
                        th { "Required GPA" }
                    }
                }
                tbody {
                    @for bucket in CREDIT_BUCKETS {
                        tr {
                            td { (bucket) }
                            td {
                                @match required_for(bucket, &cumulative, session.target_gpa) {
                                    Requirement::Gpa(required) => {
                                        (format!("{required:.2}"))
                                    }
                                    Requirement::Unattainable => {
                                        "unattainable"
                                    }
                                }
                            }
                        }
                    }
                }
            }
            div.note { "Estimated from saved semesters only" }
        }
    }
}
