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

use crate::error::Fallible;
use crate::storage::load_state_strict;
use crate::storage::state_file_path;

/// The one deliberately strict entry point: everything else tolerates a
/// broken state file, `check` reports it.
pub fn check_state(file: Option<String>) -> Fallible<()> {
    let path = state_file_path(file);
    let _ = load_state_strict(&path)?;
    println!("ok");
    Ok(())
}
