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

use clap::Parser;

use crate::cmd::check::check_state;
use crate::cmd::export::export_state;
use crate::error::Fallible;
use crate::server::server::start_server;
use crate::storage::state_file_path;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Serve the calculator UI in the browser.
    Serve {
        /// Optional path to the state file.
        file: Option<String>,
        /// Port to serve on.
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Validate the state file.
    Check {
        /// Optional path to the state file.
        file: Option<String>,
    },
    /// Print the state and derived values as JSON.
    Export {
        /// Optional path to the state file.
        file: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve { file, port } => start_server(state_file_path(file), port).await,
        Command::Check { file } => check_state(file),
        Command::Export { file } => export_state(file),
    }
}
