//! Command handlers, one module per top-level subcommand.

pub mod config_cmd;
mod profile;
mod ranking;
mod search;
mod sites;
mod util;

use impact_core::Backend;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a backend-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    backend: &Backend,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sites(args) => sites::handle(backend, args, global).await,
        Command::Ranking(args) => ranking::handle(backend, args, global).await,
        Command::Profile(args) => profile::handle(backend, args, global).await,
        Command::Search(args) => search::handle(backend, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
