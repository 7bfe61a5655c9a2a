// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tkrs - command-line front end for the tk task manager.
//!
//! Every command opens the configured backend through [`tk_client`], restores
//! the persisted session, and then drives the session manager or the item
//! store.
//!
//! ```rust,ignore
//! use tkrs::{run, Command};
//!
//! run(Command::Whoami).await?;
//! ```

mod cli;
mod commands;
mod display;
pub mod error;
pub mod logging;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{Error, Result};

use tk_core::Priority;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Configure {
            url,
            anon_key,
            table,
        } => commands::configure::run(url, anon_key, table),
        Command::Signup { email, password } => commands::auth::signup(&email, &password).await,
        Command::Login { email, password } => commands::auth::login(&email, &password).await,
        Command::Logout => commands::auth::logout().await,
        Command::Whoami => commands::auth::whoami().await,
        Command::List {
            high,
            priority,
            output,
        } => {
            let priority = if high { Some(Priority::High) } else { priority };
            commands::tasks::list(priority, output).await
        }
        Command::Add {
            title,
            category,
            priority,
        } => commands::tasks::add(&title, &category, priority).await,
        Command::Edit {
            id,
            title,
            category,
            priority,
        } => commands::tasks::edit(id, title, category, priority).await,
        Command::Rm { id } => commands::tasks::remove(id).await,
    }
}
