// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};
use tk_core::{ItemId, Priority};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse().map_err(|e: tk_core::Error| e.to_string())
}

fn parse_item_id(s: &str) -> Result<ItemId, String> {
    s.parse().map_err(|e: tk_core::Error| e.to_string())
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "tk")]
#[command(version)]
#[command(about = "Personal task list backed by a hosted database")]
#[command(after_help = "\
Examples:
  tk configure https://abc.example.co <anon-key>   Point tk at a backend
  tk signup me@example.com --password hunter22     Create an account
  tk add \"Buy milk\" -c Shopping -p high            Add a task
  tk list --high                                   Show high-priority tasks")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save the backend URL and API key
    Configure {
        /// Backend base URL
        url: String,

        /// Public (anon) API key
        anon_key: String,

        /// Name of the tasks table
        #[arg(long, default_value = "tasks")]
        table: String,
    },

    /// Create an account and sign in
    Signup {
        email: String,

        #[arg(long, env = "TK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in to an existing account
    Login {
        email: String,

        #[arg(long, env = "TK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List your tasks, newest first
    #[command(alias = "ls")]
    List {
        /// Only high-priority tasks
        #[arg(long, conflicts_with = "priority")]
        high: bool,

        /// Only tasks of this priority
        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,

        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Add a task
    Add {
        #[arg(value_parser = non_empty_string)]
        title: String,

        #[arg(short, long, value_parser = non_empty_string)]
        category: String,

        #[arg(short, long, value_parser = parse_priority, default_value = "Medium")]
        priority: Priority,
    },

    /// Change a task's title, category or priority
    Edit {
        #[arg(value_parser = parse_item_id)]
        id: ItemId,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },

    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
