// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens here, so every request fails fast with a connection error.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Scratch home for one test: config file and session file live inside it.
pub struct Env {
    pub dir: TempDir,
}

impl Env {
    /// No config file at all.
    pub fn empty() -> Self {
        Env {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Configured against a backend that cannot be reached.
    pub fn configured() -> Self {
        let env = Env::empty();
        let config = format!(
            "url = \"{}\"\nanon_key = \"test-key\"\nsession_file = \"{}\"\n",
            UNREACHABLE_URL,
            env.session_path().display()
        );
        std::fs::write(env.config_path(), config).unwrap();
        env
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    /// Persist a session that is not due for refresh.
    pub fn write_session(&self, email: &str) {
        let expires_at = chrono::Utc::now() + chrono::Duration::hours(1);
        let session = serde_json::json!({
            "access_token": "access",
            "refresh_token": "refresh",
            "expires_at": expires_at,
            "user": { "id": "user-1", "email": email },
        });
        std::fs::write(self.session_path(), session.to_string()).unwrap();
    }

    /// `tk` with its environment pinned to this scratch directory.
    pub fn tk(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("tk");
        cmd.env("TK_CONFIG", self.config_path())
            .env_remove("TK_URL")
            .env_remove("TK_ANON_KEY")
            .env_remove("TK_PASSWORD")
            .env_remove("RUST_LOG");
        cmd
    }
}
