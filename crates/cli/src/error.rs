// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All errors a `tk` command can end with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] tk_client::ConfigError),

    #[error(transparent)]
    Auth(#[from] tk_client::AuthError),

    #[error(transparent)]
    Store(#[from] tk_client::StoreError),

    #[error("{}", .0.message())]
    Remote(#[from] tk_client::RemoteError),

    #[error(transparent)]
    Validation(#[from] tk_core::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for `tk` commands.
pub type Result<T> = std::result::Result<T, Error>;
