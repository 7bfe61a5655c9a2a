// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tk_core::{validate_credentials, Session};

use super::App;
use crate::error::Result;

pub async fn signup(email: &str, password: &str) -> Result<()> {
    validate_credentials(email, password)?;
    let app = App::open().await?;
    let session = app.sessions.sign_up(email, password).await?;
    print_signed_in(&session);
    Ok(())
}

pub async fn login(email: &str, password: &str) -> Result<()> {
    validate_credentials(email, password)?;
    let app = App::open().await?;
    let session = app.sessions.sign_in(email, password).await?;
    print_signed_in(&session);
    Ok(())
}

/// Sign out and drop the local list even if the backend could not be told.
pub async fn logout() -> Result<()> {
    let app = App::open().await?;
    let result = app.sessions.sign_out().await;
    app.store.clear();
    result?;
    println!("Signed out.");
    Ok(())
}

pub async fn whoami() -> Result<()> {
    let app = App::open().await?;
    match app.sessions.session() {
        Session::Authenticated(user) => println!("{} ({})", user.email, user.id),
        Session::Unauthenticated => println!("Not signed in."),
    }
    Ok(())
}

fn print_signed_in(session: &Session) {
    if let Some(user) = session.user() {
        println!("Signed in as {}", user.email);
    }
}
