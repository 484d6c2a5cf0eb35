//! Login, registration, and logout.

use anyhow::{Context, Result};
use taskdeck_core::api::{ApiClient, Credentials, Registration};
use taskdeck_core::session::Session;

pub async fn login(api: &ApiClient, session: &mut Session, credentials: Credentials) -> Result<()> {
    let token = api.login(&credentials).await?;
    session.set_token(&token).context("save session token")?;
    println!("Logged in as {}.", credentials.username);
    Ok(())
}

pub async fn register(api: &ApiClient, registration: Registration) -> Result<()> {
    api.register(&registration).await?;
    println!("Registration successful! Please login.");
    Ok(())
}

pub fn logout(session: &mut Session) -> Result<()> {
    let was_authenticated = session.is_authenticated();
    session.clear().context("clear session token")?;
    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
