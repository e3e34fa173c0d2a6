//! `bento login`, `bento logout`, and `bento whoami`.

use bento_client::{AuthApi, ClientError, Transport};

pub fn login(transport: &Transport, username: &str, password: &str) -> Result<(), ClientError> {
    let auth = AuthApi::new(transport);
    let record = auth.login(username, password)?;

    // Cache the profile beside the tokens; login still succeeds if this
    // lookup fails (the server may restrict it for some roles).
    if let Err(e) = auth.fetch_profile() {
        eprintln!("warning: could not fetch profile: {}", e);
    }

    println!("logged in as {}", username);
    if !record.can_refresh() {
        println!("note: no refresh token issued; the session ends when the access token expires");
    }
    Ok(())
}

pub fn logout(transport: &Transport) -> Result<(), ClientError> {
    AuthApi::new(transport).logout()?;
    println!("logged out");
    Ok(())
}

pub fn whoami(transport: &Transport, refresh: bool) -> Result<(), ClientError> {
    let auth = AuthApi::new(transport);
    let profile = if refresh {
        auth.fetch_profile()?
    } else {
        match auth.cached_profile()? {
            Some(profile) => profile,
            None => auth.fetch_profile()?,
        }
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&profile).unwrap_or_else(|_| profile.to_string())
    );
    Ok(())
}
