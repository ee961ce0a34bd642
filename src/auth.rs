//! Session tokens and the account flows that need them.
//!
//! Tokens live in [`LocalStorage`] under the same keys the web client used,
//! and are read once per command and handed to whatever needs them.

use crate::api::{ApiClient, TokenPair};
use crate::error::{AuthError, StorageError};
use crate::storage::LocalStorage;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl Credentials {
    pub fn load(storage: &LocalStorage) -> Self {
        let get = |key: &str| {
            storage
                .get_item(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            access: get(ACCESS_TOKEN_KEY),
            refresh: get(REFRESH_TOKEN_KEY),
        }
    }

    pub fn store(storage: &mut LocalStorage, tokens: &TokenPair) -> Result<(), StorageError> {
        storage.set_item(ACCESS_TOKEN_KEY, tokens.access.as_str())?;
        storage.set_item(REFRESH_TOKEN_KEY, tokens.refresh.as_str())
    }

    pub fn clear(storage: &mut LocalStorage) -> Result<(), StorageError> {
        storage.remove_item(ACCESS_TOKEN_KEY)?;
        storage.remove_item(REFRESH_TOKEN_KEY)
    }
}

/// Logs in and remembers both tokens.
pub async fn login(
    client: &ApiClient,
    storage: &mut LocalStorage,
    username: &str,
    password: &str,
) -> Result<TokenPair, AuthError> {
    let tokens = client.login(username, password).await?;
    Credentials::store(storage, &tokens)?;
    tracing::info!(username, "logged in");
    Ok(tokens)
}

pub fn logout(storage: &mut LocalStorage) -> Result<(), AuthError> {
    Credentials::clear(storage)?;
    tracing::info!("logged out");
    Ok(())
}

/// Trades the stored refresh token for a new access token and stores it.
pub async fn refresh_access(client: &ApiClient, storage: &mut LocalStorage) -> Result<String, AuthError> {
    let refresh = Credentials::load(storage)
        .refresh
        .ok_or(AuthError::NotLoggedIn)?;
    let access = client.refresh(&refresh).await?;
    storage.set_item(ACCESS_TOKEN_KEY, access.as_str())?;
    tracing::debug!("access token refreshed");
    Ok(access)
}

/// Asks the server to send a reset code for `username`.
pub async fn request_password_reset(
    client: &ApiClient,
    storage: &mut LocalStorage,
    username: &str,
) -> Result<(), AuthError> {
    let access = refresh_access(client, storage).await?;
    client.request_password_reset(&access, username).await?;
    Ok(())
}

pub async fn confirm_password_reset(
    client: &ApiClient,
    storage: &mut LocalStorage,
    reset_token: &str,
    password: &str,
) -> Result<(), AuthError> {
    let access = refresh_access(client, storage).await?;
    client
        .confirm_password_reset(&access, reset_token, password)
        .await?;
    Ok(())
}
