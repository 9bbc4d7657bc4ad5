//! The visitor's account selection and per-account data.

use eecol_core::{Account, AccountId, SessionAccount};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::events::{AccountEvent, AccountEvents};
use super::storage::{Storage, StorageError};

/// Persistent key holding the selected account id.
pub const SELECTED_ACCOUNT_KEY: &str = "selectedAccount";

/// Session key holding the sign-in result.
pub const ACCOUNT_KEY: &str = "account";

/// Errors raised by account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored value did not decode.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A value stored for the selected account.
///
/// Structured values are kept as JSON text; plain strings are kept as-is.
/// Reading back yields `Json` whenever the stored text parses as JSON, so a
/// string like `"123"` comes back as the number 123.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserData {
    Json(Value),
    Text(String),
}

impl UserData {
    fn to_stored(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Json(Value::String(s)) | Self::Text(s) => Ok(s.clone()),
            Self::Json(value) => serde_json::to_string(value),
        }
    }

    fn from_stored(stored: String) -> Self {
        serde_json::from_str(&stored).map_or(Self::Text(stored), Self::Json)
    }
}

/// Account state of one visitor.
///
/// `local` is the persistent area (selected account, per-account data),
/// `session` holds the sign-in result.
#[derive(Debug, Clone)]
pub struct AccountSession<L, S> {
    local: L,
    session: S,
    events: AccountEvents,
}

impl<L: Storage, S: Storage> AccountSession<L, S> {
    #[must_use]
    pub const fn new(local: L, session: S, events: AccountEvents) -> Self {
        Self {
            local,
            session,
            events,
        }
    }

    /// Remember `account_id` as the selected account and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    #[instrument(skip(self))]
    pub async fn set_selected_account(&self, account_id: &AccountId) -> Result<(), AccountError> {
        self.local
            .set_item(SELECTED_ACCOUNT_KEY, account_id.as_str())
            .await?;
        self.events.emit(&AccountEvent::AccountChanged {
            account_id: account_id.clone(),
        });
        Ok(())
    }

    /// The stored selected account id, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub async fn selected_account_id(&self) -> Result<Option<AccountId>, AccountError> {
        Ok(self
            .local
            .get_item(SELECTED_ACCOUNT_KEY)
            .await?
            .filter(|id| !id.is_empty())
            .map(AccountId::from))
    }

    /// The selected account of a signed-in visitor.
    ///
    /// When the stored selection is not one of the visitor's accounts, the
    /// first account is selected (with one notification) and returned.
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure or an undecodable session object.
    #[instrument(skip(self))]
    pub async fn get_selected_account(&self) -> Result<Option<Account>, AccountError> {
        let Some(user) = self.user_account().await? else {
            return Ok(None);
        };
        if !user.is_signed_in() {
            return Ok(None);
        }

        let selected = self.selected_account_id().await?;
        if let Some(account) = selected
            .as_ref()
            .and_then(|id| user.accounts_by_id.get(id))
        {
            return Ok(Some(account.clone()));
        }

        let Some(first) = user.accounts.into_iter().next() else {
            return Ok(None);
        };
        debug!(account_id = %first.account_id, "Selecting first account");
        self.set_selected_account(&first.account_id).await?;
        Ok(Some(first))
    }

    /// The sign-in result stored in the session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure or an undecodable session object.
    pub async fn user_account(&self) -> Result<Option<SessionAccount>, AccountError> {
        match self.session.get_item(ACCOUNT_KEY).await? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    /// Store the sign-in result.
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure.
    pub async fn set_user_account(&self, account: &SessionAccount) -> Result<(), AccountError> {
        let raw = serde_json::to_string(account)?;
        self.session.set_item(ACCOUNT_KEY, &raw).await?;
        Ok(())
    }

    /// Store `value` under `key` for the selected account.
    ///
    /// Returns `false`, without storing, when no account is selected.
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure.
    #[instrument(skip(self, value))]
    pub async fn store_user_data(&self, key: &str, value: &UserData) -> Result<bool, AccountError> {
        let Some(id) = self.selected_account_id().await? else {
            warn!("store_user_data: no account selected");
            return Ok(false);
        };

        self.local
            .set_item(&scoped_key(&id, key), &value.to_stored()?)
            .await?;
        Ok(true)
    }

    /// The value stored under `key` for the selected account.
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure.
    #[instrument(skip(self))]
    pub async fn retrieve_user_data(&self, key: &str) -> Result<Option<UserData>, AccountError> {
        let Some(id) = self.selected_account_id().await? else {
            warn!("retrieve_user_data: no account selected");
            return Ok(None);
        };

        Ok(self
            .local
            .get_item(&scoped_key(&id, key))
            .await?
            .filter(|stored| !stored.is_empty())
            .map(UserData::from_stored))
    }

    /// Ask the sign-in flow to start.
    pub fn sign_in(&self) {
        self.events.emit(&AccountEvent::LoginRequested);
    }
}

fn scoped_key(account_id: &AccountId, key: &str) -> String {
    format!("account/{account_id}/{key}")
}
