//! Customer accounts and catalog entitlements.
//!
//! A signed-in user may act for several customer accounts. The sign-in flow
//! stores a [`SessionAccount`] in session storage; the storefront reads it
//! to resolve the selected account and to restrict which categories the
//! account may browse.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::category::CategoryIndex;
use super::id::AccountId;
use super::product::Product;

/// Per-account catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Display names of the categories this account may buy from.
    #[serde(rename = "Categories", default)]
    pub categories: Vec<String>,
}

/// A customer account the user can act for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<AccountConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The session object written by the sign-in flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAccount {
    /// Name of the signed-in user. An object without a name is not a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub accounts_by_id: HashMap<AccountId, Account>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionAccount {
    /// Whether this object represents a signed-in user.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

impl Account {
    /// For each product hint, whether any of its categories is allowed.
    ///
    /// Allowed category names are resolved to uids through `index`; names the
    /// taxonomy does not know never match. Accounts without a config may see
    /// everything.
    #[must_use]
    pub fn check_products_in_catalog(&self, hints: &[Product], index: &CategoryIndex) -> Vec<bool> {
        let Some(config) = &self.config else {
            return vec![true; hints.len()];
        };

        let allowed: Vec<&str> = config
            .categories
            .iter()
            .filter_map(|name| index.get_by_name(name))
            .map(|summary| summary.uid.as_str())
            .collect();

        hints
            .iter()
            .map(|hint| {
                allowed
                    .iter()
                    .any(|uid| hint.categories.iter().any(|c| c.as_str() == *uid))
            })
            .collect()
    }

    /// For each category name, whether the account config lists it.
    #[must_use]
    pub fn check_categories_in_catalog<S: AsRef<str>>(&self, categories: &[S]) -> Vec<bool> {
        let Some(config) = &self.config else {
            return vec![true; categories.len()];
        };

        categories
            .iter()
            .map(|name| config.categories.iter().any(|c| c == name.as_ref()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::category::Category;
    use serde_json::json;

    fn index() -> CategoryIndex {
        let roots: Vec<Category> = serde_json::from_value(json!([
            { "uid": "A", "url_key": "wire", "name": "Wire" },
            { "uid": "B", "url_key": "lighting", "name": "Lighting" }
        ]))
        .unwrap();
        CategoryIndex::build(&roots)
    }

    fn product(categories: &[&str]) -> Product {
        serde_json::from_value(json!({ "sku": "1", "categories": categories })).unwrap()
    }

    fn account(config: Option<&[&str]>) -> Account {
        let mut value = json!({ "accountId": "1001", "name": "Acme" });
        if let Some(categories) = config {
            value["config"] = json!({ "Categories": categories });
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_products_without_config_are_allowed() {
        let hints = [product(&["A"]), product(&[])];
        assert_eq!(
            account(None).check_products_in_catalog(&hints, &index()),
            vec![true, true]
        );
    }

    #[test]
    fn test_products_filtered_by_allowed_names() {
        let hints = [product(&["A"]), product(&["B"]), product(&["Z", "A"])];
        let result = account(Some(&["Wire", "Unknown"][..])).check_products_in_catalog(&hints, &index());
        assert_eq!(result, vec![true, false, true]);
    }

    #[test]
    fn test_categories_in_catalog() {
        let acct = account(Some(&["Wire"][..]));
        assert_eq!(
            acct.check_categories_in_catalog(&["Wire", "Lighting"]),
            vec![true, false]
        );
        assert_eq!(
            account(None).check_categories_in_catalog(&["Wire"]),
            vec![true]
        );
    }

    #[test]
    fn test_session_account_decodes_camel_case() {
        let session: SessionAccount = serde_json::from_value(json!({
            "name": "Pat",
            "accounts": [{ "accountId": "1001" }],
            "accountsById": { "1001": { "accountId": "1001" } },
            "token": "opaque"
        }))
        .unwrap();

        assert!(session.is_signed_in());
        assert_eq!(session.accounts.len(), 1);
        assert!(session.accounts_by_id.contains_key("1001"));
        assert_eq!(session.extra.get("token"), Some(&json!("opaque")));
    }

    #[test]
    fn test_session_without_name_is_not_signed_in() {
        let session: SessionAccount = serde_json::from_value(json!({ "accounts": [] })).unwrap();
        assert!(!session.is_signed_in());
    }
}
