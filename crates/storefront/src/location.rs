//! Query string editing for listing pages.
//!
//! Facet filters live in the page's query string. [`PageLocation`] applies
//! the same edits a browser would (`URLSearchParams` semantics) and records
//! each resulting path as a history entry.

use url::form_urlencoded;

/// A page path with its query string and pushed history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    pathname: String,
    search: String,
    history: Vec<String>,
}

impl PageLocation {
    /// Location for `path_and_query`, e.g. `/ca/en/wire?brand=3M`.
    #[must_use]
    pub fn new(path_and_query: &str) -> Self {
        let (pathname, query) = path_and_query
            .split_once('?')
            .unwrap_or((path_and_query, ""));

        Self {
            pathname: pathname.to_string(),
            search: if query.is_empty() {
                String::new()
            } else {
                format!("?{query}")
            },
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// The query string including its leading `?`, or empty.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Pathname plus search.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }

    /// Paths pushed so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// First value of `key`.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.params()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set `key` to `value`, replacing every existing value in place of the
    /// first one and appending when absent.
    pub fn add_query_param(&mut self, key: &str, value: &str) {
        let mut params = self.params();
        let mut found = false;
        params.retain_mut(|(k, v)| {
            if k != key {
                return true;
            }
            if found {
                return false;
            }
            found = true;
            value.clone_into(v);
            true
        });
        if !found {
            params.push((key.to_string(), value.to_string()));
        }

        let query = serialize(&params);
        self.push(format!("{}?{query}", self.pathname));
    }

    /// Remove every value of `key`. The `?` is dropped when nothing remains.
    pub fn remove_query_param(&mut self, key: &str) {
        let mut params = self.params();
        params.retain(|(k, _)| k != key);

        let query = serialize(&params);
        if query.is_empty() {
            self.push(self.pathname.clone());
        } else {
            self.push(format!("{}?{query}", self.pathname));
        }
    }

    /// Drop the whole query string.
    pub fn clear_query_params(&mut self) {
        self.push(self.pathname.clone());
    }

    fn params(&self) -> Vec<(String, String)> {
        form_urlencoded::parse(self.search.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect()
    }

    fn push(&mut self, path: String) {
        let (_, query) = path.split_once('?').unwrap_or((path.as_str(), ""));
        self.search = if query.is_empty() {
            String::new()
        } else {
            format!("?{query}")
        };
        self.history.push(path);
    }
}

fn serialize(params: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}
