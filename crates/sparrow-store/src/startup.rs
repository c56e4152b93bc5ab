//! Handling of the `code` / `error` parameters an OAuth provider appends
//! to the callback URL.

use url::{Url, form_urlencoded};

use crate::error::Result;
use crate::keys::OAUTH_CODE_KEY;
use crate::kv::KeyValueStore;

/// What [`handle_callback`] did with a callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    /// A `code` parameter was stored under the handoff key.
    pub code_stored: bool,
    /// The `error` parameter, if the provider sent one.
    pub error: Option<String>,
    /// The callback ran in a popup that should now close itself. When this
    /// is set the `error` parameter was not inspected.
    pub close_popup: bool,
    /// The URL with its query string stripped.
    pub clean_url: String,
}

/// Store `code`, log `error`, and return the URL with both stripped.
///
/// `url` may be a full URL or a bare query string (`?code=...`). In a popup
/// context the handler stops right after storing the code, mirroring a
/// window that closes itself.
pub fn handle_callback<K: KeyValueStore + ?Sized>(
    url: &str,
    kv: &mut K,
    popup: bool,
) -> Result<CallbackOutcome> {
    let (clean_url, params) = split_query(url);
    let param = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    };

    let mut outcome = CallbackOutcome {
        code_stored: false,
        error: None,
        close_popup: false,
        clean_url,
    };

    if let Some(code) = param("code") {
        kv.set(OAUTH_CODE_KEY, &code)?;
        outcome.code_stored = true;
        if popup {
            outcome.close_popup = true;
            return Ok(outcome);
        }
    }

    if let Some(error) = param("error") {
        tracing::warn!(%error, "OAuth error");
        outcome.error = Some(error);
    }

    Ok(outcome)
}

/// Consume the handed-over OAuth code. A second call returns `None`.
pub fn take_oauth_code<K: KeyValueStore + ?Sized>(kv: &mut K) -> Result<Option<String>> {
    let code = kv.get(OAUTH_CODE_KEY)?;
    if code.is_some() {
        kv.remove(OAUTH_CODE_KEY)?;
    }
    Ok(code)
}

fn split_query(raw: &str) -> (String, Vec<(String, String)>) {
    if let Ok(mut url) = Url::parse(raw) {
        let params = url.query_pairs().into_owned().collect();
        url.set_query(None);
        url.set_fragment(None);
        return (url.into(), params);
    }

    // Relative reference such as `/cb?code=...` or a bare `?code=...`.
    let without_fragment = raw.split_once('#').map_or(raw, |(head, _)| head);
    let (base, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));
    let params = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    (base.to_string(), params)
}
