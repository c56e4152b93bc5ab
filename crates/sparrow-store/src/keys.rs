//! Storage keys and the small flags that live beside the project snapshot.

use crate::error::Result;
use crate::kv::KeyValueStore;

/// Prefix for every key Sparrow owns.
pub const PRODUCT: &str = "sparrow";

/// `"true"` once the user has accepted the terms.
pub const TERMS_ACCEPTED_KEY: &str = "sparrow_terms_accepted";

/// Full JSON snapshot of the active project.
pub const CURRENT_PROJECT_KEY: &str = "sparrow_current_project";

/// OAuth authorization code handed over from the callback, consumed once.
pub const OAUTH_CODE_KEY: &str = "netlify_oauth_code";

pub fn terms_accepted<K: KeyValueStore + ?Sized>(kv: &K) -> Result<bool> {
    Ok(kv.get(TERMS_ACCEPTED_KEY)?.is_some_and(|v| !v.is_empty()))
}

pub fn accept_terms<K: KeyValueStore + ?Sized>(kv: &mut K) -> Result<()> {
    kv.set(TERMS_ACCEPTED_KEY, "true")
}
