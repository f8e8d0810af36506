//! Deduplicated engine warnings.
//!
//! Layout runs every frame, so the same soft condition (an unsupported
//! keyword, a word wider than its line) would otherwise be reported on every
//! pass. Each unique `(component, message)` pair is forwarded to
//! [`log::warn!`] once; later repeats are dropped until [`clear_warnings`].

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a soft condition (logged once per unique message).
///
/// # Example
/// ```
/// tidal_common::warning::warn_once("text", "word wider than line");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_log = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_log {
        log::warn!(target: "tidal", "[{component}] {message}");
    }
}

/// Returns `true` if the given warning has already been emitted.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Forget all recorded warnings (call when a new scene is loaded).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        warn_once("test", "recorded once");
        assert!(was_warned("test", "recorded once"));
        assert!(!was_warned("test", "never emitted"));
    }
}
