//! Lazily created, idempotently disposed native font resource

use crate::config::CreationFailurePolicy;
use crate::font::{lock, FontStyle, NativeFontId};
use crate::traits::NativeFontEngine;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
    Unset,
    Created(NativeFontId),
    /// Creation failed under [`CreationFailurePolicy::CacheFailure`]
    Failed,
}

/// Owner of exactly one native font object.
///
/// The object is created on the first [`acquire`](Self::acquire) and released
/// by [`dispose`](Self::dispose) or when the handle is dropped. The state
/// lock serializes creation, so concurrent first calls create one object.
pub struct NativeFontHandle {
    engine: Arc<dyn NativeFontEngine>,
    native_name: String,
    style: FontStyle,
    policy: CreationFailurePolicy,
    state: Mutex<HandleState>,
}

impl NativeFontHandle {
    pub fn new(
        engine: Arc<dyn NativeFontEngine>,
        native_name: &str,
        style: FontStyle,
        policy: CreationFailurePolicy,
    ) -> Self {
        Self {
            engine,
            native_name: native_name.to_string(),
            style,
            policy,
            state: Mutex::new(HandleState::Unset),
        }
    }

    /// Returns the native font, creating it if needed
    pub fn acquire(&self) -> Option<NativeFontId> {
        let mut state = lock(&self.state);
        match *state {
            HandleState::Created(font) => return Some(font),
            HandleState::Failed => return None,
            HandleState::Unset => {}
        }

        match self.engine.create_font(&self.native_name, self.style) {
            Ok(font) => {
                tracing::debug!(
                    "Created native font {} ({}) as {}",
                    self.native_name,
                    self.style,
                    font.get()
                );
                *state = HandleState::Created(font);
                Some(font)
            }
            Err(e) => {
                tracing::warn!("Native font creation failed: {}", e);
                if self.policy == CreationFailurePolicy::CacheFailure {
                    *state = HandleState::Failed;
                }
                None
            }
        }
    }

    /// Releases the native font if one is held. Safe to call repeatedly;
    /// the next [`acquire`](Self::acquire) creates a fresh object.
    pub fn dispose(&self) {
        let previous = std::mem::replace(&mut *lock(&self.state), HandleState::Unset);
        if let HandleState::Created(font) = previous {
            tracing::debug!("Disposing native font {} ({})", self.native_name, font.get());
            self.engine.dispose_font(font);
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(*lock(&self.state), HandleState::Created(_))
    }

    /// True while a creation failure is being remembered
    pub fn is_failed(&self) -> bool {
        matches!(*lock(&self.state), HandleState::Failed)
    }

    pub fn native_name(&self) -> &str {
        &self.native_name
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }
}

impl Drop for NativeFontHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for NativeFontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFontHandle")
            .field("native_name", &self.native_name)
            .field("style", &self.style)
            .field("state", &*lock(&self.state))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_engine::DummyEngine;
    use std::thread;

    fn handle(engine: &Arc<DummyEngine>, name: &str, policy: CreationFailurePolicy) -> NativeFontHandle {
        NativeFontHandle::new(engine.clone(), name, FontStyle::PLAIN, policy)
    }

    #[test]
    fn test_lazy_creation() {
        let engine = Arc::new(DummyEngine::new());
        let handle = handle(&engine, "Menlo-Regular", CreationFailurePolicy::Retry);
        assert!(!handle.is_created());
        assert_eq!(engine.creation_count("Menlo-Regular"), 0);

        let first = handle.acquire();
        let second = handle.acquire();
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(engine.creation_count("Menlo-Regular"), 1);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let engine = Arc::new(DummyEngine::new());
        let handle = handle(&engine, "Menlo-Regular", CreationFailurePolicy::Retry);
        let font = handle.acquire().unwrap();

        handle.dispose();
        handle.dispose();
        assert_eq!(engine.disposed_fonts(), vec![font]);
        assert_eq!(engine.creation_count("Menlo-Regular"), 1);
        assert!(!handle.is_created());
    }

    #[test]
    fn test_dispose_without_creation_is_noop() {
        let engine = Arc::new(DummyEngine::new());
        let handle = handle(&engine, "Menlo-Regular", CreationFailurePolicy::Retry);
        handle.dispose();
        drop(handle);
        assert!(engine.disposed_fonts().is_empty());
        assert_eq!(engine.creation_count("Menlo-Regular"), 0);
    }

    #[test]
    fn test_reacquire_after_dispose_recreates() {
        let engine = Arc::new(DummyEngine::new());
        let handle = handle(&engine, "Menlo-Regular", CreationFailurePolicy::Retry);
        let first = handle.acquire().unwrap();
        handle.dispose();
        let second = handle.acquire().unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.creation_count("Menlo-Regular"), 2);
        assert_eq!(engine.live_font_count(), 1);
    }

    #[test]
    fn test_drop_disposes_once() {
        let engine = Arc::new(DummyEngine::new());
        let handle = handle(&engine, "Menlo-Regular", CreationFailurePolicy::Retry);
        let font = handle.acquire().unwrap();
        handle.dispose();
        let again = handle.acquire().unwrap();
        drop(handle);
        assert_eq!(engine.disposed_fonts(), vec![font, again]);
        assert_eq!(engine.live_font_count(), 0);
    }

    #[test]
    fn test_concurrent_first_access_creates_once() {
        let engine = Arc::new(DummyEngine::new().with_creation_delay_ms(20));
        let handle = Arc::new(handle(&engine, "Menlo-Regular", CreationFailurePolicy::Retry));

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || handle.acquire())
            })
            .collect();
        let fonts: Vec<_> = threads.into_iter().map(|t| t.join().unwrap()).collect();

        assert_eq!(engine.creation_count("Menlo-Regular"), 1);
        assert!(fonts.iter().all(|f| f.is_some() && *f == fonts[0]));
    }

    #[test]
    fn test_retry_policy_retries_every_access() {
        let engine = Arc::new(DummyEngine::new().with_failing_font("Missing"));
        let handle = handle(&engine, "Missing", CreationFailurePolicy::Retry);

        assert!(handle.acquire().is_none());
        assert!(handle.acquire().is_none());
        assert_eq!(engine.creation_attempts("Missing"), 2);

        engine.set_failing("Missing", false);
        assert!(handle.acquire().is_some());
        assert_eq!(engine.creation_attempts("Missing"), 3);
    }

    #[test]
    fn test_cache_failure_policy_stops_retrying_until_disposed() {
        let engine = Arc::new(DummyEngine::new().with_failing_font("Missing"));
        let handle = handle(&engine, "Missing", CreationFailurePolicy::CacheFailure);

        assert!(handle.acquire().is_none());
        assert!(handle.is_failed());
        engine.set_failing("Missing", false);
        assert!(handle.acquire().is_none());
        assert_eq!(engine.creation_attempts("Missing"), 1);

        handle.dispose();
        assert!(!handle.is_failed());
        assert!(handle.acquire().is_some());
        assert_eq!(engine.creation_attempts("Missing"), 2);
    }
}
