//! Owned view state and the weak handles async work reports back through.
//!
//! A view owns its [`ViewCell`]. Submissions hold only a [`ViewHandle`]; when
//! the view has been dropped by the time a result arrives, the update is
//! skipped and the result discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::FormState;

/// Input fields plus the form state rendered next to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView<F> {
    /// Values as typed.
    pub fields: F,
    /// Errors, notice, and pending flag.
    pub state: FormState,
}

impl<F> FormView<F> {
    /// View with `fields` and a clean state.
    #[must_use]
    pub fn new(fields: F) -> Self {
        Self {
            fields,
            state: FormState::default(),
        }
    }
}

/// Owning cell for view state.
#[derive(Debug, Default)]
pub struct ViewCell<S> {
    state: Arc<Mutex<S>>,
}

fn lock<S>(state: &Mutex<S>) -> MutexGuard<'_, S> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S> ViewCell<S> {
    /// Cell owning `state`.
    #[must_use]
    pub fn new(state: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Weak handle for async work.
    #[must_use]
    pub fn handle(&self) -> ViewHandle<S> {
        ViewHandle {
            state: Arc::downgrade(&self.state),
        }
    }

    /// Mutate the state.
    pub fn update<R>(&self, apply: impl FnOnce(&mut S) -> R) -> R {
        apply(&mut *lock(&self.state))
    }

    /// Read the state.
    #[must_use]
    pub fn read<R>(&self, inspect: impl FnOnce(&S) -> R) -> R {
        inspect(&*lock(&self.state))
    }
}

impl<S: Clone> ViewCell<S> {
    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> S {
        self.read(S::clone)
    }
}

/// Non-owning handle to a view's state.
#[derive(Debug)]
pub struct ViewHandle<S> {
    state: Weak<Mutex<S>>,
}

impl<S> Clone for ViewHandle<S> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<S> ViewHandle<S> {
    /// Apply `apply` if the view still exists. Returns `None` otherwise.
    pub fn update<R>(&self, apply: impl FnOnce(&mut S) -> R) -> Option<R> {
        let state = self.state.upgrade()?;
        let mut guard = lock(&state);
        Some(apply(&mut *guard))
    }

    /// Whether the owning view is still alive.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state.strong_count() > 0
    }
}
