//! RAII guard that closes the search session when dropped.

use std::ops::{Deref, DerefMut};

use super::SearchSession;

/// Owns the run's single search session and closes it on every exit path,
/// including early returns and unwinding.
pub struct SessionGuard<S: SearchSession> {
    session: S,
}

impl<S: SearchSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }
}

impl<S: SearchSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: SearchSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: SearchSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.close();
        tracing::debug!("search session closed");
    }
}
