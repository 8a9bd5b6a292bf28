//! Signed-in session state shared by every consumer of one client.
//!
//! A single [`SessionContext`] is injected wherever the current user matters.
//! Consumers either read [`SessionContext::current`] or register an observer with
//! [`SessionContext::observe`]; the observer receives the current value first and
//! every change after it, until its [`Subscription`] is dropped.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::entities::User;

#[derive(Clone)]
pub struct SessionContext {
    tx: Arc<watch::Sender<Option<User>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn with_user(user: User) -> Self {
        let context = Self::new();
        context.sign_in(user);
        context
    }

    pub fn current(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    pub fn sign_in(&self, user: User) {
        debug!(uid = %user.uid, "session signed in");
        self.tx.send_replace(Some(user));
    }

    pub fn sign_out(&self) {
        debug!("session signed out");
        self.tx.send_replace(None);
    }

    /// Raw change stream; the current value counts as unseen.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        let mut rx = self.tx.subscribe();
        rx.mark_changed();
        rx
    }

    /// Runs `callback` with the current user and again after every change.
    ///
    /// Notifications are delivered in order; a callback finishes before the next
    /// one starts. Rapid changes may be coalesced into the latest value.
    pub fn observe<F, Fut>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(Option<User>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut rx = self.subscribe();
        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let user = rx.borrow_and_update().clone();
                callback(user).await;
            }
        });
        Subscription { handle }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle of an [`SessionContext::observe`] registration. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
