//! Scoped ownership of subscriptions and teardown actions.
//!
//! Widgets collect every listener they register during initialization in a
//! [`Disposables`]. Disposing it (explicitly, or by dropping it) releases the
//! listeners and runs any teardown actions, newest first.

use std::fmt;

use webdom::Subscription;

/// A deferred teardown action.
pub type Teardown = Box<dyn FnOnce() + Send + Sync>;

/// Resources owned by a widget until it is destroyed.
#[derive(Default)]
pub struct Disposables {
    subscriptions: Vec<Subscription>,
    teardowns: Vec<Teardown>,
    disposed: bool,
}

impl Disposables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a subscription. After disposal the subscription is
    /// released immediately.
    pub fn own(&mut self, subscription: Subscription) {
        if self.disposed {
            subscription.remove();
            return;
        }
        self.subscriptions.push(subscription);
    }

    /// Register an action to run at teardown. After disposal it runs
    /// immediately.
    pub fn on_teardown<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        if self.disposed {
            action();
            return;
        }
        self.teardowns.push(Box::new(action));
    }

    /// Number of owned subscriptions and pending teardown actions.
    pub fn len(&self) -> usize {
        self.subscriptions.len() + self.teardowns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release everything. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.disposed = true;
        while let Some(subscription) = self.subscriptions.pop() {
            subscription.remove();
        }
        while let Some(action) = self.teardowns.pop() {
            action();
        }
    }
}

impl Drop for Disposables {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Disposables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposables")
            .field("subscriptions", &self.subscriptions.len())
            .field("teardowns", &self.teardowns.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}
