//! Row-scoped subscriptions.

/// Handle to a registration that is cancelled when the handle is dropped.
///
/// Controllers hold these for the lifetime of one bind; rebinding to another
/// row or detaching drops them.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps the function that undoes a registration.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Cancels now.
    pub fn cancel(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
