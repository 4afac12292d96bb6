use std::sync::Arc;

use tokio::sync::watch;

/// Observable value shared between the parts of the client
///
/// Cloning yields another handle to the same value.
#[derive(Debug)]
pub struct Store<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the value and wake subscribers
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Modify the value in place and wake subscribers
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.sender.send_modify(f);
    }

    /// Read the value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// Receiver that observes every later change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone> Store<T> {
    #[must_use]
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let store = Store::new(String::from("Tickets"));
        let mut rx = store.subscribe();

        store.set("Admin".to_string());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "Admin");

        let handle = store.clone();
        handle.update(|title| title.push_str(" / Users"));
        rx.changed().await.unwrap();
        assert_eq!(store.get(), "Admin / Users");
    }

    #[test]
    fn test_set_without_subscribers() {
        let store: Store<u32> = Store::default();
        store.set(3);
        assert_eq!(store.with(|v| *v + 1), 4);
    }
}
