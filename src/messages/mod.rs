//! Polling subscription for ticket chat messages
//!
//! The loop fetches, delivers, and only then waits for the next interval,
//! so at most one request per subscription is in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::core::{TicketId, TicketMessage};
use crate::error::Result;

/// Where polled messages come from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch_messages(&self, ticket_id: TicketId) -> Result<Vec<TicketMessage>>;
}

#[async_trait]
impl MessageSource for ApiClient {
    async fn fetch_messages(&self, ticket_id: TicketId) -> Result<Vec<TicketMessage>> {
        ApiClient::fetch_messages(self, ticket_id).await
    }
}

/// Handle to a running poll loop; dropping it stops the loop
#[derive(Debug)]
pub struct MessageSubscription {
    ticket_id: TicketId,
    token: CancellationToken,
    armed: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl MessageSubscription {
    /// Stop polling
    ///
    /// Calling this before the first wait has been scheduled still stops
    /// the loop, but is reported since the first fetch may be lost.
    pub fn unsubscribe(&self) {
        if !self.armed.load(Ordering::Acquire) {
            tracing::warn!(
                "Unsubscribing from ticket {} messages before polling started",
                self.ticket_id
            );
        }
        self.token.cancel();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }

    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }
}

impl Drop for MessageSubscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Poll `source` for the messages of `ticket_id` every `interval`
///
/// Fetch errors are logged and polling continues. Must be called from
/// within a tokio runtime.
pub fn subscribe_messages<F>(
    source: Arc<dyn MessageSource>,
    ticket_id: TicketId,
    interval: Duration,
    mut on_messages: F,
) -> MessageSubscription
where
    F: FnMut(Vec<TicketMessage>) + Send + 'static,
{
    let token = CancellationToken::new();
    let armed = Arc::new(AtomicBool::new(false));

    let loop_token = token.clone();
    let loop_armed = Arc::clone(&armed);
    let handle = tokio::spawn(async move {
        loop {
            let fetched = tokio::select! {
                biased;
                () = loop_token.cancelled() => break,
                fetched = source.fetch_messages(ticket_id) => fetched,
            };
            match fetched {
                Ok(messages) => on_messages(messages),
                Err(e) => tracing::warn!("Failed to poll messages of ticket {}: {}", ticket_id, e),
            }

            loop_armed.store(true, Ordering::Release);
            tokio::select! {
                biased;
                () = loop_token.cancelled() => break,
                () = tokio::time::sleep(interval) => {},
            }
        }
        tracing::debug!("Stopped polling messages of ticket {}", ticket_id);
    });

    MessageSubscription {
        ticket_id,
        token,
        armed,
        handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UserRef;
    use crate::error::TicketDeskError;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn message(id: i64) -> TicketMessage {
        TicketMessage {
            id,
            author: UserRef {
                id: 1,
                name: "Operator".into(),
            },
            text: format!("message {id}"),
            created_at: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_unsubscribed() {
        let mut source = MockMessageSource::new();
        source
            .expect_fetch_messages()
            .withf(|id| *id == TicketId(7))
            .returning(|_| Ok(vec![message(1)]));

        let deliveries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&deliveries);
        let subscription = subscribe_messages(
            Arc::new(source),
            TicketId(7),
            Duration::from_secs(5),
            move |messages| {
                assert_eq!(messages.len(), 1);
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(deliveries.load(Ordering::SeqCst), 3);

        subscription.unsubscribe();
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(deliveries.load(Ordering::SeqCst), 3);
        assert!(!subscription.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_do_not_stop_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut source = MockMessageSource::new();
        source.expect_fetch_messages().returning(move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(TicketDeskError::custom("connection reset"))
            } else {
                Ok(vec![message(1), message(2)])
            }
        });

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let _subscription = subscribe_messages(
            Arc::new(source),
            TicketId(1),
            Duration::from_secs(1),
            move |messages| sink.lock().unwrap().push(messages.len()),
        );

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(*received.lock().unwrap(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_before_first_fetch_still_cancels() {
        let mut source = MockMessageSource::new();
        source.expect_fetch_messages().returning(|_| Ok(Vec::new()));

        let deliveries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&deliveries);
        let subscription = subscribe_messages(
            Arc::new(source),
            TicketId(3),
            Duration::from_secs(1),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        subscription.unsubscribe();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(deliveries.load(Ordering::SeqCst), 0);
    }
}
