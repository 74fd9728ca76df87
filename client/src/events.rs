//! Event consumption protocol.
//!
//! The node holds an event cursor. `wait_next` long-polls until an event is
//! available and keeps returning that same event until `handled`
//! acknowledges it. A caller that polls again before acknowledging may see
//! the event redelivered or block forever, so [`EventLoop`] refuses to.
//!
//! Delivery is at-least-once: a consumer that dies between receiving an
//! event and acknowledging it will see it again.

use std::future::Future;
use std::time::Duration;

use api::http::{EventDto, OkResponse};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::options::RequestOptions;
use crate::NodeClient;

/// Where the caller stands in the deliver/acknowledge cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventState {
    /// Free to poll.
    #[default]
    Idle,
    /// A poll is in flight.
    AwaitingEvent,
    /// Holding one unacknowledged event.
    EventDelivered,
}

/// Caller-side guard over [`NodeClient::events_wait_next`] and
/// [`NodeClient::events_handled`].
pub struct EventLoop<'a> {
    client: &'a NodeClient,
    state: EventState,
}

impl<'a> EventLoop<'a> {
    /// Starts idle.
    pub fn new(client: &'a NodeClient) -> Self { Self { client, state: EventState::Idle } }

    /// Current state.
    pub fn state(&self) -> EventState { self.state }

    /// Waits for the next event.
    ///
    /// Fails with [`Error::ProtocolViolation`], without any I/O, while a
    /// previously delivered event is unacknowledged. A failed or cancelled
    /// poll returns to [`EventState::Idle`]; nothing was consumed, so it is
    /// safe to poll again.
    pub async fn next(&mut self, options: &RequestOptions) -> Result<EventDto> {
        if self.state == EventState::EventDelivered {
            return Err(Error::ProtocolViolation(
                "previous event has not been acknowledged".to_string(),
            ));
        }

        self.state = EventState::AwaitingEvent;
        match self.client.events_wait_next(options).await {
            Ok(event) => {
                tracing::debug!(kind = event.kind(), "event delivered");
                self.state = EventState::EventDelivered;
                Ok(event)
            }
            Err(e) => {
                self.state = EventState::Idle;
                Err(e)
            }
        }
    }

    /// Acknowledges the delivered event. On failure the event stays
    /// unacknowledged and `ack` may be retried.
    pub async fn ack(&mut self, options: &RequestOptions) -> Result<OkResponse> {
        let resp = self.client.events_handled(options).await?;
        self.state = EventState::Idle;
        Ok(resp)
    }

    /// Delivers events to `handler` and acknowledges each one after the
    /// handler succeeds, until `limit` events were handled or `shutdown` is
    /// cancelled.
    ///
    /// Each poll is bounded by `per_poll`. A poll that expires is simply
    /// reissued; one cut short by `shutdown` ends the loop. A handler error
    /// leaves its event unacknowledged and is returned. Returns the number of
    /// events handled.
    pub async fn watch<F, Fut>(
        &mut self,
        limit: Option<u64>,
        per_poll: Option<Duration>,
        shutdown: &CancellationToken,
        mut handler: F,
    ) -> Result<u64>
    where
        F: FnMut(EventDto) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut poll = RequestOptions::new().with_cancel(shutdown.clone());
        let mut ack = RequestOptions::new();
        if let Some(d) = per_poll {
            poll = poll.with_timeout(d);
            ack = ack.with_timeout(d);
        }

        let mut handled = 0u64;
        while limit.map_or(true, |n| handled < n) && !shutdown.is_cancelled() {
            let event = match self.next(&poll).await {
                Ok(event) => event,
                Err(Error::Cancelled) if !shutdown.is_cancelled() => {
                    tracing::debug!("poll expired, waiting again");
                    continue;
                }
                Err(Error::Cancelled) => break,
                Err(e) => return Err(e),
            };
            handler(event).await?;
            self.ack(&ack).await?;
            handled += 1;
        }
        Ok(handled)
    }
}
