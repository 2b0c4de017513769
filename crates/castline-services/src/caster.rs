//! Caster — single-destination, single-attempt message delivery.
//!
//! Outbound: resolve the destination, wrap the body in a V1 `Cast` envelope,
//! and queue it for the transport. Inbound: timestamp the body of a received
//! cast and queue it for the application.
//!
//! Both directions end in the same hand-off. A slot is reserved on the
//! channel while racing the caller's context, and the value is moved in only
//! once the slot is held. A lost race therefore never leaves anything queued.

use std::sync::Arc;
use std::time::SystemTime;

use castline_core::{
    CastContext, EventMessageReceived, Message, MessageBody, MessageOnTheWire, PeerId,
};
use tokio::sync::mpsc;

use crate::error::{CastCause, CastError};
use crate::resolver::AddressResolver;

/// Stateless casting service. Clones share the resolver and channel senders.
#[derive(Clone)]
pub struct Caster {
    resolver: Arc<dyn AddressResolver>,
    messages: mpsc::Sender<MessageOnTheWire>,
    events: mpsc::Sender<EventMessageReceived>,
}

impl Caster {
    pub fn new(
        resolver: Arc<dyn AddressResolver>,
        messages: mpsc::Sender<MessageOnTheWire>,
        events: mpsc::Sender<EventMessageReceived>,
    ) -> Self {
        Self {
            resolver,
            messages,
            events,
        }
    }

    /// Queue `body` for delivery to `to`.
    ///
    /// Returns once the transport queue has taken the message, or fails if
    /// `to` cannot be resolved or `ctx` is done first.
    pub async fn cast(
        &self,
        ctx: &CastContext,
        to: &PeerId,
        body: MessageBody,
    ) -> Result<(), CastError> {
        let peer_addr = match self.resolver.resolve(to) {
            Ok(Some(addr)) => addr,
            Ok(None) => return Err(self.failed(to, CastCause::NoAddress)),
            Err(e) => return Err(self.failed(to, CastCause::Resolve(e))),
        };

        let wire = MessageOnTheWire {
            to: peer_addr.network_address(),
            message: Message::cast(body),
        };
        let addr = wire.to;
        let len = wire.message.len();

        hand_off(ctx, &self.messages, wire)
            .await
            .map_err(|cause| self.failed(to, cause))?;

        tracing::trace!(peer = short_id(to), %addr, len, "cast queued");
        Ok(())
    }

    /// Raise a received cast to the application.
    ///
    /// The envelope's version and variant are not checked and are dropped;
    /// only the body is delivered. Failures are attributed to the local peer.
    pub async fn accept_cast(&self, ctx: &CastContext, message: Message) -> Result<(), CastError> {
        let event = EventMessageReceived {
            time: SystemTime::now(),
            message: message.body,
        };
        let len = event.message.len();

        if let Err(cause) = hand_off(ctx, &self.events, event).await {
            return Err(self.failed(&self.resolver.local_peer_id(), cause));
        }

        tracing::trace!(len, "cast accepted");
        Ok(())
    }

    fn failed(&self, peer_id: &PeerId, cause: CastCause) -> CastError {
        tracing::debug!(peer = short_id(peer_id), error = %cause, "cast failed");
        CastError::new(peer_id.clone(), cause)
    }
}

/// Move `value` into `tx` unless `ctx` is done first.
///
/// The context arm is polled first so an already-done context fails even
/// when a slot is free.
async fn hand_off<T>(ctx: &CastContext, tx: &mpsc::Sender<T>, value: T) -> Result<(), CastCause> {
    tokio::select! {
        biased;
        cause = ctx.cancelled() => Err(CastCause::Cancelled(cause)),
        permit = tx.reserve() => match permit {
            Ok(permit) => {
                permit.send(value);
                Ok(())
            }
            Err(_) => Err(CastCause::ChannelClosed),
        },
    }
}

fn short_id(peer_id: &PeerId) -> String {
    let bytes = peer_id.as_bytes();
    hex::encode(&bytes[..bytes.len().min(8)])
}
