//! Hand-off channels between the caster and its consumers.

use castline_core::{ChannelConfig, EventMessageReceived, MessageOnTheWire};
use tokio::sync::mpsc;

/// Both ends of the outbound and inbound queues.
///
/// The senders go to the caster; the receivers go to the transport and the
/// application respectively.
pub struct CastChannels {
    pub messages_tx: mpsc::Sender<MessageOnTheWire>,
    pub messages_rx: mpsc::Receiver<MessageOnTheWire>,
    pub events_tx: mpsc::Sender<EventMessageReceived>,
    pub events_rx: mpsc::Receiver<EventMessageReceived>,
}

/// Create bounded channels sized from config.
pub fn channels(config: &ChannelConfig) -> CastChannels {
    let (messages_tx, messages_rx) = mpsc::channel(config.outbound());
    let (events_tx, events_rx) = mpsc::channel(config.inbound());
    CastChannels {
        messages_tx,
        messages_rx,
        events_tx,
        events_rx,
    }
}
