//! castline-core — peer identity, protocol envelopes, cancellation context,
//! and configuration. `castline-services` builds the caster on top of these.

pub mod config;
pub mod context;
pub mod message;
pub mod peer;

pub use config::{CastSettings, CastlineConfig, ChannelConfig, ConfigError};
pub use context::{CastContext, Cancelled};
pub use message::{
    EventMessageReceived, Message, MessageBody, MessageOnTheWire, MessageVariant, MessageVersion,
};
pub use peer::{NetworkAddress, PeerAddress, PeerId};
