//! Protocol envelopes exchanged between the caster, the transport, and the
//! application.
//!
//! The caster never encodes anything itself. `Message::len` reports the size
//! the transport will put on the wire so callers can budget for it.

use std::fmt;
use std::time::SystemTime;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::peer::NetworkAddress;

/// Header bytes preceding every body on the wire: u32 length, u16 version,
/// u16 variant.
pub const MESSAGE_HEADER_LEN: usize = 8;

// ── Version / Variant ─────────────────────────────────────────────────────────

/// Protocol version of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum MessageVersion {
    V1 = 1,
}

impl MessageVersion {
    /// The version stamped on everything this node sends.
    pub const CURRENT: MessageVersion = MessageVersion::V1;

    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::V1),
            _ => None,
        }
    }
}

impl From<MessageVersion> for u16 {
    fn from(v: MessageVersion) -> u16 {
        v as u16
    }
}

/// Message type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum MessageVariant {
    Ping = 1,
    Pong = 2,
    Cast = 3,
    Multicast = 4,
    Broadcast = 5,
}

impl MessageVariant {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::Ping),
            2 => Some(Self::Pong),
            3 => Some(Self::Cast),
            4 => Some(Self::Multicast),
            5 => Some(Self::Broadcast),
            _ => None,
        }
    }
}

impl From<MessageVariant> for u16 {
    fn from(v: MessageVariant) -> u16 {
        v as u16
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Opaque application payload. Cloning shares the underlying buffer.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct MessageBody(Bytes);

impl MessageBody {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for MessageBody {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for MessageBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for MessageBody {
    fn from(bytes: &'static [u8]) -> Self {
        Self(Bytes::from_static(bytes))
    }
}

impl From<&'static str> for MessageBody {
    fn from(s: &'static str) -> Self {
        Self(Bytes::from_static(s.as_bytes()))
    }
}

impl AsRef<[u8]> for MessageBody {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageBody({} bytes)", self.0.len())
    }
}

impl Serialize for MessageBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for MessageBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Ok(Self(Bytes::from(bytes)))
    }
}

// ── Envelopes ─────────────────────────────────────────────────────────────────

/// Versioned, typed envelope around a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub version: MessageVersion,
    pub variant: MessageVariant,
    pub body: MessageBody,
}

impl Message {
    pub fn new(version: MessageVersion, variant: MessageVariant, body: MessageBody) -> Self {
        Self {
            version,
            variant,
            body,
        }
    }

    /// Envelope used for all cast traffic: current version, `Cast` variant.
    pub fn cast(body: MessageBody) -> Self {
        Self::new(MessageVersion::CURRENT, MessageVariant::Cast, body)
    }

    /// Encoded length including the header.
    pub fn len(&self) -> usize {
        MESSAGE_HEADER_LEN + self.body.len()
    }

    /// Never true: the header is always present.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// A message ready for the transport, addressed to a resolved peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOnTheWire {
    pub to: NetworkAddress,
    pub message: Message,
}

/// Raised to the application when a cast arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessageReceived {
    /// Local wall-clock time at which the message was accepted.
    pub time: SystemTime,
    pub message: MessageBody,
}
