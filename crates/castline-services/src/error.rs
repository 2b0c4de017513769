//! Failure of a single cast attempt.

use castline_core::{Cancelled, PeerId};

use crate::resolver::ResolveError;

/// A cast (or accepted cast) that did not reach its channel.
///
/// `peer_id` is the destination for outbound casts and the local node for
/// inbound ones.
#[derive(Debug, thiserror::Error)]
#[error("error casting to peer={peer_id}: {cause}")]
pub struct CastError {
    peer_id: PeerId,
    #[source]
    cause: CastCause,
}

#[derive(Debug, thiserror::Error)]
pub enum CastCause {
    #[error("{0}")]
    Resolve(#[source] ResolveError),

    #[error("nil peer address")]
    NoAddress,

    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("channel closed")]
    ChannelClosed,
}

impl CastError {
    pub fn new(peer_id: PeerId, cause: CastCause) -> Self {
        Self { peer_id, cause }
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn cause(&self) -> &CastCause {
        &self.cause
    }

    pub fn into_cause(self) -> CastCause {
        self.cause
    }

    /// The cancellation reason, if the cast lost the race against its context.
    pub fn cancelled(&self) -> Option<Cancelled> {
        match self.cause {
            CastCause::Cancelled(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled().is_some()
    }
}
