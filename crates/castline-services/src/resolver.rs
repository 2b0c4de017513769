//! Address resolution contract.
//!
//! The caster does not know how peers are discovered or stored. It asks a
//! resolver, usually a DHT, for the current address of a peer and for the
//! local node's own identity.

use castline_core::{PeerAddress, PeerId};

/// Error reported by a resolver. Propagated to callers untouched.
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// Maps peer ids to their current addresses.
///
/// Implementations must tolerate concurrent calls from many casts.
pub trait AddressResolver: Send + Sync {
    /// Look up `peer_id`. `Ok(None)` means the peer is not known.
    fn resolve(&self, peer_id: &PeerId) -> Result<Option<PeerAddress>, ResolveError>;

    /// Identity of the local node.
    fn local_peer_id(&self) -> PeerId;
}
