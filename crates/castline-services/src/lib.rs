//! castline-services — the caster and the collaborator contracts it depends on.

pub mod caster;
pub mod channel;
pub mod error;
pub mod resolver;

pub use caster::Caster;
pub use channel::{channels, CastChannels};
pub use error::{CastCause, CastError};
pub use resolver::{AddressResolver, ResolveError};
