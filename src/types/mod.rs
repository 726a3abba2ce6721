//! Core type definitions using newtype patterns for type safety.
//!
//! These types prevent common logic errors by making invalid states unrepresentable
//! at compile time.

mod port;
mod protocol;
mod target;

pub use port::{Port, PortError, PortSpec};
pub use protocol::{Protocol, ProtocolSelection};
pub use target::{resolve, AddressFamily, ResolvedAddress, TargetError};
