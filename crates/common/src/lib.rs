//! Shared building blocks for pinning content to IPFS: local content handling, gateway
//! resolution, authentication and backend configuration.

mod error;
mod interface;
mod utils;

pub use error::*;
pub use interface::*;
pub use utils::*;
