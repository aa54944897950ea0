//! Pin local files to IPFS through a local daemon or a hosted pinning service.
//!
//! Backends are sans-IO strategy objects; a [`Pinner`] pairs one with a [`Transport`] or
//! [`BlockingTransport`] and runs each upload.

mod core;
mod interface;
mod utils;

pub mod backends;
pub mod transport;

#[cfg(test)]
mod test_utils;

pub use backends::*;
pub use core::*;
pub use interface::*;
pub use transport::*;
pub(crate) use utils::*;
