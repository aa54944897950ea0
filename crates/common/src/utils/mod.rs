/// Local IPFS daemon detection
mod daemon;
/// `.env` and process environment lookups
mod env;
/// MIME type inference
mod mime;
/// URL helpers
mod url;

pub use daemon::*;
pub use env::*;
pub use mime::*;
pub use url::*;
