mod auth;
mod backend;
mod content;
mod gateway;
mod pin;

pub use auth::*;
pub use backend::*;
pub use content::*;
pub use gateway::*;
pub use pin::*;
