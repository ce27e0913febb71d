pub mod errors;
pub mod id;

pub use errors::{ConfigError, TripdeskError};
pub use id::{new_short_id, ConnectionId};

pub type Result<T> = std::result::Result<T, TripdeskError>;
