pub mod error;
pub mod types;

pub use error::{SentinelError, SentinelResult};
pub use types::ServiceInfo;
