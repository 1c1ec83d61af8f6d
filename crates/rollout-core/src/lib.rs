pub mod channel;
pub mod store;
pub mod types;

pub use channel::*;
pub use store::*;
pub use types::*;
