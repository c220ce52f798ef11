//! Local Store dApp client library.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod store;
pub mod view;

pub use config::StoreConfig;
pub use lifecycle::Shutdown;
pub use store::StoreClient;
pub use view::{ViewController, ViewHandle};
