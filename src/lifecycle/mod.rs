//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Detect wallet → Check chain → Bind contract
//!
//! Shutdown (shutdown.rs):
//!     Signal or `quit` → Broadcast → Controller and watcher tasks exit
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_gateway, connect_store, open_store, StartupError};
