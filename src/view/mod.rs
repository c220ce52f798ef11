//! View controller subsystem.
//!
//! # Data Flow
//! ```text
//! terminal line → input.rs (Command / Intent)
//!     → controller.rs (ViewHandle → controller task)
//!     → reducer.rs (ViewState + Event → ViewState + Effects)
//!     → effects run as tasks against the wallet and StoreClient
//!     → completions come back as Events
//!     → snapshot published on a watch channel → render.rs
//! ```
//!
//! # Design Decisions
//! - All state changes go through one pure function
//! - Snapshots are immutable `Arc<ViewState>` values

pub mod controller;
pub mod input;
pub mod reducer;
pub mod render;
pub mod state;

pub use controller::{Gateway, ViewController, ViewHandle};
pub use input::{parse_command, Command};
pub use reducer::{reduce, Effect, Event, Intent, ViewSettings};
pub use render::render;
pub use state::{Fetch, Notice, NoticeLevel, Phase, ViewState};
