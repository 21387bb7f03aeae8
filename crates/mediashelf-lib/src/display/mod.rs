//! Terminal display system
//!
//! Separates user-facing output (status lines, tables) from logging. Logs go
//! through `tracing`; everything the user is meant to read goes through a
//! [`DisplayProvider`].

pub mod live;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod providers;
pub mod status;
pub mod structured;
pub mod styling;

pub use live::LiveDisplayProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{DisplayCall, MockDisplayProvider};
pub use providers::{DisplayProvider, StatusProvider, StructuredProvider};
pub use styling::StyleManager;
