//! Collection core: orchestration and lifecycle.
//!
//! The public API from this module is [`SelectCollection`], which registers
//! selections, activates their forwarders, runs the wait loop and shuts
//! everything down, plus its [`SelectCollectionBuilder`] and [`Config`].
//!
//! Internal modules:
//! - [`collection`]: registration, initialize, select loop, shutdown;
//! - [`builder`]: construction with pre-registered selections and subscribers;
//! - [`config`]: channel sizing;
//! - [`shutdown`]: cross-platform termination signal helper.

mod builder;
mod collection;
mod config;
mod shutdown;

pub use builder::SelectCollectionBuilder;
pub use collection::SelectCollection;
pub use config::Config;
pub use shutdown::wait_for_shutdown_signal;
