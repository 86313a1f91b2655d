//! Fleet dispatch and monitoring engine between `kioskhub-api` and the
//! hub's outer surfaces (CLI, live-update transport).
//!
//! - **[`Fleet`]**: Composition root: owns the repositories, the shared
//!   [`NotificationHub`], the [`Dispatcher`] and the [`FleetScanner`], and
//!   manages the background monitor task lifecycle.
//!
//! - **[`TargetResolver`]**: Turns a [`Target`] (device id, group id or an
//!   explicit address list) into an ordered device list.
//!
//! - **[`Dispatcher`]**: Parallel fan-out/fan-in: runs one remote operation
//!   against every resolved device and returns an ordered [`ActionReport`] or
//!   [`StatusReport`]. One failing tablet never affects its siblings.
//!
//! - **[`FleetScanner`]**: Periodic scan cycle over a bounded worker pool:
//!   refreshes online/offline state, appends snapshots, prunes history.
//!
//! - **[`NotificationHub`]**: Edge-triggered pub/sub: subscribers learn that
//!   something changed, with bursts coalesced into one pending wake-up.
//!
//! Storage sits behind the async traits in [`store`]; [`MemoryStore`] is the
//! bundled implementation.

pub mod capability;
pub mod command;
pub mod config;
pub mod convert;
pub mod dispatcher;
pub mod error;
pub mod fleet;
pub mod hub;
pub mod model;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use capability::DeviceCapability;
pub use command::KioskCommand;
pub use config::HubConfig;
pub use dispatcher::Dispatcher;
pub use error::CoreError;
pub use fleet::{Fleet, Repositories};
pub use hub::{NotificationHub, Subscription};
pub use model::{Device, DeviceSnapshot, Group, Selector, Target};
pub use report::{ActionReport, ActionResult, StatusReport, StatusResult};
pub use resolver::TargetResolver;
pub use scanner::{FleetScanner, ScanSummary};
pub use store::{DeviceRepository, GroupRepository, MemoryStore, SnapshotRepository, StoreError};
