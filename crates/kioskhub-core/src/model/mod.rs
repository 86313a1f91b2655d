// ── Domain model ──
//
// Canonical types shared by the resolver, dispatcher, scanner and stores.

mod device;
mod snapshot;
mod target;

pub use device::{Device, Group};
pub use snapshot::DeviceSnapshot;
pub use target::{Selector, Target};
