// ── Notification hub ──
//
// Edge-triggered pub/sub for "something changed" signals. Every
// subscription owns a capacity-1 channel: a notify that finds the slot
// already full is dropped, so any burst collapses into one pending wake-up.
// The registry lock is held only for map updates and `try_send`, never
// across an await.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::trace;

#[derive(Default)]
struct Registry {
    next_id: u64,
    global: HashMap<u64, mpsc::Sender<()>>,
    devices: HashMap<i64, HashMap<u64, mpsc::Sender<()>>>,
}

/// Process-wide change notifier, owned by the composition root and shared
/// by reference with producers (scanner, dispatcher) and consumers.
#[derive(Default)]
pub struct NotificationHub {
    registry: Mutex<Registry>,
}

/// A registered listener. Dropping it is enough to stop deliveries; the
/// hub prunes closed channels on the next notify.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    device_id: i64,
    rx: mpsc::Receiver<()>,
}

impl Subscription {
    /// Device id this subscription listens to, or 0 for global.
    pub fn device_id(&self) -> i64 {
        self.device_id
    }

    /// Wait for the next wake-up. Returns `false` once the hub side is
    /// gone (unsubscribed or dropped).
    pub async fn changed(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Consume a pending wake-up without waiting.
    pub fn try_changed(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Listen to changes on every device.
    pub fn subscribe_global(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(1);
        let mut reg = self.lock();
        reg.next_id += 1;
        let id = reg.next_id;
        reg.global.insert(id, tx);
        Subscription {
            id,
            device_id: 0,
            rx,
        }
    }

    /// Listen to changes on one device.
    pub fn subscribe_device(&self, device_id: i64) -> Subscription {
        let (tx, rx) = mpsc::channel(1);
        let mut reg = self.lock();
        reg.next_id += 1;
        let id = reg.next_id;
        reg.devices.entry(device_id).or_default().insert(id, tx);
        Subscription { id, device_id, rx }
    }

    /// Remove a subscription from the global set and, for a device
    /// subscription, from that device's set.
    pub fn unsubscribe(&self, sub: &Subscription) {
        let mut reg = self.lock();
        reg.global.remove(&sub.id);
        if sub.device_id == 0 {
            return;
        }
        if let Some(set) = reg.devices.get_mut(&sub.device_id) {
            set.remove(&sub.id);
            if set.is_empty() {
                reg.devices.remove(&sub.device_id);
            }
        }
    }

    /// Wake every global subscriber and every subscriber of `device_id`.
    /// Never blocks and never fails.
    pub fn notify(&self, device_id: i64) {
        let mut reg = self.lock();
        reg.global.retain(|_, tx| offer(tx));
        if let Some(set) = reg.devices.get_mut(&device_id) {
            set.retain(|_, tx| offer(tx));
            if set.is_empty() {
                reg.devices.remove(&device_id);
            }
        }
        trace!(device = device_id, "notified subscribers");
    }

    /// Live subscriptions (global plus per-device).
    pub fn subscriber_count(&self) -> usize {
        let reg = self.lock();
        reg.global.len() + reg.devices.values().map(HashMap::len).sum::<usize>()
    }
}

/// Deliver one wake-up. A full slot coalesces; a closed one is dropped.
fn offer(tx: &mpsc::Sender<()>) -> bool {
    match tx.try_send(()) {
        Ok(()) | Err(mpsc::error::TrySendError::Full(())) => true,
        Err(mpsc::error::TrySendError::Closed(())) => false,
    }
}
