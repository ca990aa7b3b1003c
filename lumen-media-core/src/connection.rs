//! Connection classification and the change-notification monitor.
//!
//! Classification is a plain observation value: the platform adapter
//! reads whatever the network-information facility reports and maps it
//! into [`ConnectionClassification`]. When the facility is absent the
//! adapter publishes nothing and every consumer sees the documented
//! default (`4g`, not slow) — absence is supported degradation, not an
//! error.
//!
//! The monitor is the single process-wide publish point. The platform
//! adapter attaches exactly one listener to the facility and republishes
//! through [`ConnectionMonitor::publish`]; `subscribe` fans that one
//! notification out and never touches the platform.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::constants::SLOW_DOWNLINK_MBPS;

/// Physical connection type. Informational only — policy never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionKind {
    #[default]
    Unknown,
    Wifi,
    Cellular,
    Ethernet,
    /// Reported by the facility but not one of the kinds above.
    Other,
}

impl ConnectionKind {
    /// Map a facility-reported `type` string. Unrecognized values become
    /// `Other` rather than failing — the field is informational.
    pub fn parse(raw: &str) -> ConnectionKind {
        match raw {
            "unknown" | "" => ConnectionKind::Unknown,
            "wifi" => ConnectionKind::Wifi,
            "cellular" => ConnectionKind::Cellular,
            "ethernet" => ConnectionKind::Ethernet,
            _ => ConnectionKind::Other,
        }
    }
}

/// Coarse network-speed classification. Primary driver of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectiveType {
    Slow2g,
    TwoG,
    ThreeG,
    /// Default when the facility is absent.
    #[default]
    FourG,
}

impl EffectiveType {
    /// Map a facility-reported `effectiveType` string. Unrecognized
    /// values return `None` so the caller keeps its previous/default.
    pub fn parse(raw: &str) -> Option<EffectiveType> {
        match raw {
            "slow-2g" => Some(EffectiveType::Slow2g),
            "2g" => Some(EffectiveType::TwoG),
            "3g" => Some(EffectiveType::ThreeG),
            "4g" => Some(EffectiveType::FourG),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveType::Slow2g => "slow-2g",
            EffectiveType::TwoG => "2g",
            EffectiveType::ThreeG => "3g",
            EffectiveType::FourG => "4g",
        }
    }
}

/// Point-in-time classification of the network connection.
///
/// Slowness is deliberately a method, not a field: it is always derived
/// from the stored observations, so the two can never drift apart when
/// the facility is absent or partially populated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConnectionClassification {
    /// Physical type. Informational only.
    pub kind: ConnectionKind,
    /// Coarse speed class; `4g` when unreported.
    pub effective_type: EffectiveType,
    /// Downlink estimate in Mbps, when the facility reports one.
    pub downlink_mbps: Option<f64>,
    /// User/OS-level data-saving preference.
    pub save_data: bool,
}

impl ConnectionClassification {
    /// Derived slowness: `slow-2g`/`2g`, or save-data requested, or a
    /// downlink estimate under [`SLOW_DOWNLINK_MBPS`].
    pub fn is_slow(&self) -> bool {
        matches!(
            self.effective_type,
            EffectiveType::Slow2g | EffectiveType::TwoG
        ) || self.save_data
            || self
                .downlink_mbps
                .is_some_and(|mbps| mbps < SLOW_DOWNLINK_MBPS)
    }
}

type Handler = Box<dyn FnMut(ConnectionClassification)>;

struct Subscriber {
    id: u64,
    handler: Handler,
}

struct MonitorInner {
    current: ConnectionClassification,
    subscribers: Vec<Subscriber>,
    /// Ids of subscriptions dropped while a publish had the subscriber
    /// list checked out; purged when the list is merged back.
    retired: Vec<u64>,
    next_id: u64,
}

/// Process-wide connection-change publish point.
///
/// Single-threaded by design (the subsystem lives on the UI event loop);
/// clones share the same subscriber list. The platform adapter calls
/// [`publish`](ConnectionMonitor::publish) from its one facility
/// listener; everything else only calls `current` and `subscribe`.
#[derive(Clone)]
pub struct ConnectionMonitor {
    inner: Rc<RefCell<MonitorInner>>,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        ConnectionMonitor {
            inner: Rc::new(RefCell::new(MonitorInner {
                current: ConnectionClassification::default(),
                subscribers: Vec::new(),
                retired: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// The last-published classification; the documented default until
    /// the platform adapter publishes its first reading.
    pub fn current(&self) -> ConnectionClassification {
        self.inner.borrow().current
    }

    /// Register a change handler. Each handler receives the freshly
    /// recomputed classification, not a diff. Dropping the returned
    /// subscription unregisters it.
    pub fn subscribe(
        &self,
        handler: impl FnMut(ConnectionClassification) + 'static,
    ) -> ConnectionSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            handler: Box::new(handler),
        });
        ConnectionSubscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Store `classification` and fan it out to every live subscriber.
    ///
    /// Handlers may subscribe or drop subscriptions re-entrantly: the
    /// list is checked out for the duration of the fan-out, new
    /// subscribers are merged back afterwards, and subscriptions dropped
    /// mid-publish are retired before they run again.
    pub fn publish(&self, classification: ConnectionClassification) {
        debug!(?classification, "connection change published");
        let mut checked_out = {
            let mut inner = self.inner.borrow_mut();
            inner.current = classification;
            std::mem::take(&mut inner.subscribers)
        };
        for sub in checked_out.iter_mut() {
            let retired = self.inner.borrow().retired.contains(&sub.id);
            if !retired {
                (sub.handler)(classification);
            }
        }
        let mut inner = self.inner.borrow_mut();
        let added = std::mem::take(&mut inner.subscribers);
        let retired = std::mem::take(&mut inner.retired);
        checked_out.retain(|sub| !retired.contains(&sub.id));
        checked_out.extend(added);
        inner.subscribers = checked_out;
    }

    /// Number of live subscribers. Diagnostics only.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// Guard for one monitor subscription; dropping it unsubscribes.
pub struct ConnectionSubscription {
    id: u64,
    inner: Weak<RefCell<MonitorInner>>,
}

impl Drop for ConnectionSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.borrow_mut();
            match inner.subscribers.iter().position(|s| s.id == self.id) {
                Some(idx) => {
                    inner.subscribers.remove(idx);
                }
                // List is checked out by an in-progress publish.
                None => inner.retired.push(self.id),
            }
        }
    }
}
