use std::collections::BTreeMap;

use ringsync_types::{DeviceId, DeviceSet, Observation, ObservationError, tags};

pub const SYNC_CHECK: &str = "sync_check";

/// Latest observation timestamp per device within one run.
///
/// Updates are a max-reduction, so the result does not depend on the order
/// extractors run in, and trackers filled on separate tasks can be combined
/// with [`LivenessTracker::merge`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LivenessTracker {
    last_seen: BTreeMap<DeviceId, i64>,
}

impl LivenessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, device: DeviceId, timestamp: i64) {
        self.last_seen
            .entry(device)
            .and_modify(|seen| *seen = (*seen).max(timestamp))
            .or_insert(timestamp);
    }

    pub fn observe(&mut self, observation: &Observation) {
        self.record(observation.device(), observation.timestamp());
    }

    pub fn observe_all<'a>(&mut self, observations: impl IntoIterator<Item = &'a Observation>) {
        for observation in observations {
            self.observe(observation);
        }
    }

    pub fn merge(&mut self, other: LivenessTracker) {
        for (device, timestamp) in other.last_seen {
            self.record(device, timestamp);
        }
    }

    pub fn last_seen(&self, device: DeviceId) -> Option<i64> {
        self.last_seen.get(&device).copied()
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }

    /// One `sync_check` observation per tracked device, stamped `now`.
    /// Devices missing from `devices` are skipped.
    pub fn into_observations(
        self,
        devices: &DeviceSet,
        now: i64,
    ) -> Result<Vec<Observation>, ObservationError> {
        self.last_seen
            .into_iter()
            .filter_map(|(id, seen)| devices.get(id).map(|device| (device, seen)))
            .map(|(device, seen)| {
                Observation::builder(device, now)
                    .field("last_seen", seen)
                    .field("last_seen_age", now.saturating_sub(seen))
                    .tag(tags::SAMPLE_TYPE, SYNC_CHECK)
                    .build()
            })
            .collect()
    }
}
