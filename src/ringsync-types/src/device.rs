use std::{collections::BTreeMap, fmt};

/// Numeric id of a device as stored in the export's device registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub i64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DeviceId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
}

impl Device {
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Devices selected for one run, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceSet {
    devices: BTreeMap<DeviceId, Device>,
}

impl DeviceSet {
    pub fn new(devices: impl IntoIterator<Item = Device>) -> Self {
        Self {
            devices: devices.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub fn ids(&self) -> Vec<i64> {
        self.devices.keys().map(|id| id.0).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl fmt::Display for DeviceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .iter()
            .map(|d| format!("{} ({})", d.name, d.id))
            .collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_set_ids_sorted() {
        let set = DeviceSet::new([Device::new(7, "R02_1A2B"), Device::new(3, "Colmi R06")]);
        assert_eq!(set.ids(), vec![3, 7]);
        assert_eq!(set.get(DeviceId(7)).unwrap().name, "R02_1A2B");
        assert!(set.get(DeviceId(1)).is_none());
    }

    #[test]
    fn device_set_display() {
        let set = DeviceSet::new([Device::new(1, "Colmi R02")]);
        assert_eq!(set.to_string(), "Colmi R02 (1)");
    }
}
