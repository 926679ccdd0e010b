use std::collections::HashMap;

use rustbac_core::types::ObjectId;
use rustbac_datalink::{Address, DataLinkAddress};
use tokio::sync::Mutex;

use crate::point::PointKind;
use crate::value::ClientDataValue;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoveredDevice {
    pub address: DataLinkAddress,
    pub device_id: Option<ObjectId>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoveredObject {
    pub address: DataLinkAddress,
    pub device_id: ObjectId,
    pub object_id: ObjectId,
    pub object_name: String,
}

/// A cached property of a [`BacNode`], populated lazily by
/// [`crate::enumerate_properties`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacProperty {
    pub object_id: ObjectId,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub cached_value: Option<ClientDataValue>,
    pub inferred_runtime_type: Option<PointKind>,
}

/// A device observed on the network via Who-Is/I-Am, kept in the client's
/// node list for the lifetime of the client.
#[derive(Debug, Clone)]
pub struct BacNode {
    pub address: Address,
    pub device_id: ObjectId,
    pub properties: Vec<BacProperty>,
}

/// The client's persistent, deduplicated table of observed devices.
///
/// Exactly one entry per `device_id`; entries are never evicted, only
/// refreshed in place by a later I-Am for the same device. All access is
/// serialised by a single mutex, per the protocol engine's shared-resource
/// policy for the client node list.
#[derive(Debug, Default)]
pub struct NodeList {
    nodes: Mutex<HashMap<ObjectId, BacNode>>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or refreshes the address of) a device observed via I-Am.
    /// Existing cached properties survive a refresh. Returns `true` if this
    /// `device_id` had never been seen before.
    pub async fn observe(&self, address: Address, device_id: ObjectId) -> bool {
        let mut nodes = self.nodes.lock().await;
        match nodes.get_mut(&device_id) {
            Some(node) => {
                node.address = address;
                false
            }
            None => {
                nodes.insert(
                    device_id,
                    BacNode {
                        address,
                        device_id,
                        properties: Vec::new(),
                    },
                );
                true
            }
        }
    }

    /// Replaces the cached property list for a device, e.g. after
    /// [`crate::enumerate_properties`] runs.
    pub async fn set_properties(&self, device_id: ObjectId, properties: Vec<BacProperty>) {
        if let Some(node) = self.nodes.lock().await.get_mut(&device_id) {
            node.properties = properties;
        }
    }

    pub async fn get(&self, device_id: ObjectId) -> Option<BacNode> {
        self.nodes.lock().await.get(&device_id).cloned()
    }

    pub async fn get_by_address(&self, address: Address) -> Option<BacNode> {
        self.nodes
            .lock()
            .await
            .values()
            .find(|node| node.address == address)
            .cloned()
    }

    pub async fn nodes(&self) -> Vec<BacNode> {
        self.nodes.lock().await.values().cloned().collect()
    }
}
