//! Device enumeration — reads the object list and common properties for
//! every object on a BACnet device, batching the property reads.

use crate::point::classify_point;
use crate::{BacNode, BacProperty, BacnetClient, ClientDataValue, ClientError};
use rustbac_core::types::{ObjectId, ObjectType, PropertyId};
use rustbac_datalink::{DataLink, DataLinkAddress};

/// Default number of objects batched into a single ReadPropertyMultiple
/// request by `enumerate_properties`.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Summary of a single object on a device.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectSummary {
    pub object_id: ObjectId,
    pub object_name: Option<String>,
    pub object_type: ObjectType,
    pub present_value: Option<ClientDataValue>,
    pub description: Option<String>,
}

/// Result of a full device enumeration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceWalkResult {
    pub device_id: ObjectId,
    pub objects: Vec<ObjectSummary>,
}

/// Reads a device's object list, then batch-reads ObjectName/Description (and,
/// when `include_values` is set, PresentValue) for every non-device,
/// non-notification-class object, in groups of `batch_size`. Caches the
/// result onto `node` in the client's node list.
pub async fn enumerate_properties<D: DataLink>(
    client: &BacnetClient<D>,
    node: &BacNode,
    include_values: bool,
) -> Result<DeviceWalkResult, ClientError> {
    let result = enumerate_properties_raw(
        client,
        node.address.mac,
        node.device_id,
        DEFAULT_BATCH_SIZE,
        include_values,
    )
    .await?;

    let properties = result.objects.iter().map(to_bac_property).collect();
    client
        .set_node_properties(node.device_id, properties)
        .await;

    Ok(result)
}

/// Backwards-compatible single-batch walk taking a raw address/device id
/// instead of a cached [`BacNode`] (`batch_size` covers every object in one
/// request). Does not touch the client's node list.
pub async fn walk_device<D: DataLink>(
    client: &BacnetClient<D>,
    addr: DataLinkAddress,
    device_id: ObjectId,
) -> Result<DeviceWalkResult, ClientError> {
    enumerate_properties_raw(client, addr, device_id, DEFAULT_BATCH_SIZE, true).await
}

async fn enumerate_properties_raw<D: DataLink>(
    client: &BacnetClient<D>,
    addr: DataLinkAddress,
    device_id: ObjectId,
    batch_size: usize,
    include_values: bool,
) -> Result<DeviceWalkResult, ClientError> {
    let object_list_value = client
        .read_property(addr, device_id, PropertyId::ObjectList)
        .await?;

    let object_ids: Vec<ObjectId> = extract_object_ids(&object_list_value)
        .into_iter()
        .filter(|oid| {
            !matches!(
                oid.object_type(),
                ObjectType::Device | ObjectType::NotificationClass
            )
        })
        .collect();

    let properties: &[PropertyId] = if include_values {
        &[
            PropertyId::ObjectName,
            PropertyId::PresentValue,
            PropertyId::Description,
        ]
    } else {
        &[PropertyId::ObjectName, PropertyId::Description]
    };

    let batch_size = batch_size.max(1);
    let mut objects = Vec::with_capacity(object_ids.len());

    for batch in object_ids.chunks(batch_size) {
        match client
            .read_property_multiple_for_objects(addr, batch, properties)
            .await
        {
            Ok(results) => {
                for (oid, props) in results {
                    objects.push(build_summary(oid, &props, include_values));
                }
            }
            Err(_) => {
                for &oid in batch {
                    objects.push(if include_values {
                        let mut summary = default_summary(oid);
                        summary.present_value = Some(default_present_value(summary.object_type));
                        summary
                    } else {
                        default_summary(oid)
                    });
                }
            }
        }
    }

    Ok(DeviceWalkResult { device_id, objects })
}

fn to_bac_property(summary: &ObjectSummary) -> BacProperty {
    BacProperty {
        object_id: summary.object_id,
        display_name: summary.object_name.clone(),
        description: summary.description.clone(),
        cached_value: summary.present_value.clone(),
        inferred_runtime_type: Some(classify_point(summary.object_type).kind),
    }
}

fn extract_object_ids(value: &ClientDataValue) -> Vec<ObjectId> {
    match value {
        ClientDataValue::ObjectId(oid) => vec![*oid],
        ClientDataValue::Constructed { values, .. } => values
            .iter()
            .filter_map(|v| {
                if let ClientDataValue::ObjectId(oid) = v {
                    Some(*oid)
                } else {
                    None
                }
            })
            .collect(),
        _ => vec![],
    }
}

/// A placeholder value matching an object type's default runtime type, used
/// when the device has not yet answered for PRESENT_VALUE.
fn default_present_value(object_type: ObjectType) -> ClientDataValue {
    match object_type {
        ObjectType::AnalogInput | ObjectType::AnalogOutput | ObjectType::AnalogValue => {
            ClientDataValue::Real(0.0)
        }
        ObjectType::BinaryInput | ObjectType::BinaryOutput | ObjectType::BinaryValue => {
            ClientDataValue::Boolean(false)
        }
        ObjectType::MultiStateInput
        | ObjectType::MultiStateOutput
        | ObjectType::MultiStateValue
        | ObjectType::Command => ClientDataValue::Unsigned(0),
        _ => ClientDataValue::Null,
    }
}

fn default_summary(oid: ObjectId) -> ObjectSummary {
    ObjectSummary {
        object_id: oid,
        object_name: None,
        object_type: oid.object_type(),
        present_value: None,
        description: None,
    }
}

fn build_summary(
    oid: ObjectId,
    props: &[(PropertyId, ClientDataValue)],
    include_values: bool,
) -> ObjectSummary {
    let mut summary = default_summary(oid);

    for (pid, val) in props {
        match pid {
            PropertyId::ObjectName => {
                if let ClientDataValue::CharacterString(s) = val {
                    summary.object_name = Some(s.clone());
                }
            }
            PropertyId::PresentValue if include_values => {
                if matches!(val, ClientDataValue::Error { .. }) {
                    summary.present_value = Some(default_present_value(summary.object_type));
                } else {
                    summary.present_value = Some(val.clone());
                }
            }
            PropertyId::Description => {
                if let ClientDataValue::CharacterString(s) = val {
                    summary.description = Some(s.clone());
                }
            }
            _ => {}
        }
    }

    if include_values && summary.present_value.is_none() {
        summary.present_value = Some(default_present_value(summary.object_type));
    }

    summary
}
