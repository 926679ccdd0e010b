//! High-level async BACnet client.
//!
//! [`BacnetClient`] wraps any [`DataLink`](rustbac_datalink::DataLink)
//! transport and exposes ergonomic methods for common BACnet operations
//! such as reading properties, discovering devices, and subscribing to
//! change-of-value (COV) notifications.

/// Alarm and event services (GetAlarmSummary, GetEventInformation, etc.).
pub mod alarm;
/// Core [`BacnetClient`] type and transport setup.
pub mod client;
/// Change-of-value (COV) notification types.
pub mod cov;
/// Device and object discovery (Who-Is / I-Am / Who-Has).
pub mod discovery;
/// Client-level error type.
pub mod error;
/// Atomic file read/write operations.
pub mod file;
/// Long-running async notification listener.
pub mod listener;
/// Point type inference for BACnet objects.
pub mod point;
/// ReadRange results and related types.
pub mod range;
/// Owned application-data values for client-side use.
pub mod value;
/// Device discovery walk — reads all objects and their properties.
pub mod walk;

pub use alarm::{
    AlarmSummaryItem, EnrollmentSummaryItem, EventInformationItem, EventInformationResult,
    EventNotification,
};
pub use client::{BacnetClient, DispatchedFrame, OpenBacnetClient};
pub use cov::{CovNotification, CovPropertyValue};
pub use discovery::{BacNode, BacProperty, DiscoveredDevice, DiscoveredObject, NodeList};
pub use error::ClientError;
pub use file::{AtomicReadFileResult, AtomicWriteFileResult};
pub use listener::{create_notification_listener, Notification, NotificationListener};
pub use point::{
    classify_point, format_point, parse_point, PointClassification, PointDirection, PointKind,
    PointParseError,
};
pub use range::{ClientBitString, ReadRangeResult};
pub use rustbac_core::services::acknowledge_alarm::{EventState, TimeStamp};
pub use rustbac_core::services::device_management::{DeviceCommunicationState, ReinitializeState};
pub use value::ClientDataValue;
pub use walk::{enumerate_properties, walk_device, DeviceWalkResult, ObjectSummary, DEFAULT_BATCH_SIZE};
