//! Point type inference for BACnet objects.
//!
//! Maps BACnet [`ObjectType`](rustbac_core::types::ObjectType) to a simplified
//! classification useful for building automation integrations.

use rustbac_core::types::{ObjectId, ObjectType};

/// A point name failed to parse as `"<instance>_<type>"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid point string {0:?}")]
pub struct PointParseError(pub String);

/// Parses the `"<instance>_<type>"` point string form into an [`ObjectId`].
///
/// A missing trailing `_<type>` defaults to type 0 (`ANALOG_INPUT`), e.g.
/// `parse_point("3")` and `parse_point("3_0")` are equivalent.
pub fn parse_point(s: &str) -> Result<ObjectId, PointParseError> {
    let (instance_str, type_str) = match s.split_once('_') {
        Some((instance, ty)) => (instance, ty),
        None => (s, "0"),
    };

    let instance: u32 = instance_str
        .parse()
        .map_err(|_| PointParseError(s.to_string()))?;
    let type_num: u16 = type_str
        .parse()
        .map_err(|_| PointParseError(s.to_string()))?;

    Ok(ObjectId::new(ObjectType::from_u16(type_num), instance))
}

/// Formats an [`ObjectId`] as the `"<instance>_<type>"` point string form.
pub fn format_point(id: ObjectId) -> String {
    format!("{}_{}", id.instance(), id.object_type().to_u16())
}

/// The data kind of a BACnet point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    Analog,
    Binary,
    MultiState,
    Accumulator,
    Unknown,
}

/// Whether a BACnet point is an input, output, or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointDirection {
    Input,
    Output,
    Value,
    Unknown,
}

/// A simplified classification of a BACnet object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointClassification {
    pub kind: PointKind,
    pub direction: PointDirection,
    /// `true` when the object type supports writing to its present-value.
    pub writable: bool,
}

/// Classify a BACnet object type into a simplified point description.
pub fn classify_point(object_type: ObjectType) -> PointClassification {
    match object_type {
        ObjectType::AnalogInput => PointClassification {
            kind: PointKind::Analog,
            direction: PointDirection::Input,
            writable: false,
        },
        ObjectType::AnalogOutput => PointClassification {
            kind: PointKind::Analog,
            direction: PointDirection::Output,
            writable: true,
        },
        ObjectType::AnalogValue => PointClassification {
            kind: PointKind::Analog,
            direction: PointDirection::Value,
            writable: true,
        },
        ObjectType::BinaryInput => PointClassification {
            kind: PointKind::Binary,
            direction: PointDirection::Input,
            writable: false,
        },
        ObjectType::BinaryOutput => PointClassification {
            kind: PointKind::Binary,
            direction: PointDirection::Output,
            writable: true,
        },
        ObjectType::BinaryValue => PointClassification {
            kind: PointKind::Binary,
            direction: PointDirection::Value,
            writable: true,
        },
        ObjectType::MultiStateInput => PointClassification {
            kind: PointKind::MultiState,
            direction: PointDirection::Input,
            writable: false,
        },
        ObjectType::MultiStateOutput => PointClassification {
            kind: PointKind::MultiState,
            direction: PointDirection::Output,
            writable: true,
        },
        ObjectType::MultiStateValue => PointClassification {
            kind: PointKind::MultiState,
            direction: PointDirection::Value,
            writable: true,
        },
        ObjectType::Accumulator => PointClassification {
            kind: PointKind::Accumulator,
            direction: PointDirection::Input,
            writable: false,
        },
        ObjectType::PulseConverter => PointClassification {
            kind: PointKind::Accumulator,
            direction: PointDirection::Value,
            writable: true,
        },
        _ => PointClassification {
            kind: PointKind::Unknown,
            direction: PointDirection::Unknown,
            writable: false,
        },
    }
}
