/// Borrowed bit string type.
pub mod bit_string;
/// Zero-copy application-layer data values.
pub mod data_value;
/// BACnet date and time types.
pub mod date_time;
/// Packed object identifier (type + instance).
pub mod object_id;
/// BACnet object type enumeration.
pub mod object_type;
/// BACnet property identifier enumeration.
pub mod property_id;
/// Protocol-level enumerations (segmentation, max APDU, errors).
pub mod spec;

pub use bit_string::BitString;
pub use data_value::DataValue;
pub use date_time::{Date, Time};
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;
pub use spec::{ErrorClass, ErrorCode, MaxApdu, Segmentation};
