//! Device-side BACnet façade: typed object/property storage plus a request
//! dispatcher that answers WhoIs, IAm, ReadProperty, ReadPropertyMultiple,
//! and WriteProperty against it, built on top of `rustbac-client`'s
//! broadcast dispatcher.

pub mod error;
pub mod server;
pub mod storage;

pub use error::{PersistError, ServerError, StorageError};
pub use server::{BacnetServer, RunningServer};
pub use storage::{
    storage_error_to_access_error, DeviceStorage, PropertyValue, StorageObject, StorageProperty,
    ARRAY_INDEX_ALL, WILDCARD_DEVICE_INSTANCE,
};
