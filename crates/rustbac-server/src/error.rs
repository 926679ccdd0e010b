use thiserror::Error;

/// Failure kinds from the device storage layer.
///
/// Mirrors the client-facing error taxonomy: each variant has a natural
/// BACnet error-class/error-code pairing applied by the handler that
/// surfaces it on the wire (see [`crate::storage::storage_error_to_access_error`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("unknown object")]
    UnknownObject,
    #[error("property does not exist")]
    NotExist,
    #[error("write access denied")]
    WriteAccessDenied,
    #[error("not a commandable write")]
    NotForMe,
    #[error("storage error")]
    GenericError,
}

/// Failures from loading or saving [`crate::storage::DeviceStorage`] to XML.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("xml attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("malformed storage document: {0}")]
    Malformed(String),
    #[error("neither the file nor an embedded resource named {0:?} was found")]
    NotFound(String),
}

/// Errors from the server façade's request dispatch loop.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("client error: {0}")]
    Client(#[from] rustbac_client::ClientError),
    #[error("encode error: {0}")]
    Encode(#[from] rustbac_core::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] rustbac_core::DecodeError),
    #[error("storage persistence error: {0}")]
    Persist(#[from] PersistError),
    #[error("segmented request exceeded reassembly limit")]
    RequestTooLarge,
}
