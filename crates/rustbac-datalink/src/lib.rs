#![allow(async_fn_in_trait)]

pub mod address;
pub mod bip;
pub mod traits;

pub use address::{Address, DataLinkAddress};
pub use bip::transport::BacnetIpTransport;
pub use traits::{DataLink, DataLinkError};
