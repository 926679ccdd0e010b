use core::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use rustbac_core::npdu::NpduAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataLinkAddress {
    Ip(SocketAddr),
}

impl DataLinkAddress {
    pub const BACNET_IP_DEFAULT_PORT: u16 = 47808;

    pub fn local_broadcast(port: u16) -> Self {
        Self::Ip(SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), port))
    }

    pub fn bacnet_default(addr: IpAddr) -> Self {
        Self::Ip(SocketAddr::new(addr, Self::BACNET_IP_DEFAULT_PORT))
    }

    pub fn as_socket_addr(self) -> SocketAddr {
        match self {
            Self::Ip(addr) => addr,
        }
    }
}

impl fmt::Display for DataLinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => write!(f, "{addr}"),
        }
    }
}

/// A transport-level endpoint: the local-network MAC (the UDP socket to send
/// to or that a datagram arrived from) plus, for a device reached through a
/// BACnet router, the network-layer source/destination carried in the NPDU.
///
/// `network` is 0 for a device on the directly-attached broadcast domain.
/// Equality is structural; an `Address` does not change after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub network: u16,
    pub mac: DataLinkAddress,
    pub routed_source: Option<NpduAddress>,
    pub routed_destination: Option<NpduAddress>,
}

impl Address {
    /// An address on the local (non-routed) broadcast domain.
    pub const fn local(mac: DataLinkAddress) -> Self {
        Self {
            network: 0,
            mac,
            routed_source: None,
            routed_destination: None,
        }
    }

    /// An address reached via a BACnet router, carrying the NPDU-layer
    /// source/destination network addresses that frame every request and
    /// response crossing that router.
    pub const fn routed(
        mac: DataLinkAddress,
        network: u16,
        routed_source: NpduAddress,
        routed_destination: NpduAddress,
    ) -> Self {
        Self {
            network,
            mac,
            routed_source: Some(routed_source),
            routed_destination: Some(routed_destination),
        }
    }

    pub const fn is_routed(&self) -> bool {
        self.routed_destination.is_some()
    }
}

impl From<DataLinkAddress> for Address {
    fn from(mac: DataLinkAddress) -> Self {
        Self::local(mac)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.network == 0 {
            write!(f, "{}", self.mac)
        } else {
            write!(f, "{} (net {})", self.mac, self.network)
        }
    }
}
