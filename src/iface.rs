//! Interface properties: index, MAC and addresses from `pnet_datalink`, the MTU
//! from a `SIOCGIFMTU` ioctl.

use std::io;
use std::mem;
use std::net::Ipv4Addr;
use std::os::fd::AsRawFd;

use ipnetwork::IpNetwork;
use pnet_datalink::NetworkInterface;
use tracing::debug;

use crate::error::{Error, Result};
use crate::net::layout::eth;

/// What the frame overwrites need to know about the outgoing interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub name: String,
    pub index: u32,
    pub ipv4: Ipv4Addr,
    pub mac: [u8; 6],
    pub mtu: usize,
}

impl InterfaceInfo {
    /// Looks `name` up. The MTU is read through the socket that will later
    /// send the frame.
    pub fn lookup(socket: &impl AsRawFd, name: &str) -> Result<Self> {
        let ifr = ifreq_for(name)?;
        let interface = pnet_datalink::interfaces()
            .into_iter()
            .find(|i| i.name == name)
            .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))?;
        let mtu = read_mtu(socket, ifr, name)?;

        let info = Self::from_datalink(&interface, mtu)?;
        debug!(
            interface = %info.name,
            index = info.index,
            ipv4 = %info.ipv4,
            mac = %format_mac(&info.mac),
            mtu = info.mtu,
            "interface properties"
        );
        Ok(info)
    }

    fn from_datalink(interface: &NetworkInterface, mtu: usize) -> Result<Self> {
        let mac = interface
            .mac
            .map(|mac| [mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])
            .ok_or_else(|| Error::NoHardwareAddress(interface.name.clone()))?;

        // First IPv4 address, as SIOCGIFADDR would report it.
        let ipv4 = interface
            .ips
            .iter()
            .find_map(|network| match network {
                IpNetwork::V4(v4) => Some(v4.ip()),
                IpNetwork::V6(_) => None,
            })
            .ok_or_else(|| Error::NoIpv4Address(interface.name.clone()))?;

        Ok(Self {
            name: interface.name.clone(),
            index: interface.index,
            ipv4,
            mac,
            mtu,
        })
    }

    /// Largest frame the interface takes: the MTU plus the Ethernet header.
    pub fn frame_capacity(&self) -> usize {
        self.mtu + eth::LEN
    }
}

pub fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn ifreq_for(name: &str) -> Result<libc::ifreq> {
    // SAFETY: ifreq is plain old data; all-zero is a valid value.
    let mut ifr: libc::ifreq = unsafe { mem::zeroed() };
    if name.is_empty() || name.len() >= ifr.ifr_name.len() || name.bytes().any(|b| b == 0) {
        return Err(Error::InterfaceName(name.to_string()));
    }
    for (dst, src) in ifr.ifr_name.iter_mut().zip(name.bytes()) {
        *dst = src as libc::c_char;
    }
    Ok(ifr)
}

// pnet_datalink does not report the MTU.
fn read_mtu(socket: &impl AsRawFd, mut ifr: libc::ifreq, name: &str) -> Result<usize> {
    // SAFETY: ifr is a valid, NUL-terminated ifreq that outlives the call.
    let result = unsafe {
        libc::ioctl(
            socket.as_raw_fd(),
            libc::SIOCGIFMTU as _,
            &mut ifr as *mut libc::ifreq,
        )
    };
    if result == -1 {
        return Err(Error::InterfaceLookup {
            interface: name.to_string(),
            operation: "SIOCGIFMTU",
            source: io::Error::last_os_error(),
        });
    }
    // SAFETY: SIOCGIFMTU fills the ifru_mtu member.
    let mtu = unsafe { ifr.ifr_ifru.ifru_mtu };
    Ok(usize::try_from(mtu).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipnetwork::{Ipv4Network, Ipv6Network};
    use pnet_datalink::MacAddr;
    use std::net::Ipv6Addr;

    fn datalink(mac: Option<MacAddr>, ips: Vec<IpNetwork>) -> NetworkInterface {
        NetworkInterface {
            name: "eth0".to_string(),
            description: String::new(),
            index: 2,
            mac,
            ips,
            flags: 0,
        }
    }

    #[test]
    fn test_interface_name_limits() {
        assert!(ifreq_for("eth0").is_ok());
        assert!(matches!(ifreq_for(""), Err(Error::InterfaceName(_))));
        assert!(matches!(
            ifreq_for("a-very-long-ifname"),
            Err(Error::InterfaceName(_))
        ));
        assert!(matches!(ifreq_for("eth\0"), Err(Error::InterfaceName(_))));
    }

    #[test]
    fn test_ifreq_name_is_nul_terminated() {
        let ifr = ifreq_for("lo").unwrap();
        assert_eq!(ifr.ifr_name[0] as u8, b'l');
        assert_eq!(ifr.ifr_name[1] as u8, b'o');
        assert_eq!(ifr.ifr_name[2], 0);
    }

    #[test]
    fn test_from_datalink_takes_first_ipv4() {
        let ips = vec![
            IpNetwork::V6(Ipv6Network::new(Ipv6Addr::LOCALHOST, 128).unwrap()),
            IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(192, 168, 1, 10), 24).unwrap()),
            IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(10, 0, 0, 1), 8).unwrap()),
        ];
        let mac = MacAddr::new(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff);
        let info = InterfaceInfo::from_datalink(&datalink(Some(mac), ips), 1500).unwrap();

        assert_eq!(info.name, "eth0");
        assert_eq!(info.index, 2);
        assert_eq!(info.ipv4, Ipv4Addr::new(192, 168, 1, 10));
        assert_eq!(info.mac, [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        assert_eq!(info.frame_capacity(), 1514);
        assert_eq!(format_mac(&info.mac), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn test_from_datalink_missing_properties() {
        let v6_only = vec![IpNetwork::V6(
            Ipv6Network::new(Ipv6Addr::LOCALHOST, 128).unwrap(),
        )];
        let mac = MacAddr::new(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff);

        let err = InterfaceInfo::from_datalink(&datalink(Some(mac), v6_only), 1500).unwrap_err();
        assert!(matches!(err, Error::NoIpv4Address(ref name) if name == "eth0"));

        let err = InterfaceInfo::from_datalink(&datalink(None, Vec::new()), 1500).unwrap_err();
        assert!(matches!(err, Error::NoHardwareAddress(_)));
    }

    #[test]
    fn test_unknown_interface_fails_lookup() {
        let Ok(socket) = std::net::UdpSocket::bind("127.0.0.1:0") else {
            return;
        };
        let err = InterfaceInfo::lookup(&socket, "nosuchif0").unwrap_err();
        assert!(matches!(err, Error::InterfaceNotFound(ref name) if name == "nosuchif0"));
        assert_eq!(err.to_string(), "interface 'nosuchif0' not found");
    }
}
