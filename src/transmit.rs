//! Link-layer transmission over an `AF_PACKET` raw socket.

use std::mem;
use std::os::fd::{AsRawFd, RawFd};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::debug;

use crate::error::{Error, Result};

pub struct RawSender {
    socket: Socket,
}

impl RawSender {
    /// Opens the packet socket. Needs CAP_NET_RAW.
    pub fn open() -> Result<Self> {
        let socket = Socket::new(
            Domain::PACKET,
            Type::RAW,
            Some(Protocol::from(libc::IPPROTO_RAW)),
        )
        .map_err(Error::Socket)?;
        debug!("packet socket opened");
        Ok(Self { socket })
    }

    /// Sends `frame` as-is out of the interface with index `ifindex`.
    pub fn send(&self, frame: &[u8], ifindex: u32) -> Result<usize> {
        let dest = link_addr(ifindex);
        let sent = self
            .socket
            .send_to(frame, &dest)
            .map_err(|source| Error::Transmit { ifindex, source })?;

        debug!(bytes = sent, ifindex, "frame sent");
        Ok(sent)
    }
}

impl AsRawFd for RawSender {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}

/// `sockaddr_ll` naming the outgoing interface. The frame already carries
/// its own link-layer header, so only the family and index are set.
fn link_addr(ifindex: u32) -> SockAddr {
    // SAFETY: sockaddr_ll fits inside sockaddr_storage, all-zero is valid for
    // both, and the length passed matches the structure written.
    unsafe {
        let mut storage: libc::sockaddr_storage = mem::zeroed();
        let ll = &mut *(&mut storage as *mut libc::sockaddr_storage).cast::<libc::sockaddr_ll>();
        ll.sll_family = libc::AF_PACKET as libc::c_ushort;
        ll.sll_ifindex = ifindex as libc::c_int;
        SockAddr::new(
            storage,
            mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_addr_names_the_interface() {
        let addr = link_addr(7);
        assert_eq!(addr.family(), libc::AF_PACKET as libc::sa_family_t);
        assert_eq!(addr.domain(), Domain::PACKET);
        assert_eq!(
            addr.len() as usize,
            mem::size_of::<libc::sockaddr_ll>()
        );

        // SAFETY: the address was built from a sockaddr_ll above.
        let ll = unsafe { &*addr.as_ptr().cast::<libc::sockaddr_ll>() };
        assert_eq!(ll.sll_ifindex, 7);
        assert_eq!(ll.sll_protocol, 0);
    }
}
