//! An owned frame and the overwrites applied to it before it is sent.

use pnet_packet::ethernet::{EtherTypes, EthernetPacket};
use pnet_packet::ipv4::Ipv4Packet;
use pnet_packet::Packet;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::hextools::{decode_hex, encode_hex};
use crate::iface::{format_mac, InterfaceInfo};
use crate::net::layout::Composition;
use crate::net::view::FrameView;

/// Which fields to overwrite with values from the interface or with computed
/// checksums. Everything not selected goes out exactly as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverwriteOptions {
    pub ip_checksum: bool,
    pub eth_src_mac: bool,
    pub igmp_checksum: bool,
    pub ip_src_addr: bool,
    pub udp_checksum: bool,
}

impl OverwriteOptions {
    /// UDP and IGMP checksums assume different header chains for the same bytes.
    pub fn validate(&self) -> Result<()> {
        if self.udp_checksum && self.igmp_checksum {
            return Err(Error::ConflictingChecksums);
        }
        Ok(())
    }

    pub fn composition(&self) -> Composition {
        if self.igmp_checksum {
            Composition::Igmp
        } else {
            Composition::Udp
        }
    }
}

/// The bytes of one frame, exactly as they will be put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Decodes `hex` into a frame of at most `capacity` bytes.
    pub fn from_hex(hex: &str, capacity: usize) -> Result<Self> {
        Ok(Self {
            bytes: decode_hex(hex, capacity)?,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn view(&mut self, composition: Composition) -> FrameView<'_> {
        FrameView::new(&mut self.bytes, composition)
    }

    /// Applies the selected overwrites in wire order: Ethernet source, IP
    /// source, IP checksum, then the transport checksum. On error the frame
    /// keeps its previous bytes.
    pub fn apply(&mut self, options: OverwriteOptions, iface: &InterfaceInfo) -> Result<()> {
        options.validate()?;
        let mut patched = self.clone();
        let mut view = patched.view(options.composition());

        if options.eth_src_mac {
            view.set_eth_src(iface.mac)?;
            debug!(mac = %format_mac(&iface.mac), "ethernet source overwritten");
        }
        if options.ip_src_addr {
            view.set_ip_src(iface.ipv4.octets())?;
            debug!(ip = %iface.ipv4, "ip source overwritten");
        }
        if options.ip_checksum {
            let checksum = view.update_ip_checksum()?;
            debug!(checksum = %encode_hex(&checksum), "ip checksum overwritten");
        }
        if options.udp_checksum {
            let checksum = view.update_udp_checksum()?;
            let udp_len = view.udp_length()?;
            debug!(checksum = %encode_hex(&checksum), udp_len, "udp checksum overwritten");
        }
        if options.igmp_checksum {
            let checksum = view.update_igmp_checksum()?;
            debug!(checksum = %encode_hex(&checksum), "igmp checksum overwritten");
        }

        *self = patched;
        Ok(())
    }

    /// One-line summary of the outer headers, for logging.
    pub fn describe(&self) -> String {
        let Some(ethernet) = EthernetPacket::new(&self.bytes) else {
            return format!("{} bytes (short of an ethernet header)", self.len());
        };
        let mut summary = format!(
            "{} > {} ethertype 0x{:04x} {} bytes",
            ethernet.get_source(),
            ethernet.get_destination(),
            ethernet.get_ethertype().0,
            self.len()
        );
        if ethernet.get_ethertype() == EtherTypes::Ipv4 {
            if let Some(ip) = Ipv4Packet::new(ethernet.payload()) {
                summary.push_str(&format!(
                    ", {} > {} proto {}",
                    ip.get_source(),
                    ip.get_destination(),
                    ip.get_next_level_protocol().0
                ));
            }
        }
        summary
    }

    pub fn log_summary(&self) {
        info!(frame = %self.describe(), "sending frame");
    }
}

/// Decodes and patches every packet before any is sent, so a bad packet late
/// in a dump file stops the run with nothing on the wire.
pub fn prepare_frames<S: AsRef<str>>(
    packets: &[S],
    options: OverwriteOptions,
    iface: &InterfaceInfo,
) -> Result<Vec<Frame>> {
    packets
        .iter()
        .enumerate()
        .map(|(i, hex)| {
            let mut frame = Frame::from_hex(hex.as_ref(), iface.frame_capacity())?;
            frame.apply(options, iface)?;
            debug!(packet = i + 1, bytes = frame.len(), "frame prepared");
            Ok(frame)
        })
        .collect()
}
