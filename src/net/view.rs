//! Mutable lens over a frame's bytes.
//!
//! A [`FrameView`] borrows the frame for as long as it lives, so the bytes
//! cannot be freed or resized underneath it. Every field access is checked
//! against the frame length and fails with `InvalidLength` instead of reading
//! past the end.

use super::checksum::{rfc1071_checksum, udp_checksum};
use super::layout::{eth, igmp, ipv4, udp, Composition, Field};
use crate::error::{Error, Result};

pub struct FrameView<'a> {
    bytes: &'a mut [u8],
    composition: Composition,
}

impl<'a> FrameView<'a> {
    pub fn new(bytes: &'a mut [u8], composition: Composition) -> Self {
        Self { bytes, composition }
    }

    pub fn composition(&self) -> Composition {
        self.composition
    }

    fn field(&self, field: Field) -> Result<&[u8]> {
        let available = self.bytes.len();
        self.bytes
            .get(field.offset..field.end())
            .ok_or_else(|| Error::invalid_length(field.name, field.end(), available))
    }

    fn field_mut(&mut self, field: Field) -> Result<&mut [u8]> {
        let available = self.bytes.len();
        self.bytes
            .get_mut(field.offset..field.end())
            .ok_or_else(|| Error::invalid_length(field.name, field.end(), available))
    }

    fn read<const N: usize>(&self, field: Field) -> Result<[u8; N]> {
        let bytes = self.field(field)?;
        bytes
            .try_into()
            .map_err(|_| Error::invalid_length(field.name, N, bytes.len()))
    }

    fn ip(field: Field) -> Field {
        field.at(Composition::IP_OFFSET)
    }

    fn transport(&self, field: Field) -> Field {
        field.at(self.composition.transport_offset())
    }

    fn require(&self, operation: &'static str, expected: Composition) -> Result<()> {
        if self.composition == expected {
            Ok(())
        } else {
            Err(Error::WrongComposition {
                operation,
                expected,
                actual: self.composition,
            })
        }
    }

    pub fn eth_destination(&self) -> Result<[u8; 6]> {
        self.read(eth::DESTINATION)
    }

    pub fn eth_source(&self) -> Result<[u8; 6]> {
        self.read(eth::SOURCE)
    }

    pub fn ethertype(&self) -> Result<u16> {
        self.read(eth::ETHERTYPE).map(u16::from_be_bytes)
    }

    /// Declared IPv4 header length (IHL * 4), checked to fit in the frame.
    pub fn ip_header_len(&self) -> Result<usize> {
        let [version_ihl] = self.read::<1>(Self::ip(ipv4::VERSION_IHL))?;
        let header_len = ipv4::header_len(version_ihl);
        if header_len < ipv4::LEN {
            return Err(Error::invalid_length("ip header length", ipv4::LEN, header_len));
        }
        let end = Composition::IP_OFFSET + header_len;
        if end > self.bytes.len() {
            return Err(Error::invalid_length("ip header", end, self.bytes.len()));
        }
        Ok(header_len)
    }

    pub fn ip_protocol(&self) -> Result<u8> {
        let [protocol] = self.read::<1>(Self::ip(ipv4::PROTOCOL))?;
        Ok(protocol)
    }

    pub fn ip_source(&self) -> Result<[u8; 4]> {
        self.read(Self::ip(ipv4::SOURCE))
    }

    pub fn ip_destination(&self) -> Result<[u8; 4]> {
        self.read(Self::ip(ipv4::DESTINATION))
    }

    pub fn ip_checksum(&self) -> Result<[u8; 2]> {
        self.read(Self::ip(ipv4::CHECKSUM))
    }

    pub fn udp_length(&self) -> Result<u16> {
        self.require("udp length", Composition::Udp)?;
        self.read(self.transport(udp::LENGTH)).map(u16::from_be_bytes)
    }

    pub fn udp_checksum(&self) -> Result<[u8; 2]> {
        self.require("udp checksum", Composition::Udp)?;
        self.read(self.transport(udp::CHECKSUM))
    }

    pub fn igmp_checksum(&self) -> Result<[u8; 2]> {
        self.require("igmp checksum", Composition::Igmp)?;
        self.read(self.transport(igmp::CHECKSUM))
    }

    pub fn set_eth_src(&mut self, mac: [u8; 6]) -> Result<()> {
        self.field_mut(eth::SOURCE)?.copy_from_slice(&mac);
        Ok(())
    }

    pub fn set_ip_src(&mut self, addr: [u8; 4]) -> Result<()> {
        self.field_mut(Self::ip(ipv4::SOURCE))?.copy_from_slice(&addr);
        Ok(())
    }

    /// Recomputes the IPv4 header checksum over the full declared header.
    pub fn update_ip_checksum(&mut self) -> Result<[u8; 2]> {
        let header_len = self.ip_header_len()?;
        let field = Self::ip(ipv4::CHECKSUM);
        self.field_mut(field)?.fill(0);

        let start = Composition::IP_OFFSET;
        let checksum = rfc1071_checksum(&self.bytes[start..start + header_len]);
        self.field_mut(field)?.copy_from_slice(&checksum);
        Ok(checksum)
    }

    /// Recomputes the UDP checksum, pseudo-header included.
    ///
    /// The span summed is taken from the UDP length field and must lie inside
    /// the frame.
    pub fn update_udp_checksum(&mut self) -> Result<[u8; 2]> {
        self.require("udp checksum", Composition::Udp)?;

        let start = self.composition.transport_offset();
        let udp_len = self.read::<2>(self.transport(udp::LENGTH))?;
        let segment_len = usize::from(u16::from_be_bytes(udp_len));
        if segment_len < udp::LEN {
            return Err(Error::invalid_length("udp length", udp::LEN, segment_len));
        }
        let end = start + segment_len;
        if end > self.bytes.len() {
            return Err(Error::invalid_length("udp length", end, self.bytes.len()));
        }

        let source = self.ip_source()?;
        let destination = self.ip_destination()?;
        let protocol = self.ip_protocol()?;

        let field = self.transport(udp::CHECKSUM);
        self.field_mut(field)?.fill(0);
        let checksum = udp_checksum(
            source,
            destination,
            protocol,
            udp_len,
            &self.bytes[start..end],
        );
        self.field_mut(field)?.copy_from_slice(&checksum);
        Ok(checksum)
    }

    /// Recomputes the checksum of the IGMP message (header and its one record).
    pub fn update_igmp_checksum(&mut self) -> Result<[u8; 2]> {
        self.require("igmp checksum", Composition::Igmp)?;

        let start = self.composition.transport_offset();
        let end = start + igmp::LEN;
        if end > self.bytes.len() {
            return Err(Error::invalid_length("igmp message", end, self.bytes.len()));
        }

        let field = self.transport(igmp::CHECKSUM);
        self.field_mut(field)?.fill(0);
        let checksum = rfc1071_checksum(&self.bytes[start..end]);
        self.field_mut(field)?.copy_from_slice(&checksum);
        Ok(checksum)
    }
}
