//! Byte layouts of the headers a frame may carry.
//!
//! Every field is an offset and a width into the header it belongs to; values
//! stay as big-endian bytes in the frame and are never laid over native
//! integers. The composed offsets of each header inside a frame depend on the
//! [`Composition`] the caller picks.

/// A fixed-width field at a fixed offset from the start of its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, len: usize) -> Self {
        Self { name, offset, len }
    }

    /// Same field, relative to a header that starts `base` bytes into the frame.
    pub const fn at(self, base: usize) -> Self {
        Self {
            name: self.name,
            offset: base + self.offset,
            len: self.len,
        }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

pub mod eth {
    use super::Field;

    pub const DESTINATION: Field = Field::new("ethernet destination", 0, 6);
    pub const SOURCE: Field = Field::new("ethernet source", 6, 6);
    pub const ETHERTYPE: Field = Field::new("ethernet protocol", 12, 2);

    pub const LEN: usize = 14;
}

pub mod ipv4 {
    use super::Field;

    pub const VERSION_IHL: Field = Field::new("ip version/ihl", 0, 1);
    pub const DSCP_ECN: Field = Field::new("ip dscp/ecn", 1, 1);
    pub const TOTAL_LEN: Field = Field::new("ip total length", 2, 2);
    pub const IDENTIFICATION: Field = Field::new("ip identification", 4, 2);
    pub const FLAGS_FRAGMENT: Field = Field::new("ip flags/fragment offset", 6, 2);
    pub const TTL: Field = Field::new("ip ttl", 8, 1);
    pub const PROTOCOL: Field = Field::new("ip protocol", 9, 1);
    pub const CHECKSUM: Field = Field::new("ip header checksum", 10, 2);
    pub const SOURCE: Field = Field::new("ip source", 12, 4);
    pub const DESTINATION: Field = Field::new("ip destination", 16, 4);

    /// Fixed part of the header, i.e. IHL 5.
    pub const LEN: usize = 20;

    /// Header length in bytes declared by the low nibble of `version_ihl`.
    pub const fn header_len(version_ihl: u8) -> usize {
        ((version_ihl & 0x0F) as usize) * 4
    }
}

/// Router Alert option (RFC 2113), placed between IPv4 and IGMP.
pub mod ipopt {
    use super::Field;

    pub const TYPE: Field = Field::new("ip option type", 0, 1);
    pub const LENGTH: Field = Field::new("ip option length", 1, 1);
    pub const ROUTER_ALERT: Field = Field::new("ip option router alert", 2, 2);

    pub const LEN: usize = 4;
}

/// IGMPv3 membership report carrying exactly one group record.
pub mod igmp {
    use super::Field;

    pub const TYPE: Field = Field::new("igmp type", 0, 1);
    pub const RESERVED1: Field = Field::new("igmp reserved", 1, 1);
    pub const CHECKSUM: Field = Field::new("igmp checksum", 2, 2);
    pub const RESERVED2: Field = Field::new("igmp reserved", 4, 2);
    pub const NUM_GROUP_RECORDS: Field = Field::new("igmp group record count", 6, 2);
    pub const RECORD_TYPE: Field = Field::new("igmp record type", 8, 1);
    pub const RECORD_AUX_LEN: Field = Field::new("igmp record aux length", 9, 1);
    pub const RECORD_NUM_SOURCES: Field = Field::new("igmp record source count", 10, 2);
    pub const RECORD_MULTICAST: Field = Field::new("igmp record multicast address", 12, 4);

    pub const LEN: usize = 16;
}

pub mod udp {
    use super::Field;

    pub const SOURCE_PORT: Field = Field::new("udp source port", 0, 2);
    pub const DESTINATION_PORT: Field = Field::new("udp destination port", 2, 2);
    pub const LENGTH: Field = Field::new("udp length", 4, 2);
    pub const CHECKSUM: Field = Field::new("udp checksum", 6, 2);

    pub const LEN: usize = 8;
}

/// Which header chain a frame is assumed to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    /// Ethernet / IPv4 / UDP / payload.
    Udp,
    /// Ethernet / IPv4 / Router Alert option / IGMP.
    Igmp,
}

impl Composition {
    pub const IP_OFFSET: usize = eth::LEN;

    /// Offset of the transport header (UDP or IGMP) from the start of the frame.
    pub const fn transport_offset(self) -> usize {
        match self {
            Composition::Udp => eth::LEN + ipv4::LEN,
            Composition::Igmp => eth::LEN + ipv4::LEN + ipopt::LEN,
        }
    }

    /// Bytes needed to hold every header of the chain (no payload).
    pub const fn headers_len(self) -> usize {
        match self {
            Composition::Udp => self.transport_offset() + udp::LEN,
            Composition::Igmp => self.transport_offset() + igmp::LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(fields: &[Field], len: usize) {
        let mut offset = 0;
        for field in fields {
            assert_eq!(field.offset, offset, "gap before {}", field.name);
            offset = field.end();
        }
        assert_eq!(offset, len);
    }

    #[test]
    fn test_headers_have_no_padding() {
        assert_contiguous(&[eth::DESTINATION, eth::SOURCE, eth::ETHERTYPE], eth::LEN);
        assert_contiguous(
            &[
                ipv4::VERSION_IHL,
                ipv4::DSCP_ECN,
                ipv4::TOTAL_LEN,
                ipv4::IDENTIFICATION,
                ipv4::FLAGS_FRAGMENT,
                ipv4::TTL,
                ipv4::PROTOCOL,
                ipv4::CHECKSUM,
                ipv4::SOURCE,
                ipv4::DESTINATION,
            ],
            ipv4::LEN,
        );
        assert_contiguous(&[ipopt::TYPE, ipopt::LENGTH, ipopt::ROUTER_ALERT], ipopt::LEN);
        assert_contiguous(
            &[
                igmp::TYPE,
                igmp::RESERVED1,
                igmp::CHECKSUM,
                igmp::RESERVED2,
                igmp::NUM_GROUP_RECORDS,
                igmp::RECORD_TYPE,
                igmp::RECORD_AUX_LEN,
                igmp::RECORD_NUM_SOURCES,
                igmp::RECORD_MULTICAST,
            ],
            igmp::LEN,
        );
        assert_contiguous(
            &[udp::SOURCE_PORT, udp::DESTINATION_PORT, udp::LENGTH, udp::CHECKSUM],
            udp::LEN,
        );
    }

    #[test]
    fn test_composed_offsets() {
        assert_eq!(Composition::Udp.transport_offset(), 34);
        assert_eq!(Composition::Udp.headers_len(), 42);
        assert_eq!(Composition::Igmp.transport_offset(), 38);
        assert_eq!(Composition::Igmp.headers_len(), 54);
        assert_eq!(udp::CHECKSUM.at(34).offset, 40);
    }

    #[test]
    fn test_header_len() {
        assert_eq!(ipv4::header_len(0x45), 20);
        assert_eq!(ipv4::header_len(0x46), 24);
        assert_eq!(ipv4::header_len(0x4f), 60);
    }
}
