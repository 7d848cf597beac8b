//! RFC 1071 Internet checksum, computed incrementally.
//!
//! A running sum is fed one span at a time with [`fold`] and turned into the
//! wire value with [`finalize`]. The IPv4 header and IGMP checksums are a
//! single span; the UDP checksum chains the IPv4 pseudo-header in front of the
//! segment (see [`udp_checksum`]).

/// Adds `data` to the running sum `acc`, one big-endian 16-bit word at a time.
///
/// An odd trailing byte is the high byte of a word whose low byte is zero.
/// The sum is folded back to 16 bits after every word, so the returned value
/// never exceeds `0xFFFF` and can be passed straight into the next call.
pub fn fold(mut acc: u32, data: &[u8]) -> u32 {
    for word in data.chunks(2) {
        let word = match word {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [hi] => u16::from_be_bytes([*hi, 0]),
            _ => 0,
        };
        let sum = u64::from(acc) + u64::from(word);
        acc = ((sum & 0xFFFF) + (sum >> 16)) as u32;
    }
    acc
}

/// One's complement of the folded sum, most significant byte first.
pub fn finalize(mut acc: u32) -> [u8; 2] {
    while acc >> 16 != 0 {
        acc = (acc & 0xFFFF) + (acc >> 16);
    }
    (!(acc as u16)).to_be_bytes()
}

/// Checksum of a single contiguous buffer (IPv4 header, IGMP message).
///
/// The checksum field inside `buffer` must already be zeroed.
pub fn rfc1071_checksum(buffer: &[u8]) -> [u8; 2] {
    finalize(fold(0, buffer))
}

/// UDP checksum over the IPv4 pseudo-header followed by `segment`.
///
/// `udp_len` is the length field exactly as it sits in the UDP header; it is
/// summed as given and not recomputed from `segment`. The caller passes the
/// UDP header plus payload with the checksum field zeroed.
///
/// A computed value of zero is sent as `0xFFFF` (RFC 768), since zero on the
/// wire means the sender supplied no checksum.
pub fn udp_checksum(
    source: [u8; 4],
    destination: [u8; 4],
    protocol: u8,
    udp_len: [u8; 2],
    segment: &[u8],
) -> [u8; 2] {
    let mut acc = fold(0, &source);
    acc = fold(acc, &destination);
    acc = fold(acc, &[0, protocol]);
    acc = fold(acc, &udp_len);
    acc = fold(acc, segment);

    match finalize(acc) {
        [0, 0] => [0xFF, 0xFF],
        checksum => checksum,
    }
}
