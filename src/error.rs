//! Error types for raw_send

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::net::layout::Composition;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification used when reporting a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad hex, unknown interface, conflicting options, unreadable dump file.
    FatalInput,
    /// A length (declared or structural) reaches past the end of the frame.
    InvalidLength,
    /// The raw socket could not be opened or the frame could not be sent.
    FatalIo,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("hex string must have an even number of characters (got {len})")]
    OddHexLength { len: usize },

    #[error("hex string contains non-hex at position {position}: {rest}")]
    NonHexCharacter { position: usize, rest: String },

    #[error("hex string too large for buffer ({bytes} bytes, capacity {capacity})")]
    HexTooLarge { bytes: usize, capacity: usize },

    #[error("invalid interface name '{0}'")]
    InterfaceName(String),

    #[error("interface '{0}' not found")]
    InterfaceNotFound(String),

    #[error("interface '{0}' has no IPv4 address")]
    NoIpv4Address(String),

    #[error("interface '{0}' has no hardware address")]
    NoHardwareAddress(String),

    #[error("{operation} failed for interface '{interface}'")]
    InterfaceLookup {
        interface: String,
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("cannot overwrite both the UDP and the IGMP checksum of one frame")]
    ConflictingChecksums,

    #[error("{operation} needs a {expected:?} frame, view is {actual:?}")]
    WrongComposition {
        operation: &'static str,
        expected: Composition,
        actual: Composition,
    },

    #[error("invalid length for {field}: need {required} bytes, have {available}")]
    InvalidLength {
        field: &'static str,
        required: usize,
        available: usize,
    },

    #[error("could not read dump file {}", .path.display())]
    DumpFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no frames found in {0}")]
    NoFrames(String),

    #[error("could not open raw packet socket")]
    Socket(#[source] io::Error),

    #[error("sendto on interface index {ifindex} failed")]
    Transmit {
        ifindex: u32,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidLength { .. } => ErrorKind::InvalidLength,
            Error::Socket(_) | Error::Transmit { .. } => ErrorKind::FatalIo,
            _ => ErrorKind::FatalInput,
        }
    }

    pub(crate) fn invalid_length(field: &'static str, required: usize, available: usize) -> Self {
        Error::InvalidLength {
            field,
            required,
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Error::OddHexLength { len: 3 }.kind(), ErrorKind::FatalInput);
        assert_eq!(Error::ConflictingChecksums.kind(), ErrorKind::FatalInput);
        assert_eq!(
            Error::InterfaceNotFound("nope0".to_string()).kind(),
            ErrorKind::FatalInput
        );
        assert_eq!(
            Error::invalid_length("udp length", 40, 30).kind(),
            ErrorKind::InvalidLength
        );
        let err = Error::Transmit {
            ifindex: 2,
            source: io::Error::from_raw_os_error(libc::ENETDOWN),
        };
        assert_eq!(err.kind(), ErrorKind::FatalIo);
    }

    #[test]
    fn test_lookup_error_keeps_os_error() {
        let err = Error::InterfaceLookup {
            interface: "nope0".to_string(),
            operation: "SIOCGIFMTU",
            source: io::Error::from_raw_os_error(libc::ENODEV),
        };
        assert_eq!(err.kind(), ErrorKind::FatalInput);
        assert_eq!(err.to_string(), "SIOCGIFMTU failed for interface 'nope0'");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert!(source.is_some());
    }
}
