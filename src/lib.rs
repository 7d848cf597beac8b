//! Build one raw Ethernet frame from hex, patch selected fields from the
//! outgoing interface, and send it at the link layer.

pub mod cli;
pub mod error;
pub mod frame;
pub mod hextools;
pub mod iface;
pub mod net;
pub mod transmit;

pub use error::{Error, ErrorKind, Result};
pub use frame::{Frame, OverwriteOptions};
