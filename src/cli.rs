//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use crate::frame::OverwriteOptions;

#[derive(Parser, Debug)]
#[command(name = "raw_send")]
#[command(version, about = "Send an arbitrary Ethernet frame given as hex", long_about = None)]
pub struct Cli {
    /// Overwrite the IP header checksum with the calculated value
    #[arg(short = 'c', long)]
    pub ip_checksum: bool,

    /// Overwrite the Ethernet source address with the interface MAC
    #[arg(short = 'e', long = "eth-src")]
    pub eth_src_mac: bool,

    /// Overwrite the IGMP checksum with the calculated value
    #[arg(short = 'g', long, conflicts_with = "udp_checksum")]
    pub igmp_checksum: bool,

    /// Overwrite the IP source address with the interface address
    #[arg(short = 'i', long = "ip-src")]
    pub ip_src_addr: bool,

    /// Overwrite the UDP checksum with the calculated value
    #[arg(short = 'u', long)]
    pub udp_checksum: bool,

    /// Send every packet of a hex dump file instead of a single hex string
    #[arg(short = 'f', long, value_name = "PATH")]
    pub dump_file: Option<PathBuf>,

    /// Pause between packets of a dump file, in milliseconds
    #[arg(long, value_name = "MS", default_value = "20")]
    pub gap_ms: u64,

    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Device name (e.g. 'eth0')
    pub interface: String,

    /// Hex string with no spaces containing the Ethernet header, IP, etc.
    #[arg(required_unless_present = "dump_file", conflicts_with = "dump_file")]
    pub hex_data: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn options(&self) -> OverwriteOptions {
        OverwriteOptions {
            ip_checksum: self.ip_checksum,
            eth_src_mac: self.eth_src_mac,
            igmp_checksum: self.igmp_checksum,
            ip_src_addr: self.ip_src_addr,
            udp_checksum: self.udp_checksum,
        }
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
