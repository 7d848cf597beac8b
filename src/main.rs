use std::error::Error as _;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use raw_send::cli::Cli;
use raw_send::frame::prepare_frames;
use raw_send::hextools::{format_hexdump, read_dump_file};
use raw_send::iface::InterfaceInfo;
use raw_send::transmit::RawSender;
use raw_send::Result;
use tracing::{debug, error, info};

fn run(cli: &Cli) -> Result<()> {
    let options = cli.options();
    options.validate()?;

    let sender = RawSender::open()?;
    let iface = InterfaceInfo::lookup(&sender, &cli.interface)?;

    let packets = match (&cli.dump_file, &cli.hex_data) {
        (Some(path), _) => read_dump_file(path)?,
        (None, Some(hex)) => vec![hex.clone()],
        (None, None) => Vec::new(),
    };
    let frames = prepare_frames(&packets[..], options, &iface)?;
    info!(count = frames.len(), interface = %iface.name, "frames to send");

    for (i, frame) in frames.iter().enumerate() {
        if i > 0 {
            thread::sleep(Duration::from_millis(cli.gap_ms));
        }

        frame.log_summary();
        debug!("frame bytes:\n{}", format_hexdump(frame.as_bytes()));
        sender.send(frame.as_bytes(), iface.index)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut message = err.to_string();
            let mut source = err.source();
            while let Some(cause) = source {
                message.push_str(&format!(": {}", cause));
                source = cause.source();
            }
            error!(kind = ?err.kind(), "{}", message);
            ExitCode::FAILURE
        }
    }
}
