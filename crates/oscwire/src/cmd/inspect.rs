use std::io::Read;

use oscwire_message::OscMessage;

use crate::cmd::InspectArgs;
use crate::exit::{io_error, osc_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = if args.input.as_os_str() == "-" {
        let mut v = Vec::new();
        std::io::stdin()
            .read_to_end(&mut v)
            .map_err(|err| io_error("read stdin", err))?;
        v
    } else {
        std::fs::read(&args.input).map_err(|err| io_error("read packet file", err))?
    };

    let mut msg = OscMessage::new(bytes.as_slice());
    if args.lenient {
        msg.parse();
    } else {
        msg.try_parse()
            .map_err(|err| osc_error("parse packet", err))?;
    }
    tracing::debug!(
        address = msg.address(),
        args = msg.arg_count(),
        "decoded packet"
    );

    print_message(&msg, args.lenient, format)
        .map_err(|err| osc_error("decode arguments", err))?;
    Ok(SUCCESS)
}
