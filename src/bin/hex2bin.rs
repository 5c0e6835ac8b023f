use std::fs;
use std::process::ExitCode;

use clap::Parser;
use orange4::Error;

/// Converts a line-oriented hex-record file into a packed 128-byte image.
#[derive(Parser)]
#[command(name = "hex2bin")]
struct Args {
    /// Path to the hex-record input file.
    #[arg(long)]
    input: String,

    /// Path to write the packed 128-byte image to.
    #[arg(long)]
    output: String,
}

fn run(args: Args) -> Result<(), Error> {
    let text = fs::read_to_string(&args.input)?;
    let image = orange4::hex::pack_hex(&text)?;
    fs::write(&args.output, image)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hex2bin: {e}");
            ExitCode::FAILURE
        }
    }
}
