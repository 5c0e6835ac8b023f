use std::io::{stdout, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, terminal};
use scheduled_thread_pool::ScheduledThreadPool;

use orange4::{Error, VmHandle, HZ};

const TICK_WORKER_THREADS: usize = 1;
const ZERO_DURATION: Duration = Duration::from_secs(0);
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / HZ as u64);

/// Runs a program image against the core and renders its display in the
/// terminal.
#[derive(Parser)]
#[command(name = "monitor")]
struct Args {
    /// Path to the 128-byte program image.
    #[arg(long)]
    input: String,

    /// Release all keys after every tick instead of waiting for a key-up
    /// event (terminal key-repeat does not reliably report release).
    #[arg(long)]
    step: bool,
}

fn key_to_index(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::Char(c @ '0'..='9') => Some(c as u8 - b'0'),
        KeyCode::Char(c @ 'a'..='f') => Some(c as u8 - b'a' + 0xA),
        KeyCode::Char(c @ 'A'..='F') => Some(c as u8 - b'A' + 0xA),
        _ => None,
    }
}

fn render(out: &mut impl Write, vm: &VmHandle) -> std::io::Result<()> {
    execute!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    write!(
        out,
        "numeric: {:x}   binary: {:07b}\r\ntrace:   {}\r\n(q to quit)\r\n",
        vm.get_numeric_led(),
        vm.get_binary_led(),
        vm.last_trace(),
    )?;
    out.flush()
}

fn run(args: Args) -> Result<(), Error> {
    let bytes = std::fs::read(&args.input)?;
    let image: [u8; orange4::memory::IMAGE_BYTES] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::ImageSize { got: bytes.len() })?;

    let vm = VmHandle::new(image);
    let scheduler = ScheduledThreadPool::new(TICK_WORKER_THREADS);
    let ticker = vm.clone();
    let _handle = scheduler.execute_at_fixed_rate(ZERO_DURATION, TICK_DURATION, move || {
        ticker.tick();
    });

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    let result = (|| -> std::io::Result<()> {
        loop {
            render(&mut out, &vm)?;
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.code == KeyCode::Esc || key.code == KeyCode::Char('q') {
                            break;
                        }
                        if let Some(idx) = key_to_index(key.code) {
                            vm.press_key(idx);
                        }
                    }
                    _ => {}
                }
            }
            if args.step {
                vm.release_all_keys();
            }
        }
        Ok(())
    })();
    terminal::disable_raw_mode()?;
    result?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("monitor: {e}");
            ExitCode::FAILURE
        }
    }
}
