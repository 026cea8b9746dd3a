extern crate ctrlc;
use clap::error::ErrorKind;
use clap::Parser;
use log::LevelFilter;
use pal::lang::Listing;
use pal::mach::{Config, Event, Runtime, StdHost};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const CYCLES_PER_SLICE: usize = 5000;

#[derive(Parser, Debug)]
#[command(name = "pal")]
#[command(about = "Run a program on the PAL abstract machine")]
struct Cli {
    /// Program listing to run
    #[arg(default_value = "CODE")]
    file: PathBuf,

    /// Data stack limit in slots (0 = unbounded)
    #[arg(long, default_value_t = pal::mach::Config::default().stack_size)]
    stack_size: usize,

    /// Code storage limit in source lines (0 = unbounded)
    #[arg(long, default_value_t = pal::mach::Config::default().code_size)]
    code_size: usize,

    /// Log more detail to standard error; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Returns the process exit status.
pub fn main() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
        }
    };

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(error) = simple_logger::SimpleLogger::new().with_level(level).init() {
        eprintln!("{}", error);
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        log::warn!("Error setting Ctrl-C handler: {}", error);
    }

    let config = Config {
        stack_size: cli.stack_size,
        code_size: cli.code_size,
        source_id: cli.file.display().to_string(),
    };
    let code = match Listing::new(config.code_size).load_file(&cli.file) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.description());
            return 1;
        }
    };
    let mut runtime = match Runtime::new(code, &config, StdHost::stdio()) {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("{}", error.description());
            return 1;
        }
    };
    run(&mut runtime, &interrupted)
}

fn run(runtime: &mut Runtime<StdHost>, interrupted: &AtomicBool) -> i32 {
    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        match runtime.execute(CYCLES_PER_SLICE) {
            Event::Running => {}
            Event::Stopped => return 0,
            Event::Errors(error) => {
                let bold = std::io::stderr().is_terminal();
                eprint!("{}", runtime.report(&error, bold));
                return 1;
            }
        }
    }
}
