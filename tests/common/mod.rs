use pal::lang::Listing;
use pal::mach::{BufferHost, Config, Event, Runtime};

pub struct Outcome {
    pub output: String,
    pub status: i32,
    pub report: String,
}

pub fn exec(source: &str) -> Outcome {
    exec_with_input(source, "")
}

pub fn exec_with_input(source: &str, input: &str) -> Outcome {
    exec_with(source, input, &Config::default())
}

pub fn exec_with(source: &str, input: &str, config: &Config) -> Outcome {
    let code = match Listing::new(config.code_size).load_str(source) {
        Ok(code) => code,
        Err(error) => {
            return Outcome {
                output: String::new(),
                status: 1,
                report: format!("{}\n", error.description()),
            }
        }
    };
    let mut runtime = Runtime::new(code, config, BufferHost::with_input(input)).unwrap();
    let event = runtime.run();
    let report = match &event {
        Event::Errors(error) => runtime.report(error, false),
        _ => String::new(),
    };
    Outcome {
        output: runtime.host().output(),
        status: event.exit_code(),
        report,
    }
}

/// Joins instructions into a listing, one per line.
pub fn listing(lines: &[&str]) -> String {
    lines.join("\n")
}
