//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    dealflow_cli::init_logging();
    if let Err(err) = dealflow_cli::run() {
        eprintln!("dealflow: {err}");
        std::process::exit(1);
    }
}
