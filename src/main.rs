use clap::Parser;
use radar::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    radar::logging::init_tracing();
    run(Cli::parse())
}
