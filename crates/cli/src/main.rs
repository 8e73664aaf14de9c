use std::process::ExitCode;

fn main() -> ExitCode {
    dealfeed_cli::run()
}
