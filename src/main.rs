use std::process::ExitCode;

fn main() -> ExitCode {
    docsight::cli::run()
}
