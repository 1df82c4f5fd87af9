use clap::error::ErrorKind;
use lc::cli::{init_logging, parse_args, run_cli};
use lc::signals;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(errors) => {
            for e in &errors {
                eprint!("{}", e.render());
            }
            let failed = errors.iter().any(|e| {
                !matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
            });
            if !failed {
                return ExitCode::SUCCESS;
            }
            eprintln!("\nAborted due to parameter errors");
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.debug);

    if let Err(e) = signals::install() {
        tracing::warn!("Could not install interrupt handler: {}", e);
    }

    if let Err(e) = run_cli(&cli) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
