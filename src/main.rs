use std::io::Write;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use cloudkeep::config::Settings;
use cloudkeep::report::write_report;

fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut out = std::io::stdout().lock();
    let written = write_report(&mut out, &settings).and_then(|()| Ok(out.flush()?));
    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "demonstration failed");
            ExitCode::FAILURE
        }
    }
}
