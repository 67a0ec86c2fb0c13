use derive_more::{Display, Error};
use exn::ResultExt;
use std::process::ExitCode;
use subindex_config::Config;
use subindex_index::Report;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Display, Error)]
enum ErrorKind {
    #[display("unable to load configuration")]
    Config,
    #[display("index build failed")]
    Build,
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for the build summary.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

fn run() -> Result<Report, exn::Exn<ErrorKind>> {
    let config = Config::load().or_raise(|| ErrorKind::Config)?;
    tracing::info!("Building subtitles-only index");
    subindex_index::build(&config).or_raise(|| ErrorKind::Build)
}

fn print_report(report: &Report) {
    let summary = &report.summary;
    println!(
        "Done! Optimized index: {} files with subtitles, {} tracks",
        summary.files_with_subtitles, summary.total_subtitle_tracks
    );
    let languages: Vec<String> = summary.available_languages.iter().map(|lang| format!("'{lang}'")).collect();
    println!("Languages found: [{}]", languages.join(", "));
}
