use std::process::ExitCode;
use wkhtmltopdf_chrome::browser::Browser;
use wkhtmltopdf_chrome::config::Settings;
use wkhtmltopdf_chrome::convert;
use wkhtmltopdf_chrome::logger::init_logger;
use wkhtmltopdf_chrome::options::{self, Command};

/// Converts an HTML file or URL to PDF with headless Chrome,
/// accepting the common wkhtmltopdf options
#[tokio::main]
async fn main() -> ExitCode {
    init_logger();

    let options = match options::parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{}", options::HELP_TEXT);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("{}", options::VERSION_TEXT);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Convert(options)) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", options::USAGE_HINT);
            return ExitCode::FAILURE;
        }
    };

    let settings = Settings::from_env();
    log::debug!("converting {:?} with {:?}", options, settings);

    match convert::convert(&options, move || Browser::launch(&settings)).await {
        Ok(()) => {
            println!("✓ PDF created successfully: {}", options.output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(suggestion) = e.suggestion() {
                eprintln!("  Suggestion: {suggestion}");
            }
            ExitCode::FAILURE
        }
    }
}
