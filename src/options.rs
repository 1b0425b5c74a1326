use thiserror::Error;

pub const VERSION_TEXT: &str = concat!(
    "wkhtmltopdf (headless Chrome wrapper) ",
    env!("CARGO_PKG_VERSION"),
    " (with modern CSS support)\n",
    "Using Chromium via the DevTools protocol"
);

pub const USAGE_HINT: &str = "Usage: wkhtmltopdf <input.html> <output.pdf>\nRun with --help for more options";

pub const HELP_TEXT: &str = "
wkhtmltopdf (headless Chrome wrapper) - Modern CSS support

Usage:
  wkhtmltopdf [options] <input.html> <output.pdf>

Options:
  --page-size <size>          Paper size (A3, A4, A5, Letter, Legal, Tabloid)
  --orientation <orientation> Portrait or Landscape
  --margin-top <margin>       Top margin (e.g., 10mm, 0.5in)
  --margin-right <margin>     Right margin
  --margin-bottom <margin>    Bottom margin
  --margin-left <margin>      Left margin
  --no-background             Don't print background images
  --help, -h                  Show this help
  --version                   Show version

Examples:
  # Basic conversion
  wkhtmltopdf input.html output.pdf

  # With options
  wkhtmltopdf --page-size A4 --orientation Landscape input.html output.pdf

  # Custom margins
  wkhtmltopdf --margin-top 20mm --margin-bottom 20mm input.html output.pdf

Environment:
  CHROME                      Chrome/Chromium executable to launch
  WKHTMLTOPDF_TIMEOUT_SECS    Page load timeout in seconds (default 30)
  WKHTMLTOPDF_NO_SANDBOX      Set to 1 to launch Chrome without its sandbox
  RUST_LOG                    Diagnostic log filter (default warn)
";

const FLAG_PREFIX: &str = "--";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("Input and output files are required")]
    MissingPositionals,
}

pub type Result<T> = std::result::Result<T, UsageError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Margins {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: "10mm".to_string(),
            right: "10mm".to_string(),
            bottom: "10mm".to_string(),
            left: "10mm".to_string(),
        }
    }
}

/// Normalized conversion configuration, built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Page size name exactly as given; resolved to a paper format at export time.
    pub page_size: String,
    /// Lower-cased orientation.
    pub orientation: String,
    pub margins: Margins,
    pub print_background: bool,
    /// Local path or `http://`, `https://`, `file://` address.
    pub input: String,
    pub output: String,
}

impl Options {
    pub fn is_landscape(&self) -> bool {
        self.orientation == "landscape"
    }
}

/// What the command line asks the program to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Convert(Options),
}

/// Scans the arguments (program name excluded) left to right.
///
/// Value flags consume the following token whatever it looks like. Unknown
/// `--` flags and positionals beyond the second are ignored. `--help`, `-h`
/// and `--version` win as soon as they are reached.
pub fn parse_args<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut page_size = "A4".to_string();
    let mut orientation = "portrait".to_string();
    let mut margins = Margins::default();
    let mut print_background = true;
    let mut input: Option<String> = None;
    let mut output: Option<String> = None;

    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" => return Ok(Command::Version),
            "--no-background" => print_background = false,
            flag @ ("--page-size" | "--orientation" | "--margin-top" | "--margin-right"
            | "--margin-bottom" | "--margin-left") => {
                // A value flag in last position is dropped like any unknown flag.
                let Some(value) = args.next() else { break };
                match flag {
                    "--page-size" => page_size = value,
                    "--orientation" => orientation = value.to_lowercase(),
                    "--margin-top" => margins.top = value,
                    "--margin-right" => margins.right = value,
                    "--margin-bottom" => margins.bottom = value,
                    _ => margins.left = value,
                }
            }
            other if other.starts_with(FLAG_PREFIX) => {
                log::debug!("ignoring unrecognized option {other}");
            }
            _ => {
                if input.as_ref().is_none_or(String::is_empty) {
                    input = Some(arg);
                } else if output.as_ref().is_none_or(String::is_empty) {
                    output = Some(arg);
                } else {
                    log::debug!("ignoring extra argument {arg}");
                }
            }
        }
    }

    match (input, output) {
        (Some(input), Some(output)) if !input.is_empty() && !output.is_empty() => {
            Ok(Command::Convert(Options {
                page_size,
                orientation,
                margins,
                print_background,
                input,
                output,
            }))
        }
        _ => Err(UsageError::MissingPositionals),
    }
}
