use crate::browser::{BrowserError, Engine, Page};
use crate::options::Options;
use crate::pdf::PdfRequest;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use url::Url;

const PASS_THROUGH_SCHEMES: [&str; 3] = ["http://", "https://", "file://"];

/// Scratch files are created owner-only; the finished PDF gets the usual mode.
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Cannot build a file URL from {}", .0.display())]
    FileUrl(PathBuf),
    #[error("{0}")]
    Browser(#[from] BrowserError),
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl ConvertError {
    /// A short hint shown under the error message.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InputNotFound(_) => Some("Check the file path and ensure you have read permissions"),
            Self::Browser(BrowserError::Launch(_)) => Some(
                "Install Chrome or Chromium, or point the CHROME environment variable at its executable",
            ),
            Self::Browser(BrowserError::Navigation { .. } | BrowserError::NetworkIdleTimeout { .. }) => {
                Some("Check that the address is reachable; raise WKHTMLTOPDF_TIMEOUT_SECS for slow pages")
            }
            Self::Browser(BrowserError::Margin(_)) => Some("Use margins such as 10mm, 1cm, 0.5in or 20px"),
            Self::Write { .. } => Some("Check file permissions and ensure the output directory exists"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Turns the input reference into an address the browser can load.
///
/// `http://`, `https://` and `file://` inputs are returned untouched. Anything
/// else is a local path, made absolute against `cwd` and required to exist.
pub fn resolve_address(input: &str, cwd: &Path) -> Result<String> {
    if PASS_THROUGH_SCHEMES.iter().any(|scheme| input.starts_with(scheme)) {
        return Ok(input.to_string());
    }

    let absolute = normalize(&cwd.join(input));
    if !absolute.exists() {
        return Err(ConvertError::InputNotFound(absolute));
    }

    let url = Url::from_file_path(&absolute).map_err(|_| ConvertError::FileUrl(absolute.clone()))?;
    Ok(url.to_string())
}

/// Lexically removes `.` and `..` components, like path resolution in a shell.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Resolves the input, then loads and prints it with an engine from `launch`.
///
/// The browser session blocks, so it runs on tokio's blocking pool. The engine
/// is dropped, and so released, on every path out of the session.
pub async fn convert<L, E>(options: &Options, launch: L) -> Result<()>
where
    L: FnOnce() -> crate::browser::Result<E> + Send + 'static,
    E: Engine,
{
    let cwd = std::env::current_dir()?;
    let address = resolve_address(&options.input, &cwd)?;
    let request = PdfRequest::from_options(options);
    let output = PathBuf::from(&options.output);

    tokio::task::spawn_blocking(move || render(launch, &address, &request, &output)).await?
}

fn render<L, E>(launch: L, address: &str, request: &PdfRequest, output: &Path) -> Result<()>
where
    L: FnOnce() -> crate::browser::Result<E>,
    E: Engine,
{
    let engine = launch()?;
    let page = engine.open_page()?;

    println!("Loading {address}...");
    page.navigate(address)?;

    println!("Generating PDF...");
    let pdf = page.print_to_pdf(request)?;
    log::info!("rendered {} bytes of PDF", pdf.len());

    write_output(output, &pdf)
}

/// Writes the PDF next to `path` and renames it into place, replacing any
/// existing file only once the new content is complete. On failure the
/// existing file is untouched and the scratch file is removed on drop.
fn write_output(path: &Path, pdf: &[u8]) -> Result<()> {
    let write_error = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut scratch = tempfile::Builder::new()
        .prefix(".wkhtmltopdf-")
        .suffix(".pdf.part")
        .tempfile_in(parent)
        .map_err(write_error)?;
    scratch.write_all(pdf).map_err(write_error)?;
    scratch.as_file().sync_all().map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        scratch
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(OUTPUT_MODE))
            .map_err(write_error)?;
    }

    scratch.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
