use crate::config::Settings;
use crate::pdf::{PdfError, PdfRequest};
use headless_chrome::protocol::cdp::Page::SetLifecycleEventsEnabled;
use headless_chrome::protocol::cdp::Target::TargetID;
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::util::Wait;
use headless_chrome::{LaunchOptions, Tab};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Extra slack so headless_chrome does not drop a connection that is
/// legitimately quiet while we wait on a slow page.
const IDLE_BROWSER_GRACE: Duration = Duration::from_secs(30);
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(anyhow::Error),
    #[error("Failed to open a browser page: {0}")]
    OpenPage(anyhow::Error),
    #[error("Failed to load {address}: {source}")]
    Navigation {
        address: String,
        source: anyhow::Error,
    },
    #[error("Timeout {}ms exceeded waiting for network idle on {address}", .timeout.as_millis())]
    NetworkIdleTimeout { address: String, timeout: Duration },
    #[error("PDF generation failed: {0}")]
    Export(anyhow::Error),
    #[error("{0}")]
    Margin(#[from] PdfError),
}

pub type Result<T> = std::result::Result<T, BrowserError>;

/// A running rendering engine. Dropping it releases the engine.
pub trait Engine {
    type Page: Page;

    /// Opens a page inside a fresh, isolated browsing context.
    fn open_page(&self) -> Result<Self::Page>;
}

pub trait Page {
    /// Loads `address` and returns once the network has gone idle.
    fn navigate(&self, address: &str) -> Result<()>;

    fn print_to_pdf(&self, request: &PdfRequest) -> Result<Vec<u8>>;
}

pub struct Browser {
    inner: headless_chrome::Browser,
    timeout: Duration,
}

impl Browser {
    pub fn launch(settings: &Settings) -> Result<Self> {
        let options = LaunchOptions {
            headless: true,
            sandbox: settings.sandbox,
            path: settings.chrome_path.clone(),
            idle_browser_timeout: settings.timeout + IDLE_BROWSER_GRACE,
            ..Default::default()
        };

        log::debug!("launching headless browser (path: {:?})", settings.chrome_path);
        let browser = headless_chrome::Browser::new(options).map_err(BrowserError::Launch)?;

        Ok(Self {
            inner: browser,
            timeout: settings.timeout,
        })
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        log::debug!("closing headless browser");
    }
}

pub struct ChromePage {
    tab: Arc<Tab>,
    network_idle: Arc<AtomicBool>,
    timeout: Duration,
}

impl Engine for Browser {
    type Page = ChromePage;

    fn open_page(&self) -> Result<ChromePage> {
        let context = self.inner.new_context().map_err(BrowserError::OpenPage)?;
        let tab = context.new_tab().map_err(BrowserError::OpenPage)?;

        let timeout = self.timeout;
        tab.set_default_timeout(timeout);
        tab.call_method(SetLifecycleEventsEnabled { enabled: true })
            .map_err(BrowserError::OpenPage)?;

        let network_idle = Arc::new(AtomicBool::new(false));
        let main_frame = tab.get_target_id().clone();
        let flag = Arc::clone(&network_idle);
        tab.add_event_listener(Arc::new(move |event: &Event| {
            track_network_idle(event, &main_frame, &flag)
        }))
        .map_err(BrowserError::OpenPage)?;

        Ok(ChromePage {
            tab,
            network_idle,
            timeout,
        })
    }
}

/// Keeps `idle` in step with the main frame's lifecycle: a new document
/// (`init`) clears it and `networkIdle` sets it. Sub-frames are ignored.
fn track_network_idle(event: &Event, main_frame: &TargetID, idle: &AtomicBool) {
    let Event::PageLifecycleEvent(lifecycle) = event else {
        return;
    };
    if lifecycle.params.frame_id != *main_frame {
        return;
    }
    match lifecycle.params.name.as_str() {
        "init" => idle.store(false, Ordering::SeqCst),
        "networkIdle" => idle.store(true, Ordering::SeqCst),
        _ => {}
    }
}

impl Page for ChromePage {
    fn navigate(&self, address: &str) -> Result<()> {
        let navigation_error = |source| BrowserError::Navigation {
            address: address.to_string(),
            source,
        };
        let started = Instant::now();

        self.network_idle.store(false, Ordering::SeqCst);
        self.tab
            .navigate_to(address)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(navigation_error)?;

        let remaining = self.timeout.saturating_sub(started.elapsed());
        Wait::new(remaining, IDLE_POLL_INTERVAL)
            .until(|| self.network_idle.load(Ordering::SeqCst).then_some(()))
            .map_err(|_| BrowserError::NetworkIdleTimeout {
                address: address.to_string(),
                timeout: self.timeout,
            })?;

        log::debug!("{address} reached network idle after {:?}", started.elapsed());
        Ok(())
    }

    fn print_to_pdf(&self, request: &PdfRequest) -> Result<Vec<u8>> {
        let margins = request.margins_inches()?;
        let (paper_width, paper_height) = request.format.size_inches();

        let options = PrintToPdfOptions {
            landscape: Some(request.landscape),
            print_background: Some(request.print_background),
            paper_width: Some(paper_width),
            paper_height: Some(paper_height),
            margin_top: Some(margins.top),
            margin_right: Some(margins.right),
            margin_bottom: Some(margins.bottom),
            margin_left: Some(margins.left),
            prefer_css_page_size: Some(false),
            ..Default::default()
        };

        log::debug!("printing {} page (landscape: {})", request.format.name(), request.landscape);
        self.tab
            .print_to_pdf(Some(options))
            .map_err(BrowserError::Export)
    }
}
