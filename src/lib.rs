//! Drop-in `wkhtmltopdf` replacement that renders with headless Chrome.
//!
//! [`options::parse_args`] turns the command line into [`options::Options`];
//! [`convert::convert`] loads the input in a browser page and prints it to PDF.

pub mod browser;
pub mod config;
pub mod convert;
pub mod logger;
pub mod options;
pub mod pdf;
