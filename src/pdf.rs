use crate::options::Options;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PdfError {
    #[error("Failed to parse margin value '{0}': expected a number with an optional px, in, cm or mm unit")]
    InvalidMargin(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Paper formats Chrome is asked to print on, in inches (portrait).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PageFormat {
    /// Unknown names fall back to A4. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Self {
        match name {
            "A3" => Self::A3,
            "A4" => Self::A4,
            "A5" => Self::A5,
            "Letter" => Self::Letter,
            "Legal" => Self::Legal,
            "Tabloid" => Self::Tabloid,
            _ => Self::A4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::A3 => "A3",
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
            Self::Tabloid => "Tabloid",
        }
    }

    /// (width, height) in inches.
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            Self::A3 => (11.7, 16.54),
            Self::A4 => (8.27, 11.7),
            Self::A5 => (5.83, 8.27),
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
            Self::Tabloid => (11.0, 17.0),
        }
    }
}

const PIXELS_PER_INCH: f64 = 96.0;

/// Converts a CSS-style length ("10mm", "0.5in", "2cm", "40px", "40") to inches.
///
/// A bare number is read as pixels.
pub fn length_to_inches(length: &str) -> Result<f64> {
    let trimmed = length.trim();
    let invalid = || PdfError::InvalidMargin(length.to_string());

    let (number, pixels_per_unit) = match trimmed.get(trimmed.len().saturating_sub(2)..) {
        Some(unit) if trimmed.len() > 2 => match unit.to_ascii_lowercase().as_str() {
            "px" => (&trimmed[..trimmed.len() - 2], 1.0),
            "in" => (&trimmed[..trimmed.len() - 2], PIXELS_PER_INCH),
            "cm" => (&trimmed[..trimmed.len() - 2], 37.8),
            "mm" => (&trimmed[..trimmed.len() - 2], 3.78),
            _ => (trimmed, 1.0),
        },
        _ => (trimmed, 1.0),
    };

    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }

    Ok(value * pixels_per_unit / PIXELS_PER_INCH)
}

/// Margins in inches, in the order Chrome's print call takes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginsInches {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Everything the export step needs from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfRequest {
    pub format: PageFormat,
    pub landscape: bool,
    pub margin_top: String,
    pub margin_right: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub print_background: bool,
}

impl PdfRequest {
    pub fn from_options(options: &Options) -> Self {
        Self {
            format: PageFormat::from_name(&options.page_size),
            landscape: options.is_landscape(),
            margin_top: options.margins.top.clone(),
            margin_right: options.margins.right.clone(),
            margin_bottom: options.margins.bottom.clone(),
            margin_left: options.margins.left.clone(),
            print_background: options.print_background,
        }
    }

    pub fn margins_inches(&self) -> Result<MarginsInches> {
        Ok(MarginsInches {
            top: length_to_inches(&self.margin_top)?,
            right: length_to_inches(&self.margin_right)?,
            bottom: length_to_inches(&self.margin_bottom)?,
            left: length_to_inches(&self.margin_left)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Command, parse_args};

    fn request(args: &[&str]) -> PdfRequest {
        let mut args = args.to_vec();
        args.extend(["in.html", "out.pdf"]);
        match parse_args(args).unwrap() {
            Command::Convert(options) => PdfRequest::from_options(&options),
            other => panic!("expected a conversion, got {other:?}"),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn page_formats() {
        assert_eq!(PageFormat::from_name("Tabloid"), PageFormat::Tabloid);
        assert_eq!(PageFormat::from_name("A3").name(), "A3");
        assert_eq!(PageFormat::from_name("Custom"), PageFormat::A4);
        assert_eq!(PageFormat::from_name("letter"), PageFormat::A4);
        assert_eq!(PageFormat::Letter.size_inches(), (8.5, 11.0));
    }

    #[test]
    fn unknown_page_size_prints_on_a4() {
        assert_eq!(request(&["--page-size", "Custom"]).format, PageFormat::A4);
        assert_eq!(request(&["--page-size", "Legal"]).format, PageFormat::Legal);
    }

    #[test]
    fn landscape_only_for_exact_lowercase_match() {
        assert!(request(&["--orientation", "Landscape"]).landscape);
        assert!(request(&["--orientation", "LANDSCAPE"]).landscape);
        assert!(!request(&["--orientation", "portrait"]).landscape);
        assert!(!request(&["--orientation", "landscap"]).landscape);
        assert!(!request(&[]).landscape);
    }

    #[test]
    fn margins_and_background_pass_through() {
        let request = request(&["--margin-left", "1in", "--no-background"]);
        assert_eq!(request.margin_left, "1in");
        assert_eq!(request.margin_top, "10mm");
        assert!(!request.print_background);
    }

    #[test]
    fn lengths() {
        assert!(close(length_to_inches("1in").unwrap(), 1.0));
        assert!(close(length_to_inches("96px").unwrap(), 1.0));
        assert!(close(length_to_inches("96").unwrap(), 1.0));
        assert!(close(length_to_inches("2.54cm").unwrap(), 2.54 * 37.8 / 96.0));
        assert!(close(length_to_inches("10mm").unwrap(), 10.0 * 3.78 / 96.0));
        assert!(close(length_to_inches(" 0 ").unwrap(), 0.0));
        assert!(close(length_to_inches("5MM").unwrap(), 5.0 * 3.78 / 96.0));
    }

    #[test]
    fn bad_lengths() {
        for bad in ["abc", "", "mm", "10pt", "-5mm", "NaNpx"] {
            assert_eq!(
                length_to_inches(bad),
                Err(PdfError::InvalidMargin(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn request_margins_in_inches() {
        let margins = request(&["--margin-top", "1in", "--margin-bottom", "48px"])
            .margins_inches()
            .unwrap();
        assert!(close(margins.top, 1.0));
        assert!(close(margins.bottom, 0.5));

        let err = request(&["--margin-right", "wide"]).margins_inches().unwrap_err();
        assert_eq!(err, PdfError::InvalidMargin("wide".to_string()));
    }
}
