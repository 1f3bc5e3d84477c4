//! # Signature Appearance
//!
//! Turns user-placed signature positions into drawing instructions for the PDF collaborator.
//!
//! Positions are given in top-left screen coordinates (`y` grows downwards, as the user placed
//! them over a rendered page). PDF space has its origin at the bottom-left, so every box is
//! flipped against the height of its page:
//!
//! ```text
//! pdf_y = page_height - y - height
//! ```
//!
//! Text lines start 10 points in from the left edge of the box and sit 30, 45, 60 and 75
//! points below its top edge.

use chrono::NaiveDate;
use penmark_kernel::domain::config::SigningConfig;
use penmark_kernel::domain::constants::DEFAULT_SIGNATURE_REASON;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::debug;

const TEXT_INSET: f32 = 10.0;
const SIGNER_OFFSET: f32 = 30.0;
const DATE_OFFSET: f32 = 45.0;
const REASON_OFFSET: f32 = 60.0;
const LOCATION_OFFSET: f32 = 75.0;

const SIGNER_FONT_SIZE: f32 = 10.0;
const DETAIL_FONT_SIZE: f32 = 8.0;

/// Where a signature box goes, in top-left page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignaturePosition {
    /// 1-based page number.
    pub page: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for SignaturePosition {
    fn default() -> Self {
        Self { page: 1, x: 100.0, y: 100.0, width: 200.0, height: 100.0 }
    }
}

impl SignaturePosition {
    /// Zero-based index of the target page if it exists among `page_count` pages.
    #[must_use]
    pub fn page_index(&self, page_count: usize) -> Option<usize> {
        let index = usize::try_from(self.page).ok()?.checked_sub(1)?;
        (index < page_count).then_some(index)
    }
}

/// Where the signing key lives.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SignatureSource {
    /// A PKCS#12 certificate file.
    #[default]
    #[strum(to_string = "PKCS12")]
    Pkcs12,
    /// A hardware security module.
    #[strum(to_string = "HSM")]
    Hsm,
}

/// Text printed inside every signature box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureOptions {
    /// Replaces the default "Digitally signed by: <SOURCE>" line.
    pub signer_text: Option<String>,
    pub source: SignatureSource,
    pub reason: Option<String>,
    pub location: Option<String>,
}

impl Default for SignatureOptions {
    fn default() -> Self {
        Self {
            signer_text: None,
            source: SignatureSource::default(),
            reason: Some(DEFAULT_SIGNATURE_REASON.to_owned()),
            location: None,
        }
    }
}

impl SignatureOptions {
    /// Options seeded with the configured reason and location.
    #[must_use]
    pub fn from_config(config: &SigningConfig) -> Self {
        Self {
            reason: Some(config.reason.clone()),
            location: config.location.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn signer_line(&self) -> String {
        non_blank(self.signer_text.as_deref())
            .map_or_else(|| format!("Digitally signed by: {}", self.source), str::to_owned)
    }
}

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// ISO A4 portrait.
    pub const A4: Self = Self::new(595.28, 841.89);
    /// US Letter portrait.
    pub const LETTER: Self = Self::new(612.0, 792.0);
}

/// Rectangle in PDF space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const LIGHT_GREY: Self = Self { r: 0.9, g: 0.9, b: 0.9, a: 0.3 };
}

/// One line of text in PDF space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// A bordered box and its text on one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppearanceBox {
    /// Zero-based page index.
    pub page_index: usize,
    pub rect: Rect,
    pub border_width: f32,
    pub border_color: Color,
    pub fill_color: Color,
    pub lines: Vec<TextLine>,
}

/// Everything the PDF collaborator has to draw.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppearancePlan {
    pub boxes: Vec<AppearanceBox>,
}

impl AppearancePlan {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Lays out one box per position whose page exists; others are skipped.
#[must_use]
pub fn plan_appearance(
    page_sizes: &[PageSize],
    positions: &[SignaturePosition],
    options: &SignatureOptions,
    date: NaiveDate,
) -> AppearancePlan {
    let signer = options.signer_line();
    let date_line = format!("Date: {}", date.format("%Y-%m-%d"));
    let reason = non_blank(options.reason.as_deref()).map(|r| format!("Reason: {r}"));
    let location = non_blank(options.location.as_deref()).map(|l| format!("Location: {l}"));

    let boxes = positions
        .iter()
        .filter_map(|position| {
            let Some(page_index) = position.page_index(page_sizes.len()) else {
                debug!(
                    page = position.page,
                    pages = page_sizes.len(),
                    "Skipping signature position outside the document"
                );
                return None;
            };
            let page_height = page_sizes[page_index].height;
            let top = page_height - position.y;

            let line = |text: &str, offset: f32, size: f32| TextLine {
                text: text.to_owned(),
                x: position.x + TEXT_INSET,
                y: top - offset,
                size,
            };

            let mut lines = vec![
                line(&signer, SIGNER_OFFSET, SIGNER_FONT_SIZE),
                line(&date_line, DATE_OFFSET, DETAIL_FONT_SIZE),
            ];
            lines.extend(reason.as_deref().map(|r| line(r, REASON_OFFSET, DETAIL_FONT_SIZE)));
            lines.extend(location.as_deref().map(|l| line(l, LOCATION_OFFSET, DETAIL_FONT_SIZE)));

            Some(AppearanceBox {
                page_index,
                rect: Rect {
                    x: position.x,
                    y: page_height - position.y - position.height,
                    width: position.width,
                    height: position.height,
                },
                border_width: 1.0,
                border_color: Color::BLACK,
                fill_color: Color::LIGHT_GREY,
                lines,
            })
        })
        .collect();

    AppearancePlan { boxes }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_index_is_one_based_and_bounded() {
        let at = |page| SignaturePosition { page, ..SignaturePosition::default() };
        assert_eq!(at(0).page_index(3), None);
        assert_eq!(at(1).page_index(3), Some(0));
        assert_eq!(at(3).page_index(3), Some(2));
        assert_eq!(at(4).page_index(3), None);
    }

    #[test]
    fn source_renders_upper_case() {
        assert_eq!(SignatureSource::Pkcs12.to_string(), "PKCS12");
        assert_eq!("hsm".parse::<SignatureSource>().unwrap(), SignatureSource::Hsm);
        assert_eq!(
            SignatureOptions { source: SignatureSource::Hsm, ..SignatureOptions::default() }
                .signer_line(),
            "Digitally signed by: HSM"
        );
    }

    #[test]
    fn blank_signer_text_falls_back_to_default() {
        let options =
            SignatureOptions { signer_text: Some("   ".to_owned()), ..SignatureOptions::default() };
        assert_eq!(options.signer_line(), "Digitally signed by: PKCS12");
    }

    #[test]
    fn config_seeds_reason_and_location() {
        let config =
            SigningConfig { reason: "Approved".to_owned(), location: Some("Kyiv".to_owned()) };
        let options = SignatureOptions::from_config(&config);
        assert_eq!(options.reason.as_deref(), Some("Approved"));
        assert_eq!(options.location.as_deref(), Some("Kyiv"));
    }
}
