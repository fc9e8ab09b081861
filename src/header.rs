//! The 512-byte header block and its fail-soft field extraction.
//!
//! # Layout
//! The header is text, not binary: GBK-encoded `KEY:VALUE` lines separated
//! by carriage returns, zero-padded to [`HEADER_SIZE`] bytes. Known
//! two-letter keys map onto [`Header`] fields; unknown keys are skipped and
//! a later duplicate key overwrites an earlier one.
//!
//! # Fail-soft contract
//! [`extract`] is total. Malformed text decodes lossily, numeric values
//! parse leniently (every character that is not an ASCII digit or `-` is
//! dropped before parsing, with 0 as the fallback), and a structurally
//! invalid header degrades to an all-default fallback plus a
//! [`HeaderWarning`] instead of an error. A garbled header must never stop
//! the stitch payload from being decoded.

use encoding_rs::GBK;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size of the header block in bytes. Input shorter than this is not a
/// DST file at all.
pub const HEADER_SIZE: usize = 512;

/// Design name used by the fallback header when extraction fails outright.
pub const FALLBACK_DESIGN_NAME: &str = "Unknown";

/// Non-fatal diagnostic from header extraction. The decode continues with
/// a fallback header whenever one of these is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderWarning {
    #[error("header block truncated: {len} bytes, need {HEADER_SIZE}")]
    Truncated { len: usize },
    #[error("declared {field} count is negative: {value}")]
    NegativeCount { field: &'static str, value: i32 },
}

/// Decoded header metadata.
///
/// The declared `stitch_count` is informational only. Real files disagree
/// with the actual record count often enough that nothing here may be used
/// for buffer sizing; [`crate::Design::stitch_count`] reports the decoded
/// truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Design name (`LA`), possibly empty.
    pub design_name: String,
    /// Declared stitch count (`ST`).
    pub stitch_count: u32,
    /// Declared color count (`CO`).
    pub color_count: u32,
    /// Extent in the positive X direction from the origin (`+X`).
    pub pos_x: i32,
    /// Extent in the negative X direction (`-X`).
    pub neg_x: i32,
    /// Extent in the positive Y direction (`+Y`).
    pub pos_y: i32,
    /// Extent in the negative Y direction (`-Y`).
    pub neg_y: i32,
    /// Pass-through field `AX`; semantics opaque to this crate.
    pub ax: i32,
    /// Pass-through field `AY`.
    pub ay: i32,
    /// Pass-through field `MX`.
    pub mx: i32,
    /// Pass-through field `MY`.
    pub my: i32,
    /// Trailing text field (`PD`), possibly empty.
    pub pd: String,
}

impl Header {
    /// Total design width: extent in both X directions combined.
    pub fn width(&self) -> i32 {
        self.pos_x + self.neg_x
    }

    /// Total design height: extent in both Y directions combined.
    pub fn height(&self) -> i32 {
        self.pos_y + self.neg_y
    }

    /// `(width, height)` pair.
    pub fn dimensions(&self) -> (i32, i32) {
        (self.width(), self.height())
    }

    /// All-default header with the sentinel design name, used when
    /// extraction fails structurally.
    fn fallback() -> Self {
        Self {
            design_name: FALLBACK_DESIGN_NAME.to_owned(),
            ..Self::default()
        }
    }
}

/// Extract a [`Header`] from the leading [`HEADER_SIZE`] bytes.
///
/// Never fails: a structurally invalid block yields the fallback header
/// and the warning that explains why, and the warning is also logged.
pub fn extract(block: &[u8]) -> (Header, Option<HeaderWarning>) {
    match try_extract(block) {
        Ok(header) => (header, None),
        Err(warning) => {
            log::warn!("header extraction failed ({warning}); continuing with defaults");
            (Header::fallback(), Some(warning))
        }
    }
}

fn try_extract(block: &[u8]) -> Result<Header, HeaderWarning> {
    if block.len() < HEADER_SIZE {
        return Err(HeaderWarning::Truncated { len: block.len() });
    }

    // Lossy GBK decode: malformed sequences become replacement characters,
    // never an error. Header text in the wild carries Chinese design names.
    let (text, _, had_errors) = GBK.decode(&block[..HEADER_SIZE]);
    if had_errors {
        log::debug!("malformed GBK sequences in header text were replaced");
    }

    let mut design_name = String::new();
    let mut pd = String::new();
    let mut stitch_count = 0i32;
    let mut color_count = 0i32;
    let (mut pos_x, mut neg_x, mut pos_y, mut neg_y) = (0, 0, 0, 0);
    let (mut ax, mut ay, mut mx, mut my) = (0, 0, 0, 0);

    for line in text.split('\r') {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "LA" => design_name = value.to_owned(),
            "ST" => stitch_count = lenient_int(value),
            "CO" => color_count = lenient_int(value),
            "+X" => pos_x = lenient_int(value),
            "-X" => neg_x = lenient_int(value),
            "+Y" => pos_y = lenient_int(value),
            "-Y" => neg_y = lenient_int(value),
            "AX" => ax = lenient_int(value),
            "AY" => ay = lenient_int(value),
            "MX" => mx = lenient_int(value),
            "MY" => my = lenient_int(value),
            "PD" => pd = value.to_owned(),
            _ => {}
        }
    }

    // The lenient parse accepts a minus sign, but declared counts must not
    // be negative; that is the one structural check the header gets.
    if stitch_count < 0 {
        return Err(HeaderWarning::NegativeCount { field: "stitch", value: stitch_count });
    }
    if color_count < 0 {
        return Err(HeaderWarning::NegativeCount { field: "color", value: color_count });
    }

    Ok(Header {
        design_name,
        stitch_count: stitch_count as u32,
        color_count: color_count as u32,
        pos_x,
        neg_x,
        pos_y,
        neg_y,
        ax,
        ay,
        mx,
        my,
        pd,
    })
}

/// Parse an integer out of a value that may carry stray formatting or
/// encoding artifacts: keep only ASCII digits and minus signs, then parse.
/// An empty or still-unparsable remainder yields 0.
fn lenient_int(raw: &str) -> i32 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    cleaned.parse().unwrap_or(0)
}
