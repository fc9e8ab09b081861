//! High-level [`Design`] API, the primary embedding surface.
//!
//! ```no_run
//! let design = dstitch::read_file("flower.dst")?;
//!
//! println!(
//!     "{}: {} stitches, {} colors",
//!     design.header().design_name,
//!     design.stitch_count(),
//!     design.header().color_count,
//! );
//! let bounds = design.bounds();
//! for segment in design.segments() {
//!     // hand each contiguous run to the renderer
//!     let _ = segment.len();
//! }
//! # Ok::<(), dstitch::DecodeError>(())
//! ```
//!
//! A [`Design`] is produced fully formed by one decode call and is
//! read-only afterwards. The geometry accessors recompute from the stored
//! records on every call; the record sequence never mutates, so callers
//! may memoize results freely on their side.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{self, Bounds, Counts, Point};
use crate::header::{self, Header, HeaderWarning, HEADER_SIZE};
use crate::stitch::Stitch;
use crate::stream;

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum DecodeError {
    /// Input shorter than the mandatory header block. Fatal; nothing is
    /// decoded.
    #[error("input too small for a DST file: {len} bytes, need at least {HEADER_SIZE}")]
    TooSmall { len: usize },
    /// Filesystem failure from the path-based entry points, propagated
    /// unchanged (a missing file surfaces as `ErrorKind::NotFound`).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Design ───────────────────────────────────────────────────────────────────

/// A fully decoded DST file: header, ordered stitch records, provenance.
#[derive(Debug, Clone)]
pub struct Design {
    header: Header,
    stitches: Vec<Stitch>,
    source: Option<PathBuf>,
    header_warning: Option<HeaderWarning>,
}

impl Design {
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The decoded records in execution order. Order is load-bearing:
    /// every record is a displacement relative to the one before it.
    pub fn stitches(&self) -> &[Stitch] {
        &self.stitches
    }

    /// Originating path, when decoded through a path-based entry point.
    /// Diagnostics only; never interpreted.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Non-fatal diagnostic from header extraction, if any. A warning
    /// here means the header fields are fallback defaults while the
    /// stitch data decoded normally.
    pub fn header_warning(&self) -> Option<&HeaderWarning> {
        self.header_warning.as_ref()
    }

    /// Actual decoded record count. May disagree with the declared
    /// [`Header::stitch_count`]; this one is the truth.
    pub fn stitch_count(&self) -> usize {
        self.stitches.len()
    }

    // ── Geometry ─────────────────────────────────────────────────────────

    /// See [`geometry::absolute_path`].
    pub fn absolute_path(&self) -> Vec<Point> {
        geometry::absolute_path(&self.stitches)
    }

    /// See [`geometry::bounds`].
    pub fn bounds(&self) -> Bounds {
        geometry::bounds(&self.stitches)
    }

    /// See [`geometry::segments`].
    pub fn segments(&self) -> Vec<Vec<Point>> {
        geometry::segments(&self.stitches)
    }

    /// See [`geometry::counts`].
    pub fn counts(&self) -> Counts {
        geometry::counts(&self.stitches)
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Lightweight metadata for file-browser previews, produced by
/// [`probe_file`] without decoding any records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub design_name: String,
    /// Declared in the header; not verified against the payload.
    pub stitch_count: u32,
    pub color_count: u32,
    pub width: i32,
    pub height: i32,
    pub file_size: u64,
    pub path: PathBuf,
}

// ── Entry points ─────────────────────────────────────────────────────────────

/// Decode a complete DST byte sequence: 512-byte header block followed by
/// the stitch payload.
///
/// Header extraction is fail-soft (see [`header::extract`]); the only
/// fatal condition here is an input too short to contain a header.
pub fn decode(bytes: &[u8]) -> Result<Design, DecodeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DecodeError::TooSmall { len: bytes.len() });
    }

    let (header, header_warning) = header::extract(&bytes[..HEADER_SIZE]);
    let stitches = stream::decode_records(&bytes[HEADER_SIZE..]);

    Ok(Design { header, stitches, source: None, header_warning })
}

/// Extract only the header, for metadata probes that must not pay for
/// record decoding.
pub fn decode_header_only(bytes: &[u8]) -> Result<Header, DecodeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DecodeError::TooSmall { len: bytes.len() });
    }
    let (header, _) = header::extract(&bytes[..HEADER_SIZE]);
    Ok(header)
}

/// True iff header-only extraction succeeds. Never inspects records.
pub fn validate(bytes: &[u8]) -> bool {
    decode_header_only(bytes).is_ok()
}

/// Read and decode a DST file in one call. The whole file is read up
/// front; decoding never touches the filesystem afterwards.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Design, DecodeError> {
    let path = path.as_ref();
    log::debug!("decoding DST file {}", path.display());
    let bytes = std::fs::read(path)?;
    let mut design = decode(&bytes)?;
    design.source = Some(path.to_owned());
    Ok(design)
}

/// Probe a file for preview metadata, reading only the header block and
/// the file size.
pub fn probe_file<P: AsRef<Path>>(path: P) -> Result<Summary, DecodeError> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();
    if (file_size as usize) < HEADER_SIZE {
        return Err(DecodeError::TooSmall { len: file_size as usize });
    }

    let mut block = [0u8; HEADER_SIZE];
    file.read_exact(&mut block)?;
    let (header, _) = header::extract(&block);
    let (width, height) = header.dimensions();

    Ok(Summary {
        design_name: header.design_name,
        stitch_count: header.stitch_count,
        color_count: header.color_count,
        width,
        height,
        file_size,
        path: path.to_owned(),
    })
}
