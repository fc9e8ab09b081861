pub mod cache;
pub mod design;
pub mod geometry;
pub mod header;
pub mod stitch;
pub mod stream;

pub use cache::DecodeCache;
pub use design::{decode, decode_header_only, probe_file, read_file, validate};
pub use design::{DecodeError, Design, Summary};
pub use geometry::{Bounds, Counts, Point};
pub use header::{Header, HeaderWarning, HEADER_SIZE};
pub use stitch::{Stitch, StitchError, MAX_DISPLACEMENT, RECORD_SIZE};
