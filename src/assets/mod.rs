//! Loader seam
//!
//! Plain-data descriptions of already-decoded interchange content. The
//! loader (file I/O, buffer decoding) lives outside this crate and hands
//! these over; this module validates them and builds clips and skeleton
//! subgraphs. All descriptions deserialize from JSON, which the tests and
//! demos use as fixtures.

pub mod animation;
pub mod nodes;

pub use animation::{SourceAnimation, SourceChannel, SourceSampler, load_animations};
pub use nodes::{SourceNode, find_skeleton_root, populate_skeleton_subgraph};
