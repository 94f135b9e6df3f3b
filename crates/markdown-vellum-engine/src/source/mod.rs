//! Source-view primitives: byte spans into the rope, line iteration, slicing.
//!
//! The `xi_rope::Rope` holding the document text is the single source of
//! truth. Every CST node stores a [`Span`] into it; slicing a node's span
//! reproduces the exact source bytes, which is what makes serialization
//! lossless.

pub mod lines;
pub mod slice;
pub mod span;

pub use lines::{lines_with_spans, LineRef};
pub use slice::{preview, slice_to_string};
pub use span::Span;
