//! Editing support: the edit descriptor, the block-level incremental
//! driver, and the document handle editors embed.

pub mod edit;
pub mod handle;
pub mod incremental;

pub use edit::EditInfo;
pub use handle::MarkdownHandle;
pub use incremental::parse_incremental;
