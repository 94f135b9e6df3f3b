//! Block-specific types that own their syntax knowledge.
//!
//! Each construct's delimiters and recognizers live with the type that
//! represents it; the classifier and builder call these helpers and never
//! hardcode marker characters themselves.

pub mod block_quote;
pub mod code_fence;
pub mod footnote;
pub mod heading;
pub mod html_block;
pub mod link_ref_def;
pub mod list;
pub mod table;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceSig};
pub use footnote::FootnoteDef;
pub use heading::{AtxHeading, SetextUnderline};
pub use html_block::{HtmlBlockEnd, HtmlBlockStart};
pub use link_ref_def::RefDefLine;
pub use list::ListMarker;
pub use table::TableRow;
pub use thematic_break::ThematicBreakLine;
