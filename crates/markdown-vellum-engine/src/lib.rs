//! # markdown-vellum-engine
//!
//! A Markdown parser/serializer built around a **lossless concrete syntax
//! tree** and **block-level incremental reparsing**, aimed at real-time
//! editors: a keystroke reparses only the affected blocks, and serializing
//! an unedited tree reproduces the input byte for byte (marker choices,
//! fence lengths, indentation and blank runs included).
//!
//! ## Usage
//!
//! ```
//! use markdown_vellum_engine::{parse, render_html, serialize, EditInfo, parse_incremental};
//!
//! let src = "# Hello\n\nSome *text*.\n";
//! let doc = parse(src);
//! assert_eq!(serialize(&doc), src);
//! assert!(render_html(&doc).starts_with("<h1>Hello</h1>"));
//!
//! // One keystroke: insert "!" after "Hello".
//! let new_src = "# Hello!\n\nSome *text*.\n";
//! let updated = parse_incremental(&doc, src, new_src, EditInfo::insert(7, 1));
//! assert_eq!(serialize(&updated), new_src);
//! ```
//!
//! The source of truth is an `xi_rope::Rope` owned by the [`Document`];
//! every node carries an absolute byte [`Span`] into it. Parsing never
//! fails: malformed input degrades to paragraphs, and the incremental
//! driver falls back to a full reparse rather than surfacing an error.

pub mod blocks;
pub mod document;
pub mod editing;
pub mod inline;
pub mod invariants;
pub mod mdast;
pub mod render;
pub mod serialize;
pub mod source;

pub use blocks::{Alignment, Block, BlockKind, HeadingStyle, ListData, ListItem, TableCell, TableData};
pub use document::{parse, Document};
pub use editing::{parse_incremental, EditInfo, MarkdownHandle};
pub use inline::{Inline, InlineKind};
pub use mdast::{to_mdast, MdastNode};
pub use render::{render_html, render_html_with, CodeBlockHook, RenderOptions};
pub use serialize::{serialize, write_markdown};
pub use source::Span;
