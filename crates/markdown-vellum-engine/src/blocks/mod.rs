//! Block parsing: line classification plus a container/leaf state machine.
//!
//! One pass over the physical lines. Each line first matches the
//! continuation prefixes of the open containers, then either feeds the open
//! leaf block or opens new blocks. Malformed constructs degrade to
//! paragraphs; parsing never fails and every byte is attributed to a block.

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod types;

use xi_rope::Rope;

pub use builder::BlockBuilder;
pub use classify::{LineClass, LinePos};
pub use types::{
    Alignment, Block, BlockKind, HeadingStyle, ListData, ListItem, TableCell, TableData,
};

use crate::source::lines_with_spans;

/// Parses the rope into the ordered top-level block list.
pub fn parse_blocks(rope: &Rope) -> Vec<Block> {
    let mut builder = BlockBuilder::new(rope);
    for lr in lines_with_spans(rope) {
        let class = LineClass::of(&lr);
        builder.push_line(&class);
    }
    builder.finish()
}
