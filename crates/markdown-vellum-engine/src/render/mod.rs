//! HTML rendering: a pure fold over the CST into a string builder.
//!
//! Link references and footnote definitions are collected in a first pass
//! over the tree; reference nodes resolve against that map at render time
//! and degrade to their literal source text when unresolved.

pub mod escape;
mod html;

pub use html::{render_html, render_html_with, CodeBlockHook, RenderOptions};
pub(crate) use html::normalize_label;
