//! A format-neutral Markdown renderer.
//!
//! The core is a two-pass, byte-oriented parser: pass 1 collects link
//! references and footnote definitions while normalizing the document text,
//! pass 2 parses blocks and inline spans, driving a user-supplied set of
//! rendering callbacks ([`Render`]). The output format is decided entirely by
//! the callback set; [`Html`] is the stock implementation.
//!
//! The dialect is traditional Markdown plus the features toggled through
//! [`Extensions`].

pub use buffer::Buffer;
pub use extensions::Extensions;
pub use html::{Html, HtmlFlags};
pub use parser::Parser;
pub use render::{AutolinkKind, ListFlags, Render, TableFlags};

pub mod autolink;
mod buffer;
mod byte_lookup;
mod extensions;
pub mod html;
mod html_tags;
mod parser;
mod pool;
mod refs;
mod render;

/// Parse `input` with the given extensions and render it to an HTML string.
pub fn to_html(input: &str, extensions: Extensions, flags: HtmlFlags) -> String {
    let mut parser = Parser::new(Html::new(flags), extensions);
    let mut out = Buffer::with_capacity(input.len() + (input.len() >> 1));
    parser.render(input.as_bytes(), &mut out);
    String::from_utf8_lossy(out.as_slice()).into_owned()
}
