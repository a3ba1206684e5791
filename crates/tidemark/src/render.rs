use bitflags::bitflags;

use crate::buffer::Buffer;

bitflags! {
    /// Flags passed to the `list` and `listitem` callbacks.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ListFlags: u32 {
        /// The list uses ordered (`1.`) markers.
        const ORDERED = 1 << 0;
        /// The item contained a blank line; its content was parsed as blocks.
        const BLOCK = 1 << 1;
    }
}

bitflags! {
    /// Flags passed to the `table_cell` callback.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TableFlags: u32 {
        const ALIGN_LEFT = 1 << 0;
        const ALIGN_RIGHT = 1 << 1;
        const ALIGN_CENTER = Self::ALIGN_LEFT.bits() | Self::ALIGN_RIGHT.bits();
        /// The cell belongs to the header row.
        const HEADER = 1 << 2;
    }
}

/// The kind of bare link an autolink scanner recognized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutolinkKind {
    Url,
    Www,
    Email,
}

/// The renderer callback set. The parser is format-neutral; implementing this
/// trait is what decides whether the output is HTML, LaTeX, a syntax tree, or
/// anything else.
///
/// Every method is optional. Block callbacks default to rendering nothing
/// (their input is still consumed); span callbacks return `bool`, where
/// `true` means the construct was rendered and its input consumed, and
/// `false` means the construct was not rendered, in which case the parser
/// falls back to emitting the source bytes literally. The defaults for
/// `normal_text` and `entity` copy their input through verbatim.
///
/// Content arguments are borrowed views that are only valid for the duration
/// of the call; a renderer that wants to keep them must copy. Empty `info`,
/// `title`, or `alt` slices mean the construct carried none.
#[allow(unused_variables)]
pub trait Render {
    // Block-level callbacks.

    fn blockcode(&mut self, ob: &mut Buffer, text: &[u8], info: &[u8]) {}

    fn blockquote(&mut self, ob: &mut Buffer, content: &[u8]) {}

    fn blockhtml(&mut self, ob: &mut Buffer, text: &[u8]) {}

    fn header(&mut self, ob: &mut Buffer, content: &[u8], level: u32) {}

    fn hrule(&mut self, ob: &mut Buffer) {}

    fn list(&mut self, ob: &mut Buffer, content: &[u8], flags: ListFlags) {}

    fn listitem(&mut self, ob: &mut Buffer, content: &[u8], flags: ListFlags) {}

    fn paragraph(&mut self, ob: &mut Buffer, content: &[u8]) {}

    fn table(&mut self, ob: &mut Buffer, header: &[u8], body: &[u8]) {}

    fn table_row(&mut self, ob: &mut Buffer, content: &[u8]) {}

    fn table_cell(&mut self, ob: &mut Buffer, content: &[u8], flags: TableFlags) {}

    fn footnotes(&mut self, ob: &mut Buffer, content: &[u8]) {}

    fn footnote_def(&mut self, ob: &mut Buffer, content: &[u8], num: u32) {}

    // Span-level callbacks.

    fn autolink(&mut self, ob: &mut Buffer, link: &[u8], kind: AutolinkKind) -> bool {
        false
    }

    fn codespan(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        false
    }

    fn emphasis(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        false
    }

    fn double_emphasis(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        false
    }

    fn triple_emphasis(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        false
    }

    fn underline(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        false
    }

    fn highlight(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        false
    }

    fn strikethrough(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        false
    }

    fn quote(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        false
    }

    fn superscript(&mut self, ob: &mut Buffer, content: &[u8]) -> bool {
        false
    }

    fn image(&mut self, ob: &mut Buffer, link: &[u8], title: &[u8], alt: &[u8]) -> bool {
        false
    }

    fn link(&mut self, ob: &mut Buffer, link: &[u8], title: &[u8], content: &[u8]) -> bool {
        false
    }

    fn linebreak(&mut self, ob: &mut Buffer) -> bool {
        false
    }

    fn footnote_ref(&mut self, ob: &mut Buffer, num: u32) -> bool {
        false
    }

    fn raw_html_tag(&mut self, ob: &mut Buffer, tag: &[u8]) -> bool {
        false
    }

    // Low-level callbacks.

    fn entity(&mut self, ob: &mut Buffer, text: &[u8]) {
        ob.put(text);
    }

    fn normal_text(&mut self, ob: &mut Buffer, text: &[u8]) {
        ob.put(text);
    }

    // Document callbacks.

    fn doc_header(&mut self, ob: &mut Buffer) {}

    fn doc_footer(&mut self, ob: &mut Buffer) {}
}
