use bitflags::bitflags;

bitflags! {
    /// Optional syntactic features, consulted by both the block and the
    /// inline parser. The base dialect with no flags set is traditional
    /// Markdown.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Extensions: u32 {
        /// Enable pipe-tables.
        const TABLES = 1 << 0;
        /// Enable `~~~` / ``` fenced code blocks.
        const FENCED_CODE = 1 << 1;
        /// Enable `[^id]` footnote references and definitions.
        const FOOTNOTES = 1 << 2;
        /// Enable bare URL, www, and e-mail autolinks.
        const AUTOLINK = 1 << 3;
        /// Enable `~~text~~`.
        const STRIKETHROUGH = 1 << 4;
        /// Enable `==text==`.
        const HIGHLIGHT = 1 << 5;
        /// Render `_text_` as underline instead of emphasis.
        const UNDERLINE = 1 << 6;
        /// Enable `"text"` quote spans.
        const QUOTE = 1 << 7;
        /// Enable `^text` superscript.
        const SUPERSCRIPT = 1 << 8;
        /// Require a space after `#` in ATX headers.
        const SPACE_HEADERS = 1 << 9;
        /// Suppress emphasis inside words.
        const NO_INTRA_EMPHASIS = 1 << 10;
        /// Let adjacent blocks terminate a paragraph without a blank line.
        const LAX_SPACING = 1 << 11;
        /// Disable 4-space-indented code blocks.
        const DISABLE_INDENTED_CODE = 1 << 12;
    }
}
