/// Returns true for the bytes the dialect treats as whitespace. Only the
/// ASCII space and newline qualify; tabs are expanded during pass 1 and
/// carriage returns never survive it.
#[inline(always)]
pub(crate) fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\n')
}

/// The set of bytes a backslash escapes in inline text.
const ESCAPE_BYTES: &[u8] = b"\\`*_{}[]()#+-.!:|&<>^~";

#[inline(always)]
pub(crate) fn is_escapable(byte: u8) -> bool {
    ESCAPE_BYTES.contains(&byte)
}
