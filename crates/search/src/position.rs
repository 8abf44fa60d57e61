/// Line and column of an offset, both 0-indexed.
///
/// The column is a byte distance from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Maps a byte offset in `text` to its line and column.
///
/// Scans from the start of the buffer on every call. Offsets past the end are
/// clamped to `text.len()`.
pub(crate) fn locate(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let before = &text.as_bytes()[..offset];

    let line = memchr::memchr_iter(b'\n', before).count();
    let line_start = memchr::memrchr(b'\n', before).map_or(0, |idx| idx + 1);

    Position {
        line,
        column: offset - line_start,
    }
}
