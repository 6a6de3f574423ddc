//! Line and column lookup for spans.

use extra_ir::Span;

/// Byte offset of each line start, for repeated line/column lookups against
/// the same source.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        offsets.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(i, _)| u32::try_from(i + 1).unwrap_or(u32::MAX)),
        );
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let index = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(index).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based (line, column); the column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let start = self.line_start(line);
        let end = (offset as usize).min(source.len());
        let column = source
            .get(start..end)
            .map_or(0, |text| text.chars().count());
        (line, u32::try_from(column).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Text of a 1-based line, without its newline.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> &'a str {
        let start = self.line_start(line);
        let rest = source.get(start..).unwrap_or("");
        rest.split('\n').next().unwrap_or("").trim_end_matches('\r')
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    fn line_start(&self, line: u32) -> usize {
        let index = line.saturating_sub(1) as usize;
        self.offsets.get(index).copied().unwrap_or(0) as usize
    }
}

/// 1-based (line, column) of a span's start.
pub fn span_line_col(source: &str, span: Span) -> (u32, u32) {
    LineOffsetTable::build(source).offset_to_line_col(source, span.start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_from_offset_multiple_lines() {
        let table = LineOffsetTable::build("line1\nline2\nline3");
        assert_eq!(table.line_from_offset(0), 1);
        assert_eq!(table.line_from_offset(5), 1);
        assert_eq!(table.line_from_offset(6), 2);
        assert_eq!(table.line_from_offset(12), 3);
        assert_eq!(table.line_count(), 3);
    }

    #[test]
    fn test_offset_to_line_col_counts_chars() {
        let source = "abc\nλx y\nij";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
        assert_eq!(table.offset_to_line_col(source, 4), (2, 1));
        // 'x' follows a two-byte character
        assert_eq!(table.offset_to_line_col(source, 6), (2, 2));
        assert_eq!(span_line_col(source, Span::new(10, 11)), (3, 1));
    }

    #[test]
    fn test_line_text() {
        let source = "first\r\nsecond\nthird";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_text(source, 1), "first");
        assert_eq!(table.line_text(source, 2), "second");
        assert_eq!(table.line_text(source, 3), "third");
    }
}
