//! Raw line splitting that keeps line terminators visible.

/// One physical line of raw file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Line content without its terminator.
    pub content: &'a str,
    /// The terminator that ended the line: `"\r\n"`, `"\n"`, `"\r"`, or empty
    /// for a final line without one.
    pub terminator: &'a str,
}

/// Split content into lines on `\r\n`, `\n` and lone `\r`.
///
/// Unlike [`str::lines`], the terminator of each line is kept so that
/// line-ending checks can compare it. Empty content yields no lines.
pub fn split_lines(content: &str) -> Vec<RawLine<'_>> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let terminator_len = match bytes[idx] {
            b'\r' if bytes.get(idx + 1) == Some(&b'\n') => 2,
            b'\r' | b'\n' => 1,
            _ => {
                idx += 1;
                continue;
            }
        };
        lines.push(RawLine {
            number: lines.len() + 1,
            content: &content[start..idx],
            terminator: &content[idx..idx + terminator_len],
        });
        idx += terminator_len;
        start = idx;
    }

    if start < bytes.len() {
        lines.push(RawLine {
            number: lines.len() + 1,
            content: &content[start..],
            terminator: "",
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_each_terminator() {
        let lines = split_lines("a\r\nb\nc\rd");
        let parts: Vec<(&str, &str)> = lines.iter().map(|l| (l.content, l.terminator)).collect();
        assert_eq!(
            parts,
            vec![("a", "\r\n"), ("b", "\n"), ("c", "\r"), ("d", "")]
        );
        assert_eq!(lines[3].number, 4);
    }

    #[test]
    fn trailing_terminator_adds_no_empty_line() {
        let lines = split_lines("a\nb\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].terminator, "\n");
    }

    #[test]
    fn empty_lines_are_kept() {
        let lines = split_lines("a\n\nb\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].content, "");
    }

    #[test]
    fn empty_content_has_no_lines() {
        assert!(split_lines("").is_empty());
    }
}
