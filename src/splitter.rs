//! Splits freshly read bytes into complete lines.
//!
//! A read from a growing file can end mid-line. The splitter emits only
//! newline-terminated lines and carries the unterminated tail in `fragment`
//! until a later read completes it.

/// Split `chunk` into complete lines, combining with any carried-over
/// `fragment` from a previous read.
///
/// The fragment is prepended to the first emitted segment only and cleared.
/// If the chunk does not end with a newline, the trailing segment becomes the
/// new fragment instead of a line. An empty chunk leaves the fragment alone.
pub fn split_lines(fragment: &mut String, chunk: &str) -> Vec<String> {
    if chunk.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut rest = chunk;

    while let Some(pos) = rest.find('\n') {
        let mut line = std::mem::take(fragment);
        line.push_str(&rest[..pos]);
        if line.ends_with('\r') {
            line.pop();
        }
        lines.push(line);
        rest = &rest[pos + 1..];
    }

    // Whatever is left has no terminator yet.
    fragment.push_str(rest);

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_lines_pass_through() {
        let mut frag = String::new();
        let lines = split_lines(&mut frag, "foo\nbar\n");
        assert_eq!(lines, vec!["foo", "bar"]);
        assert!(frag.is_empty());
    }

    #[test]
    fn trailing_partial_is_held_back() {
        let mut frag = String::new();
        let lines = split_lines(&mut frag, "foo\nbar");
        assert_eq!(lines, vec!["foo"]);
        assert_eq!(frag, "bar");
    }

    #[test]
    fn fragment_prefixes_first_line_only() {
        let mut frag = String::from("partial");
        let lines = split_lines(&mut frag, " done\nnext\n");
        assert_eq!(lines, vec!["partial done", "next"]);
        assert!(frag.is_empty());
    }

    #[test]
    fn fragment_extends_across_reads() {
        let mut frag = String::new();
        assert!(split_lines(&mut frag, "abc").is_empty());
        assert!(split_lines(&mut frag, "def").is_empty());
        assert_eq!(frag, "abcdef");
        let lines = split_lines(&mut frag, "ghi\n");
        assert_eq!(lines, vec!["abcdefghi"]);
        assert!(frag.is_empty());
    }

    #[test]
    fn lone_newline_closes_fragment() {
        let mut frag = String::from("pending");
        let lines = split_lines(&mut frag, "\n");
        assert_eq!(lines, vec!["pending"]);
        assert!(frag.is_empty());

        // With nothing pending, a lone newline is an empty line.
        let lines = split_lines(&mut frag, "\n");
        assert_eq!(lines, vec![""]);
    }

    #[test]
    fn empty_chunk_is_a_noop() {
        let mut frag = String::from("keep");
        assert!(split_lines(&mut frag, "").is_empty());
        assert_eq!(frag, "keep");
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let mut frag = String::new();
        let lines = split_lines(&mut frag, "foo\r\nbar\r\n");
        assert_eq!(lines, vec!["foo", "bar"]);
    }
}
