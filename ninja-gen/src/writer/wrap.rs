/// Column-aware accumulator for one logical line.
///
/// Tokens separated by `token` may be moved to a continuation line; text added
/// with `write` is glued to whatever came before it and moves with it. A wrap
/// emits ` $`, a newline and the continuation indent, so the configured width
/// is reduced by two to leave room for the trailing ` $`.
use std::io::{self, Write};

use super::CONTINUATION_INDENT;

const WRAP_MARKER: &str = " $\n";

pub(crate) struct LineWrapper<'a, W: Write> {
    out: &'a mut W,
    max_len: usize,
    /// Bytes on the current physical line, pending text included but not the
    /// pending separator space.
    line_len: usize,
    /// Text written since the last separator, held back so it can move to
    /// the next line together with whatever is glued to it.
    pending: String,
    space: bool,
    wraps: usize,
}

impl<'a, W: Write> LineWrapper<'a, W> {
    pub(crate) fn new(out: &'a mut W, line_width: usize) -> Self {
        Self {
            out,
            max_len: line_width.saturating_sub(" $".len()),
            line_len: 0,
            pending: String::new(),
            space: false,
            wraps: 0,
        }
    }

    /// Append `s` with no separator before it.
    pub(crate) fn write(&mut self, s: &str) -> io::Result<()> {
        if !self.space {
            self.line_len += s.len();
            return self.out.write_all(s.as_bytes());
        }
        if self.line_len + s.len() + 1 > self.max_len {
            self.out.write_all(WRAP_MARKER.as_bytes())?;
            self.out.write_all(CONTINUATION_INDENT.as_bytes())?;
            self.pending.push_str(s);
            self.line_len = CONTINUATION_INDENT.len() + self.pending.len();
            self.flush_pending()?;
            self.space = false;
            self.wraps += 1;
            tracing::trace!(wraps = self.wraps, "wrapped line");
        } else {
            self.pending.push_str(s);
            self.line_len += s.len();
        }
        Ok(())
    }

    /// Mark a separator; the space is written once the next token is placed.
    pub(crate) fn space(&mut self) -> io::Result<()> {
        if self.space {
            self.out.write_all(b" ")?;
            self.line_len += 1;
            self.flush_pending()?;
        }
        self.space = true;
        Ok(())
    }

    /// A separator followed by `s`.
    pub(crate) fn token(&mut self, s: &str) -> io::Result<()> {
        self.space()?;
        self.write(s)
    }

    /// Write out anything pending and end the line. Returns the number of
    /// continuations inserted.
    pub(crate) fn finish(mut self) -> io::Result<usize> {
        self.space()?;
        self.out.write_all(b"\n")?;
        Ok(self.wraps)
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        self.out.write_all(self.pending.as_bytes())?;
        self.pending.clear();
        Ok(())
    }
}
