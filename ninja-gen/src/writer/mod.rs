/// Ninja build file writer.
///
/// `NinjaWriter` renders one statement per call straight to its destination.
/// It keeps only formatting state: the configured width, whether an indented
/// block (pool, rule or build) is open, and whether the last statement was a
/// blank line.
mod comment;
mod wrap;

use std::io::Write;

use tracing::{debug, trace};

use crate::ast::{BuildEdge, Statement, TokenGroup};
use crate::error::Result;
use crate::ninja_string::Escaper;
use crate::scope::Scope;
use wrap::LineWrapper;

/// Default maximum width of an emitted line.
pub const LINE_WIDTH: usize = 80;
/// Indentation of variables scoped to a pool, rule or build edge.
pub const INDENT_WIDTH: usize = 4;
/// Indentation of continuation lines after a ` $` wrap.
pub const CONTINUATION_INDENT: &str = "        ";

pub struct NinjaWriter<W: Write> {
    out: W,
    line_width: usize,
    block_open: bool,
    just_did_blank_line: bool,
}

impl<W: Write> NinjaWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_line_width(out, LINE_WIDTH)
    }

    /// A writer that wraps `build` and `default` lines at `line_width`.
    pub fn with_line_width(out: W, line_width: usize) -> Self {
        Self {
            out,
            line_width,
            block_open: false,
            just_did_blank_line: false,
        }
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    /// Whether a pool, rule or build block is open for scoped assignments.
    pub fn in_block(&self) -> bool {
        self.block_open
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the writer and return the destination.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// `# text`, one line per input line, long lines broken at whitespace.
    pub fn comment(&mut self, text: &str) -> Result<()> {
        self.just_did_blank_line = false;
        let max_len = self.line_width.saturating_sub("# ".len());
        for line in comment::comment_lines(text, max_len) {
            if line.is_empty() {
                self.out.write_all(b"#\n")?;
            } else {
                writeln!(self.out, "# {line}")?;
            }
        }
        Ok(())
    }

    pub fn pool(&mut self, name: &str) -> Result<()> {
        self.header("pool", name)
    }

    pub fn rule(&mut self, name: &str) -> Result<()> {
        self.header("rule", name)
    }

    /// Write a build edge and its scoped variables.
    ///
    /// Escaped tokens are rendered against `scope`; plain tokens are written
    /// as given.
    pub fn build(&mut self, scope: Option<&dyn Scope>, edge: &BuildEdge) -> Result<()> {
        self.just_did_blank_line = false;
        if !edge.comment.is_empty() {
            self.comment(&edge.comment)?;
        }

        let mut line = LineWrapper::new(&mut self.out, self.line_width);
        line.write("build")?;
        write_group(&mut line, None, &edge.outputs, scope, Escaper::Output)?;
        write_group(&mut line, Some("|"), &edge.implicit_outputs, scope, Escaper::Output)?;
        line.write(":")?;
        line.token(&edge.rule)?;
        write_group(&mut line, None, &edge.inputs, scope, Escaper::Input)?;
        write_group(&mut line, Some("|"), &edge.implicit_inputs, scope, Escaper::Input)?;
        write_group(&mut line, Some("||"), &edge.order_only, scope, Escaper::Input)?;
        write_group(&mut line, Some("|@"), &edge.validations, scope, Escaper::Input)?;
        let wraps = line.finish()?;

        debug!(rule = %edge.rule, outputs = edge.outputs.len(), wraps, "wrote build edge");
        self.block_open = true;
        for (name, value) in &edge.variables {
            self.scoped_assign(name, value)?;
        }
        Ok(())
    }

    /// `default` followed by the plain targets, then the escaped ones.
    pub fn default(&mut self, scope: Option<&dyn Scope>, targets: &TokenGroup) -> Result<()> {
        self.just_did_blank_line = false;
        let mut line = LineWrapper::new(&mut self.out, self.line_width);
        line.write("default")?;
        write_group(&mut line, None, targets, scope, Escaper::Output)?;
        line.finish()?;
        Ok(())
    }

    /// Top-level `name = value`.
    pub fn assign(&mut self, name: &str, value: &str) -> Result<()> {
        self.just_did_blank_line = false;
        writeln!(self.out, "{name} = {value}")?;
        Ok(())
    }

    /// Indented `name = value` inside the current block.
    ///
    /// Nesting is the caller's responsibility: outside a block the line is
    /// still written indented.
    pub fn scoped_assign(&mut self, name: &str, value: &str) -> Result<()> {
        if !self.block_open {
            debug!(name, "scoped assignment written outside an open block");
        }
        self.just_did_blank_line = false;
        writeln!(self.out, "{:width$}{name} = {value}", "", width = INDENT_WIDTH)?;
        Ok(())
    }

    pub fn include(&mut self, path: &str) -> Result<()> {
        self.just_did_blank_line = false;
        writeln!(self.out, "include {path}")?;
        Ok(())
    }

    pub fn subninja(&mut self, path: &str) -> Result<()> {
        self.just_did_blank_line = false;
        writeln!(self.out, "subninja {path}")?;
        Ok(())
    }

    /// End the current block. Consecutive blank lines collapse into one.
    pub fn blank_line(&mut self) -> Result<()> {
        self.block_open = false;
        if !self.just_did_blank_line {
            self.just_did_blank_line = true;
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Dispatch one statement to the matching method.
    pub fn write_statement(&mut self, scope: Option<&dyn Scope>, stmt: &Statement) -> Result<()> {
        trace!(kind = stmt.kind(), "writing statement");
        match stmt {
            Statement::Comment(text) => self.comment(text),
            Statement::Pool(name) => self.pool(name),
            Statement::Rule(name) => self.rule(name),
            Statement::Build(edge) => self.build(scope, edge),
            Statement::Default(targets) => self.default(scope, targets),
            Statement::Assign { name, value } => self.assign(name, value),
            Statement::ScopedAssign { name, value } => self.scoped_assign(name, value),
            Statement::Include(path) => self.include(path),
            Statement::Subninja(path) => self.subninja(path),
            Statement::BlankLine => self.blank_line(),
        }
    }

    fn header(&mut self, keyword: &str, name: &str) -> Result<()> {
        self.just_did_blank_line = false;
        writeln!(self.out, "{keyword} {name}")?;
        self.block_open = true;
        Ok(())
    }
}

/// Append a token group, preceded by `separator` when the group is non-empty.
fn write_group<W: Write>(
    line: &mut LineWrapper<'_, W>,
    separator: Option<&str>,
    group: &TokenGroup,
    scope: Option<&dyn Scope>,
    escaper: Escaper,
) -> std::io::Result<()> {
    if group.is_empty() {
        return Ok(());
    }
    if let Some(sep) = separator {
        line.token(sep)?;
    }
    for token in group.render(scope, escaper) {
        line.token(&token)?;
    }
    Ok(())
}
