/// Escapable strings: text with embedded variable references, parsed once and
/// rendered on demand against a scope.
///
/// Literal segments hold unescaped text. Escaping for the output context is
/// applied only when rendering, and substituted variable values are inserted
/// as-is.
use std::fmt;

use crate::error::{Error, Result};
use crate::scope::Scope;

/// One piece of a parsed `NinjaString`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Unescaped literal text.
    Literal(String),
    /// A reference to a variable by name.
    Variable(String),
}

/// Which characters a literal must escape in the position it is rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escaper {
    /// Right-hand side of an assignment: only `$`.
    #[default]
    Value,
    /// A dependency path on a `build` line: `$` and space.
    Input,
    /// An output path on a `build` or `default` line: `$`, space and `:`.
    Output,
}

impl Escaper {
    fn escape_into(self, out: &mut String, text: &str) {
        for c in text.chars() {
            match (self, c) {
                (_, '$') => out.push_str("$$"),
                (Escaper::Input | Escaper::Output, ' ') => out.push_str("$ "),
                (Escaper::Output, ':') => out.push_str("$:"),
                _ => out.push(c),
            }
        }
    }
}

/// An immutable sequence of literal and variable segments.
///
/// Never empty: parsing `""` yields a single empty literal. No two literal
/// segments are adjacent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NinjaString {
    segments: Vec<Segment>,
}

impl NinjaString {
    /// Parse raw Ninja text.
    ///
    /// `$$`, `$ ` and `$:` are literal `$`, space and colon. `$name` and
    /// `${name}` are references. When `scope` is given, every referenced name
    /// must be declared in it.
    pub fn parse(scope: Option<&dyn Scope>, text: &str) -> Result<NinjaString> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((dollar, c)) = chars.next() {
            if c != '$' {
                literal.push(c);
                continue;
            }
            match chars.next() {
                None => return Err(malformed(text, dollar, "unexpected end of string after '$'")),
                Some((_, '$')) => literal.push('$'),
                Some((_, ' ')) => literal.push(' '),
                Some((_, ':')) => literal.push(':'),
                Some((brace, '{')) => {
                    let start = brace + 1;
                    let mut end = None;
                    for (i, c) in chars.by_ref() {
                        if c == '}' {
                            end = Some(i);
                            break;
                        }
                        if !is_braced_name_char(c) {
                            return Err(malformed(text, i, "invalid character in variable name"));
                        }
                    }
                    let end = end.ok_or_else(|| malformed(text, dollar, "unterminated '${'"))?;
                    if start == end {
                        return Err(malformed(text, dollar, "empty variable name"));
                    }
                    push_variable(&mut segments, &mut literal, scope, &text[start..end])?;
                }
                Some((start, c)) if is_simple_name_char(c) => {
                    let mut end = start + c.len_utf8();
                    while let Some(&(i, c)) = chars.peek() {
                        if !is_simple_name_char(c) {
                            break;
                        }
                        end = i + c.len_utf8();
                        chars.next();
                    }
                    push_variable(&mut segments, &mut literal, scope, &text[start..end])?;
                }
                Some((i, _)) => return Err(malformed(text, i, "invalid character after '$'")),
            }
        }

        if !literal.is_empty() || segments.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(NinjaString { segments })
    }

    /// Parse each entry of `texts`, stopping at the first failure.
    pub fn parse_all<I, S>(scope: Option<&dyn Scope>, texts: I) -> Result<Vec<NinjaString>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| NinjaString::parse(scope, text.as_ref()))
            .collect()
    }

    /// A string holding `text` verbatim, without interpreting `$`.
    pub fn literal(text: impl Into<String>) -> NinjaString {
        NinjaString {
            segments: vec![Segment::Literal(text.into())],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of referenced variables, in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn is_literal(&self) -> bool {
        self.variables().next().is_none()
    }

    /// Render for an assignment value: literals get `$` doubled, variables are
    /// replaced by their value in `scope`.
    pub fn render(&self, scope: Option<&dyn Scope>) -> String {
        self.render_with(scope, Escaper::Value)
    }

    /// Render with the escaping rules of a particular position in the file.
    pub fn render_with(&self, scope: Option<&dyn Scope>, escaper: Escaper) -> String {
        let mut out = String::new();
        self.render_into(&mut out, scope, escaper);
        out
    }

    /// Append the rendered text to `out`.
    ///
    /// A variable the scope cannot resolve is written as a `${name}`
    /// reference for Ninja to expand.
    pub fn render_into(&self, out: &mut String, scope: Option<&dyn Scope>, escaper: Escaper) {
        for seg in &self.segments {
            match seg {
                Segment::Literal(text) => escaper.escape_into(out, text),
                Segment::Variable(name) => match scope.and_then(|s| s.resolve(name)) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
    }
}

/// The canonical Ninja source form: references stay as `${name}`.
impl fmt::Display for NinjaString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

fn push_variable(
    segments: &mut Vec<Segment>,
    literal: &mut String,
    scope: Option<&dyn Scope>,
    name: &str,
) -> Result<()> {
    if let Some(scope) = scope {
        if !scope.is_declared(name) {
            return Err(Error::UndeclaredVariable(name.to_string()));
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
    segments.push(Segment::Variable(name.to_string()));
    Ok(())
}

fn malformed(input: &str, offset: usize, reason: &'static str) -> Error {
    Error::MalformedReference {
        input: input.to_string(),
        offset,
        reason,
    }
}

fn is_simple_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_braced_name_char(c: char) -> bool {
    is_simple_name_char(c) || c == '.'
}
