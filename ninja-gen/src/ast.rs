/// Statement model: the argument sets handed to the writer, one per emitted
/// statement. These are short-lived values built by callers (or by the
/// manifest loader) and discarded once written.
use crate::ninja_string::{Escaper, NinjaString};
use crate::scope::Scope;

/// An ordered list of tokens rendered as one space-joined clause.
///
/// Plain tokens are emitted verbatim and always come first; escaped tokens
/// are rendered against the statement's scope when written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenGroup {
    pub plain: Vec<String>,
    pub escaped: Vec<NinjaString>,
}

impl TokenGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// A group of already-safe raw tokens.
    pub fn plain<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            plain: tokens.into_iter().map(Into::into).collect(),
            escaped: Vec::new(),
        }
    }

    /// A group of escapable strings.
    pub fn escaped(strings: Vec<NinjaString>) -> Self {
        Self {
            plain: Vec::new(),
            escaped: strings,
        }
    }

    /// Append escapable strings after the existing ones.
    pub fn with_escaped(mut self, strings: Vec<NinjaString>) -> Self {
        self.escaped.extend(strings);
        self
    }

    pub fn len(&self) -> usize {
        self.plain.len() + self.escaped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plain.is_empty() && self.escaped.is_empty()
    }

    /// Every token as it appears in the file, plain tokens first.
    pub fn render(&self, scope: Option<&dyn Scope>, escaper: Escaper) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.len());
        tokens.extend(self.plain.iter().cloned());
        tokens.extend(self.escaped.iter().map(|s| s.render_with(scope, escaper)));
        tokens
    }
}

/// One `build` statement: rule, six token groups, and inline variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEdge {
    /// Written as a comment above the edge when non-empty.
    pub comment: String,
    pub rule: String,
    pub outputs: TokenGroup,
    pub implicit_outputs: TokenGroup,
    /// Explicit dependencies.
    pub inputs: TokenGroup,
    pub implicit_inputs: TokenGroup,
    pub order_only: TokenGroup,
    pub validations: TokenGroup,
    /// Edge-scoped assignments, written indented under the edge in order.
    pub variables: Vec<(String, String)>,
}

impl BuildEdge {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            ..Self::default()
        }
    }
}

/// A single statement of a build file, in the form the writer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Comment(String),
    Pool(String),
    Rule(String),
    Build(BuildEdge),
    Default(TokenGroup),
    Assign { name: String, value: String },
    ScopedAssign { name: String, value: String },
    Include(String),
    Subninja(String),
    BlankLine,
}

impl Statement {
    /// Short keyword used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Comment(_) => "comment",
            Statement::Pool(_) => "pool",
            Statement::Rule(_) => "rule",
            Statement::Build(_) => "build",
            Statement::Default(_) => "default",
            Statement::Assign { .. } => "assign",
            Statement::ScopedAssign { .. } => "scoped-assign",
            Statement::Include(_) => "include",
            Statement::Subninja(_) => "subninja",
            Statement::BlankLine => "blank",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::VariableScope;

    #[test]
    fn test_plain_tokens_precede_escaped() {
        let group = TokenGroup::plain(["b"])
            .with_escaped(vec![NinjaString::parse(None, "a").unwrap()]);
        assert_eq!(group.render(None, Escaper::Output), vec!["b", "a"]);
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_escaped_tokens_render_against_scope() {
        let mut scope = VariableScope::new();
        scope.set("out", "obj");
        let group = TokenGroup::escaped(vec![NinjaString::parse(Some(&scope), "$out/x y").unwrap()]);
        assert_eq!(group.render(Some(&scope), Escaper::Input), vec!["obj/x$ y"]);
    }

    #[test]
    fn test_empty_group() {
        assert!(TokenGroup::new().is_empty());
        assert!(TokenGroup::plain(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_build_edge_new() {
        let edge = BuildEdge::new("cc");
        assert_eq!(edge.rule, "cc");
        assert!(edge.outputs.is_empty());
        assert!(edge.comment.is_empty());
    }

    #[test]
    fn test_statement_kinds() {
        assert_eq!(Statement::Rule("r".into()).kind(), "rule");
        let assign = Statement::ScopedAssign {
            name: "a".into(),
            value: "b".into(),
        };
        assert_eq!(assign.kind(), "scoped-assign");
        assert_eq!(Statement::Default(TokenGroup::new()).kind(), "default");
    }
}
