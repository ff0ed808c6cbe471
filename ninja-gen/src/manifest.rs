/// Manifest loader: reads a JSON build description, validates every string
/// in it, and lowers it to the statement sequence of a build file.
///
/// Paths (build outputs and inputs, defaults) must only reference variables
/// declared at file level or on their own build edge. They are written with
/// each reference kept as `${name}`, so Ninja expands a value to exactly one
/// path whatever spaces or colons it holds. Variable values are only
/// syntax-checked and are written exactly as given, so references such as
/// `$in` reach Ninja unexpanded.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::ast::{BuildEdge, Statement, TokenGroup};
use crate::error::Error;
use crate::ninja_string::NinjaString;
use crate::scope::VariableScope;
use crate::writer::NinjaWriter;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{context}: {source}")]
    Invalid {
        context: String,
        #[source]
        source: Error,
    },
    #[error(transparent)]
    Write(#[from] Error),
}

/// A `name = value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binding {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pool {
    pub name: String,
    pub depth: u32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub comment: String,
    /// Further rule variables (`description`, `depfile`, `pool`, ...).
    #[serde(default)]
    pub variables: Vec<Binding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Build {
    pub rule: String,
    pub outputs: Vec<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub implicit_outputs: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub implicit_inputs: Vec<String>,
    #[serde(default)]
    pub order_only: Vec<String>,
    #[serde(default)]
    pub validations: Vec<String>,
    #[serde(default)]
    pub variables: Vec<Binding>,
}

/// A whole build file description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub variables: Vec<Binding>,
    #[serde(default)]
    pub pools: Vec<Pool>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub builds: Vec<Build>,
    #[serde(default)]
    pub defaults: Vec<String>,
    #[serde(default)]
    pub subninjas: Vec<String>,
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Manifest, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The file-level scope. Each value may only reference variables
    /// declared before it.
    pub fn scope(&self) -> Result<VariableScope<'static>, ManifestError> {
        let mut scope = VariableScope::new();
        for var in &self.variables {
            NinjaString::parse(Some(&scope), &var.value)
                .map_err(|e| invalid(format!("variable '{}'", var.name), e))?;
            scope.set(var.name.as_str(), var.value.as_str());
        }
        Ok(scope)
    }

    /// Lower the manifest to statements in file order.
    pub fn statements(&self, scope: &VariableScope<'_>) -> Result<Vec<Statement>, ManifestError> {
        let mut out = Vec::new();

        if !self.comment.is_empty() {
            out.push(Statement::Comment(self.comment.clone()));
            out.push(Statement::BlankLine);
        }

        for (i, path) in self.includes.iter().enumerate() {
            check_syntax(path, || format!("include #{i}"))?;
            out.push(Statement::Include(path.clone()));
        }
        if !self.includes.is_empty() {
            out.push(Statement::BlankLine);
        }

        for var in &self.variables {
            out.push(Statement::Assign {
                name: var.name.clone(),
                value: var.value.clone(),
            });
        }
        if !self.variables.is_empty() {
            out.push(Statement::BlankLine);
        }

        for pool in &self.pools {
            if !pool.comment.is_empty() {
                out.push(Statement::Comment(pool.comment.clone()));
            }
            out.push(Statement::Pool(pool.name.clone()));
            out.push(Statement::ScopedAssign {
                name: "depth".into(),
                value: pool.depth.to_string(),
            });
            out.push(Statement::BlankLine);
        }

        for rule in &self.rules {
            if !rule.comment.is_empty() {
                out.push(Statement::Comment(rule.comment.clone()));
            }
            out.push(Statement::Rule(rule.name.clone()));
            check_syntax(&rule.command, || format!("rule '{}' command", rule.name))?;
            out.push(Statement::ScopedAssign {
                name: "command".into(),
                value: rule.command.clone(),
            });
            for var in &rule.variables {
                check_syntax(&var.value, || {
                    format!("rule '{}' variable '{}'", rule.name, var.name)
                })?;
                out.push(Statement::ScopedAssign {
                    name: var.name.clone(),
                    value: var.value.clone(),
                });
            }
            out.push(Statement::BlankLine);
        }

        for (i, build) in self.builds.iter().enumerate() {
            out.push(Statement::Build(lower_build(i, build, scope)?));
            out.push(Statement::BlankLine);
        }

        if !self.defaults.is_empty() {
            let targets = parse_paths(scope, &self.defaults, || "defaults".to_string())?;
            out.push(Statement::Default(TokenGroup::escaped(targets)));
        }

        for (i, path) in self.subninjas.iter().enumerate() {
            check_syntax(path, || format!("subninja #{i}"))?;
            out.push(Statement::Subninja(path.clone()));
        }

        Ok(out)
    }

    /// Validate the manifest and write it through `writer`.
    pub fn write<W: Write>(&self, writer: &mut NinjaWriter<W>) -> Result<(), ManifestError> {
        let scope = self.scope()?;
        let statements = self.statements(&scope)?;
        emit(writer, &statements)
    }

    /// Write the build file to `path`. A partially written file is removed
    /// when generation fails.
    pub fn write_file(&self, path: &Path, line_width: usize) -> Result<(), ManifestError> {
        let scope = self.scope()?;
        let statements = self.statements(&scope)?;

        let file = File::create(path).map_err(Error::from)?;
        let mut writer = NinjaWriter::with_line_width(BufWriter::new(file), line_width);
        let result = emit(&mut writer, &statements).and_then(|()| {
            writer.into_inner().flush().map_err(Error::from)?;
            Ok(())
        });

        match &result {
            Ok(()) => info!(path = %path.display(), statements = statements.len(), "wrote build file"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "removing partial build file");
                if let Err(rm) = fs::remove_file(path) {
                    warn!(path = %path.display(), error = %rm, "could not remove partial build file");
                }
            }
        }
        result
    }
}

/// Paths were validated while lowering; rendering without a scope keeps
/// their references for Ninja to expand.
fn emit<W: Write>(
    writer: &mut NinjaWriter<W>,
    statements: &[Statement],
) -> Result<(), ManifestError> {
    debug!(statements = statements.len(), "emitting manifest");
    for stmt in statements {
        writer.write_statement(None, stmt)?;
    }
    Ok(())
}

fn lower_build(
    i: usize,
    build: &Build,
    scope: &VariableScope<'_>,
) -> Result<BuildEdge, ManifestError> {
    // Edge bindings are visible in the edge's own paths.
    let mut edge_scope = VariableScope::with_parent(scope);
    let mut variables = Vec::with_capacity(build.variables.len());
    for var in &build.variables {
        check_syntax(&var.value, || format!("build #{i} variable '{}'", var.name))?;
        edge_scope.set(var.name.as_str(), var.value.as_str());
        variables.push((var.name.clone(), var.value.clone()));
    }

    let group = |paths: &[String], field: &str| -> Result<TokenGroup, ManifestError> {
        let strings = parse_paths(&edge_scope, paths, || {
            format!("build #{i} ({}) {field}", build.rule)
        })?;
        Ok(TokenGroup::escaped(strings))
    };

    Ok(BuildEdge {
        comment: build.comment.clone(),
        rule: build.rule.clone(),
        outputs: group(&build.outputs, "outputs")?,
        implicit_outputs: group(&build.implicit_outputs, "implicit_outputs")?,
        inputs: group(&build.inputs, "inputs")?,
        implicit_inputs: group(&build.implicit_inputs, "implicit_inputs")?,
        order_only: group(&build.order_only, "order_only")?,
        validations: group(&build.validations, "validations")?,
        variables,
    })
}

fn parse_paths(
    scope: &VariableScope<'_>,
    paths: &[String],
    context: impl FnOnce() -> String,
) -> Result<Vec<NinjaString>, ManifestError> {
    NinjaString::parse_all(Some(scope), paths).map_err(|e| invalid(context(), e))
}

fn check_syntax(text: &str, context: impl FnOnce() -> String) -> Result<(), ManifestError> {
    NinjaString::parse(None, text).map_err(|e| invalid(context(), e))?;
    Ok(())
}

fn invalid(context: String, source: Error) -> ManifestError {
    ManifestError::Invalid { context, source }
}
