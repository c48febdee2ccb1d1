use taint_engine_core::domain::kind::Kind;
use taint_engine_core::model::location::Location;
use taint_engine_sdk::ModelableKind;

use crate::constraint::Constraint;

/// The name-template a write-to-cache clause renders into a cache key for
/// each target it matches: `Literal` is inserted verbatim, `FunctionName`/
/// `MethodName`/`ClassName` read off the matched target, and `Capture`
/// reads a regex sub-group recorded in the name-captures buffer.
#[derive(Clone, Debug)]
pub enum NameTemplatePart {
    Literal(String),
    FunctionName,
    MethodName,
    ClassName,
    Capture(usize),
}

pub fn render_name_template(template: &[NameTemplatePart], target_name: &str, class_name: Option<&str>, captures: &[String]) -> String {
    template
        .iter()
        .map(|part| match part {
            NameTemplatePart::Literal(text) => text.clone(),
            NameTemplatePart::FunctionName | NameTemplatePart::MethodName => target_name.to_string(),
            NameTemplatePart::ClassName => class_name.unwrap_or_default().to_string(),
            NameTemplatePart::Capture(index) => captures.get(*index).cloned().unwrap_or_default(),
        })
        .collect()
}

/// A single piece of a model: either the target's taint kind (source or
/// sink, attached statically or derived from a parametric annotation
/// pattern), or a feature derived dynamically from another parameter at
/// each call site. `$global` in `parameter` is the host-recognized
/// sentinel rewritten to the parameter under consideration when a
/// production appears inside an `AllParameters`/`Parameter` clause.
#[derive(Clone, Debug)]
pub enum Production {
    SourceTaint(Kind),
    SinkTaint(Kind),
    ParametricSource { pattern: String, kind: Kind },
    ParametricSink { pattern: String, kind: Kind },
    ViaTypeOf { parameter: String },
    ViaValueOf { parameter: String },
}

pub const GLOBAL_SENTINEL: &str = "$global";

impl Production {
    pub fn rewrite_global_sentinel(&self, parameter: &str) -> Self {
        match self {
            Self::ViaTypeOf { parameter: p } if p == GLOBAL_SENTINEL => Self::ViaTypeOf { parameter: parameter.to_string() },
            Self::ViaValueOf { parameter: p } if p == GLOBAL_SENTINEL => Self::ViaValueOf { parameter: parameter.to_string() },
            other => other.clone(),
        }
    }
}

/// Extracts the subkind captured between `pattern(` and the matching `)`
/// inside a parametric annotation expression, e.g. for pattern
/// `TaintSource` and annotation `Annotated[str, TaintSource(header)]`
/// returns `Some("header")`.
pub fn parse_parametric_subkind(annotation: &str, pattern: &str) -> Option<String> {
    let marker = format!("{pattern}(");
    let start = annotation.find(&marker)? + marker.len();
    let end = annotation[start..].find(')')? + start;
    Some(annotation[start..end].to_string())
}

#[derive(Clone, Debug)]
pub enum ModelClause {
    Return(Vec<Production>),
    NamedParameter { name: String, productions: Vec<Production> },
    PositionalParameter { index: u32, productions: Vec<Production> },
    AllParameters { excludes: Vec<String>, productions: Vec<Production> },
    Parameter { where_: Constraint, productions: Vec<Production> },
    Attribute(Vec<Production>),
    Global(Vec<Production>),
    WriteToCache { kind: String, name_template: Vec<NameTemplatePart> },
}

impl ModelClause {
    pub fn is_write_to_cache(&self) -> bool {
        matches!(self, Self::WriteToCache { .. })
    }
}

#[derive(Clone, Debug)]
pub struct Query {
    pub name: String,
    pub find: ModelableKind,
    pub where_: Constraint,
    pub models: Vec<ModelClause>,
    pub expected_models: Vec<String>,
    pub unexpected_models: Vec<String>,
    pub location: Location,
}

impl Query {
    /// A query belongs in the write-to-cache bin iff it has at least one
    /// `WriteToCache` clause; such a query's `where` must not itself
    /// reference `ReadFromCache` (checked by the caller, not here — this
    /// only identifies bin membership).
    pub fn writes_to_cache(&self) -> bool {
        self.models.iter().any(ModelClause::is_write_to_cache)
    }

    pub fn reads_from_cache(&self) -> bool {
        self.where_.references_read_from_cache()
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_parametric_subkind, render_name_template, NameTemplatePart};

    #[test]
    fn parse_parametric_subkind_extracts_the_inner_text() {
        let annotation = "Annotated[str, TaintSource(header)]";
        assert_eq!(parse_parametric_subkind(annotation, "TaintSource"), Some("header".to_string()));
    }

    #[test]
    fn parse_parametric_subkind_is_none_when_the_pattern_is_absent() {
        assert_eq!(parse_parametric_subkind("str", "TaintSource"), None);
    }

    #[test]
    fn render_name_template_composes_literal_and_capture_parts() {
        let template = vec![
            NameTemplatePart::Literal("handler::".to_string()),
            NameTemplatePart::FunctionName,
            NameTemplatePart::Literal("::".to_string()),
            NameTemplatePart::Capture(0),
        ];
        let rendered = render_name_template(&template, "run", None, &["v1".to_string()]);
        assert_eq!(rendered, "handler::run::v1");
    }
}
