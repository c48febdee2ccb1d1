use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A single parameter of a callable modelable, as the host's parser
/// reports it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub position: u32,
    pub annotation: Option<String>,
}

/// A decorator application on a callable, with its positional and keyword
/// arguments already split out by the host's parser.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DecoratorDescriptor {
    pub name: String,
    pub positional_args: Vec<String>,
    pub keyword_args: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CallableDescriptor {
    pub name: String,
    pub fully_qualified_name: String,
    pub class_name: Option<String>,
    pub return_annotation: Option<String>,
    pub parameters: Vec<ParameterDescriptor>,
    pub decorators: Vec<DecoratorDescriptor>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AttributeDescriptor {
    pub name: String,
    pub fully_qualified_name: String,
    pub class_name: String,
    pub annotation: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GlobalDescriptor {
    pub name: String,
    pub fully_qualified_name: String,
    pub annotation: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ModelableKind {
    Function,
    Method,
    Attribute,
    Global,
}

impl Display for ModelableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function => write!(f, "function"),
            Self::Method => write!(f, "method"),
            Self::Attribute => write!(f, "attribute"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// A tagged variant over the three analysis-target kinds a query can
/// match. Operations that make no sense for a case (e.g. `parameters` on
/// an attribute) return `ModelableError::UnsupportedOperation` rather than
/// an empty default — callers must not silently treat "not applicable" as
/// "no match."
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Modelable {
    Function(CallableDescriptor),
    Method(CallableDescriptor),
    Attribute(AttributeDescriptor),
    Global(GlobalDescriptor),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModelableError {
    UnsupportedOperation {
        operation: &'static str,
        kind: ModelableKind,
    },
}

impl Display for ModelableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedOperation { operation, kind } => {
                write!(f, "operation '{operation}' is not supported on a {kind}")
            }
        }
    }
}

impl Error for ModelableError {}

impl Modelable {
    pub fn kind(&self) -> ModelableKind {
        match self {
            Self::Function(_) => ModelableKind::Function,
            Self::Method(_) => ModelableKind::Method,
            Self::Attribute(_) => ModelableKind::Attribute,
            Self::Global(_) => ModelableKind::Global,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Function(c) | Self::Method(c) => &c.name,
            Self::Attribute(a) => &a.name,
            Self::Global(g) => &g.name,
        }
    }

    pub fn fully_qualified_name(&self) -> &str {
        match self {
            Self::Function(c) | Self::Method(c) => &c.fully_qualified_name,
            Self::Attribute(a) => &a.fully_qualified_name,
            Self::Global(g) => &g.fully_qualified_name,
        }
    }

    pub fn return_annotation(&self) -> Result<Option<&str>, ModelableError> {
        match self {
            Self::Function(c) | Self::Method(c) => Ok(c.return_annotation.as_deref()),
            other => Err(ModelableError::UnsupportedOperation {
                operation: "return_annotation",
                kind: other.kind(),
            }),
        }
    }

    pub fn parameters(&self) -> Result<&[ParameterDescriptor], ModelableError> {
        match self {
            Self::Function(c) | Self::Method(c) => Ok(&c.parameters),
            other => Err(ModelableError::UnsupportedOperation {
                operation: "parameters",
                kind: other.kind(),
            }),
        }
    }

    pub fn decorators(&self) -> Result<&[DecoratorDescriptor], ModelableError> {
        match self {
            Self::Function(c) | Self::Method(c) => Ok(&c.decorators),
            other => Err(ModelableError::UnsupportedOperation {
                operation: "decorators",
                kind: other.kind(),
            }),
        }
    }

    pub fn class_name(&self) -> Result<Option<&str>, ModelableError> {
        match self {
            Self::Method(c) => Ok(c.class_name.as_deref()),
            Self::Attribute(a) => Ok(Some(a.class_name.as_str())),
            Self::Function(_) => Ok(None),
            other @ Self::Global(_) => Err(ModelableError::UnsupportedOperation {
                operation: "class_name",
                kind: other.kind(),
            }),
        }
    }

    pub fn type_annotation(&self) -> Result<Option<&str>, ModelableError> {
        match self {
            Self::Attribute(a) => Ok(a.annotation.as_deref()),
            Self::Global(g) => Ok(g.annotation.as_deref()),
            other => Err(ModelableError::UnsupportedOperation {
                operation: "type_annotation",
                kind: other.kind(),
            }),
        }
    }
}

/// Host-provided enumeration of every callable (function or method) target
/// in the analyzed program, for phases of the query executor that must
/// consider all targets of a kind rather than a cache-restricted subset.
pub trait CallableIterator {
    fn callables(&self) -> Vec<CallableDescriptor>;
}

pub trait AttributeIterator {
    fn attributes(&self) -> Vec<AttributeDescriptor>;
}

pub trait GlobalIterator {
    fn globals(&self) -> Vec<GlobalDescriptor>;
}

#[cfg(test)]
mod tests {
    use super::{
        CallableDescriptor, CallableIterator, GlobalDescriptor, Modelable, ModelableError,
        ModelableKind,
    };

    struct FixedCallables(Vec<CallableDescriptor>);

    impl CallableIterator for FixedCallables {
        fn callables(&self) -> Vec<CallableDescriptor> {
            self.0.clone()
        }
    }

    #[test]
    fn callable_iterator_returns_the_fixed_set() {
        let iter = FixedCallables(vec![CallableDescriptor {
            name: "f".to_string(),
            fully_qualified_name: "m.f".to_string(),
            ..Default::default()
        }]);
        assert_eq!(iter.callables().len(), 1);
    }

    fn function() -> Modelable {
        Modelable::Function(CallableDescriptor {
            name: "handler".to_string(),
            fully_qualified_name: "app.routes.handler".to_string(),
            return_annotation: Some("str".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn parameters_valid_on_function_invalid_on_global() {
        assert!(function().parameters().is_ok());

        let global = Modelable::Global(GlobalDescriptor {
            name: "CONFIG".to_string(),
            fully_qualified_name: "app.CONFIG".to_string(),
            annotation: None,
        });
        assert_eq!(
            global.parameters(),
            Err(ModelableError::UnsupportedOperation {
                operation: "parameters",
                kind: ModelableKind::Global,
            })
        );
    }

    #[test]
    fn return_annotation_reads_through() {
        assert_eq!(function().return_annotation(), Ok(Some("str")));
    }

    #[test]
    fn class_name_is_none_not_error_for_plain_function() {
        assert_eq!(function().class_name(), Ok(None));
    }
}
