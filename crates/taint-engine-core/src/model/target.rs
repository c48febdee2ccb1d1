use serde::{Deserialize, Serialize};

/// The analysis target a rule, issue, or query result is attached to.
/// Mirrors `taint_engine_sdk::ModelableKind` but is a value (not a
/// descriptor over a live parse tree) — this is what gets serialized into
/// issue handles and JSON reports.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Function { name: String },
    Method { class: String, name: String },
    Attribute { class: String, name: String },
    Global { name: String },
}

impl Target {
    pub fn qualified_name(&self) -> String {
        match self {
            Self::Function { name } => name.clone(),
            Self::Method { class, name } => format!("{class}.{name}"),
            Self::Attribute { class, name } => format!("{class}.{name}"),
            Self::Global { name } => name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Target;

    #[test]
    fn qualified_name_includes_class_for_methods() {
        let method = Target::Method {
            class: "Handler".to_string(),
            name: "run".to_string(),
        };
        assert_eq!(method.qualified_name(), "Handler.run");
    }

    #[test]
    fn qualified_name_is_bare_for_functions_and_globals() {
        assert_eq!(
            Target::Function {
                name: "main".to_string()
            }
            .qualified_name(),
            "main"
        );
        assert_eq!(
            Target::Global {
                name: "CONFIG".to_string()
            }
            .qualified_name(),
            "CONFIG"
        );
    }
}
