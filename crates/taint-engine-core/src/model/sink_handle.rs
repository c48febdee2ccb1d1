use serde::{Deserialize, Serialize};

use crate::model::target::Target;

/// Which part of a call a sink taint reaches.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(tag = "port", rename_all = "snake_case")]
pub enum ParameterPort {
    Positional { index: u32 },
    Named { name: String },
    Return,
}

/// Distinguishes call sites at a definition so that two flows into
/// different arguments of the same callee, or into a global, never share a
/// handle. Two `SinkHandle`s are equal iff every field matches.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum SinkHandle {
    Call {
        callee: Target,
        call_index: u32,
        parameter_port: ParameterPort,
    },
    Global {
        kind: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{ParameterPort, SinkHandle, Target};

    #[test]
    fn different_parameter_ports_make_distinct_handles() {
        let callee = Target::Function {
            name: "execute".to_string(),
        };
        let first = SinkHandle::Call {
            callee: callee.clone(),
            call_index: 0,
            parameter_port: ParameterPort::Positional { index: 0 },
        };
        let second = SinkHandle::Call {
            callee,
            call_index: 0,
            parameter_port: ParameterPort::Positional { index: 1 },
        };
        assert_ne!(first, second);
    }

    #[test]
    fn global_handles_compare_by_kind_only() {
        let a = SinkHandle::Global {
            kind: "os.environ".to_string(),
        };
        let b = SinkHandle::Global {
            kind: "os.environ".to_string(),
        };
        assert_eq!(a, b);
    }
}
