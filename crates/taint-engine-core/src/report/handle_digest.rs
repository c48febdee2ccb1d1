use crate::domain::handle::IssueHandle;

const DIGEST_VERSION: &str = "v1";

/// A stable 32-character hex digest of an issue handle, used as the
/// `master_handle` field of a rendered issue so downstream tooling can key
/// off a fixed-width identifier instead of the full handle shape.
pub fn master_handle(handle: &IssueHandle) -> String {
    let payload = format!(
        "{DIGEST_VERSION}|{}|{}|{:?}",
        handle.code,
        handle.callable.qualified_name(),
        handle.sink
    );
    let digest = blake3::hash(payload.as_bytes()).to_hex().to_string();
    digest[..32].to_string()
}

#[cfg(test)]
mod tests {
    use super::master_handle;
    use crate::domain::handle::IssueHandle;
    use crate::model::sink_handle::SinkHandle;
    use crate::model::target::Target;

    #[test]
    fn master_handle_is_32_hex_characters() {
        let handle = IssueHandle::new(
            1001,
            Target::Function {
                name: "run".to_string(),
            },
            SinkHandle::Global {
                kind: "db.execute".to_string(),
            },
        );
        let digest = master_handle(&handle);
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn master_handle_is_stable_across_calls() {
        let handle = IssueHandle::new(
            1001,
            Target::Function {
                name: "run".to_string(),
            },
            SinkHandle::Global {
                kind: "db.execute".to_string(),
            },
        );
        assert_eq!(master_handle(&handle), master_handle(&handle));
    }

    #[test]
    fn master_handle_differs_for_different_codes() {
        let callable = Target::Function {
            name: "run".to_string(),
        };
        let sink = SinkHandle::Global {
            kind: "db.execute".to_string(),
        };
        let a = master_handle(&IssueHandle::new(1001, callable.clone(), sink.clone()));
        let b = master_handle(&IssueHandle::new(1002, callable, sink));
        assert_ne!(a, b);
    }
}
