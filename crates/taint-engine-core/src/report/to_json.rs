use serde_json::{Value, json};

use taint_engine_sdk::TaintSide;

use crate::issue::issue::Issue;
use crate::issue::rule::Rule;
use crate::report::handle_digest::master_handle;

fn roots(kinds: &[String]) -> Vec<String> {
    let mut roots = kinds.to_vec();
    roots.sort();
    roots.dedup();
    roots
}

fn features(issue: &Issue) -> Vec<String> {
    let source_features = issue.flow.source.fold(Vec::new(), |mut acc, _, frame| {
        acc.extend(frame.features.iter().cloned());
        acc
    });
    let sink_features = issue.flow.sink.fold(Vec::new(), |mut acc, _, frame| {
        acc.extend(frame.features.iter().cloned());
        acc
    });
    let mut all = source_features;
    all.extend(sink_features);
    all.sort();
    all.dedup();
    all
}

/// Renders one issue into the stable JSON schema consumed by the host's
/// output layer: `callable`, `callable_line`, `code`, `line`, `start`,
/// `end`, `filename`, `message`, `traces`, `features`, `sink_handle`,
/// `master_handle`.
pub fn to_json(issue: &Issue, rule: &Rule, callable_line: u32) -> Value {
    let location = issue.canonical_location();
    let source_kinds: Vec<String> = issue.flow.source.kinds().into_iter().map(|k| k.name).collect();
    let sink_kinds: Vec<String> = issue.flow.sink.kinds().into_iter().map(|k| k.name).collect();

    json!({
        "callable": issue.define.qualified_name(),
        "callable_line": callable_line,
        "code": issue.handle.code,
        "line": location.line,
        "start": location.start,
        "end": location.end,
        "filename": location.file,
        "message": rule.render_message(),
        "traces": [
            {"name": "forward", "roots": roots(&source_kinds)},
            {"name": "backward", "roots": roots(&sink_kinds)},
        ],
        "features": features(issue),
        "sink_handle": serde_json::to_value(&issue.handle.sink).unwrap_or(Value::Null),
        "master_handle": master_handle(&issue.handle),
    })
}
