use std::collections::BTreeSet;

use taint_engine_core::domain::kind::Kind;
use taint_engine_core::domain::tree::{BackwardTaint, ForwardTaint};
use taint_engine_sdk::TaintSide;

/// Mutually refines a flow's two sides until no more kinds can be dropped.
/// Each of the four derived values below can only shrink between rounds, so
/// the loop reaches a fixpoint in at most `source_kinds + sink_kinds` rounds.
pub fn fixpoint(mut source: ForwardTaint, mut sink: BackwardTaint) -> (ForwardTaint, BackwardTaint) {
    let mut state = State::default();

    loop {
        let source_kinds: BTreeSet<Kind> = source.kinds().into_iter().collect();
        let sink_kinds: BTreeSet<Kind> = sink.kinds().into_iter().collect();

        let sanitized_sinks = intersect_named(&source_kinds, |k| k.extract_sanitize_transforms().sanitized_sinks);
        sink = sink.sanitize_taint_kinds(&select_by_name(&sink_kinds, &sanitized_sinks));

        let sanitized_sources = intersect_named(&sink_kinds, |k| k.extract_sanitize_transforms().sanitized_sources);
        source = source.sanitize_taint_kinds(&select_by_name(&source_kinds, &sanitized_sources));

        let source_kinds: BTreeSet<Kind> = source.kinds().into_iter().collect();
        let sink_kinds: BTreeSet<Kind> = sink.kinds().into_iter().collect();

        let single_base_source = unique_base(&source_kinds);
        if let Some(base) = &single_base_source {
            let to_drop: BTreeSet<Kind> = sink_kinds
                .iter()
                .filter(|kind| kind.extract_sanitize_transforms().sanitized_sources.contains(&base.name))
                .cloned()
                .collect();
            sink = sink.sanitize_taint_kinds(&to_drop);
        }

        let single_base_sink = unique_base(&sink_kinds);
        if let Some(base) = &single_base_sink {
            let to_drop: BTreeSet<Kind> = source_kinds
                .iter()
                .filter(|kind| kind.extract_sanitize_transforms().sanitized_sinks.contains(&base.name))
                .cloned()
                .collect();
            source = source.sanitize_taint_kinds(&to_drop);
        }

        let next = State {
            sanitized_sinks,
            sanitized_sources,
            single_base_source,
            single_base_sink,
        };
        if next == state {
            return (source, sink);
        }
        state = next;
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct State {
    sanitized_sinks: BTreeSet<String>,
    sanitized_sources: BTreeSet<String>,
    single_base_source: Option<Kind>,
    single_base_sink: Option<Kind>,
}

fn base(kind: &Kind) -> Kind {
    kind.discard_subkind().discard_sanitize_transforms()
}

/// `None` (all kinds) collapses to the empty set only at read-out, never
/// during the fold — so an empty `kinds` set yields `None` here, not `Some(∅)`.
fn unique_base(kinds: &BTreeSet<Kind>) -> Option<Kind> {
    let bases: BTreeSet<Kind> = kinds.iter().map(base).collect();
    if bases.len() == 1 {
        bases.into_iter().next()
    } else {
        None
    }
}

fn intersect_named(kinds: &BTreeSet<Kind>, names_of: impl Fn(&Kind) -> BTreeSet<String>) -> BTreeSet<String> {
    let mut acc: Option<BTreeSet<String>> = None;
    for kind in kinds {
        let names = names_of(kind);
        acc = Some(match acc {
            None => names,
            Some(current) => current.intersection(&names).cloned().collect(),
        });
    }
    acc.unwrap_or_default()
}

fn select_by_name(kinds: &BTreeSet<Kind>, names: &BTreeSet<String>) -> BTreeSet<Kind> {
    kinds.iter().filter(|kind| names.contains(&kind.name)).cloned().collect()
}
