use taint_engine_core::domain::tree::{BackwardTaint, ForwardTaint};
use taint_engine_core::issue::{Flow, Transform};
use taint_engine_sdk::TaintSide;

use crate::sanitizer;

/// Splits `rule`'s named transform sequence at every prefix/suffix boundary,
/// keeps only the source kinds carrying the prefix and the sink kinds
/// carrying the suffix, runs the sanitizer fixpoint on each split, and
/// joins every non-bottom result. A rule with no named transforms has
/// exactly one split: the empty prefix against the empty suffix, i.e. every
/// kind is kept as-is.
pub fn split_and_join(transforms: &[Transform], source: &ForwardTaint, sink: &BackwardTaint) -> Flow {
    let mut accumulator = Flow::new(ForwardTaint::bottom(), BackwardTaint::bottom());

    for split_at in 0..=transforms.len() {
        let (prefix, suffix) = transforms.split_at(split_at);
        let source_split = select_by_named_transforms(source, prefix);
        let sink_split = select_by_named_transforms(sink, suffix);

        if source_split.is_bottom() || sink_split.is_bottom() {
            continue;
        }

        let (source_sanitized, sink_sanitized) = sanitizer::fixpoint(source_split, sink_split);
        accumulator = accumulator.join(&Flow::new(source_sanitized, sink_sanitized));
    }

    accumulator
}

fn select_by_named_transforms<S: TaintSide<Kind = taint_engine_core::domain::kind::Kind>>(
    side: &S,
    transforms: &[Transform],
) -> S {
    side.partition()
        .into_iter()
        .filter(|(kind, _)| kind.get_named_transforms() == transforms)
        .fold(S::bottom(), |acc, (_, part)| acc.join(&part))
}

#[cfg(test)]
mod tests {
    use super::split_and_join;
    use taint_engine_core::domain::frame::{CallInfo, Frame};
    use taint_engine_core::domain::kind::Kind;
    use taint_engine_core::domain::tree::{BackwardTaint, ForwardTaint};
    use taint_engine_core::model::location::Location;
    use taint_engine_sdk::TaintSide;

    fn frame() -> Frame {
        Frame::leaf(CallInfo::Origin {
            location: Location::new("a.py", 0, 1, 1, 1),
        })
    }

    #[test]
    fn no_transforms_keeps_untransformed_kinds() {
        let source = ForwardTaint::singleton(Kind::new("UserControlled"), frame());
        let sink = BackwardTaint::singleton(Kind::new("SqlInjection"), frame());

        let flow = split_and_join(&[], &source, &sink);
        assert!(!flow.is_bottom());
    }

    #[test]
    fn a_rule_whose_transform_matches_neither_side_of_any_split_contributes_nothing() {
        let source = ForwardTaint::singleton(
            Kind::new("UserControlled").with_named_transforms(vec!["decode".to_string()]),
            frame(),
        );
        let sink = BackwardTaint::singleton(
            Kind::new("SqlInjection").with_named_transforms(vec!["other".to_string()]),
            frame(),
        );

        let flow = split_and_join(&["decode".to_string()], &source, &sink);
        assert!(flow.is_bottom());
    }

    #[test]
    fn matching_prefix_and_suffix_produce_a_flow() {
        let source = ForwardTaint::singleton(
            Kind::new("UserControlled").with_named_transforms(vec!["decode".to_string()]),
            frame(),
        );
        let sink = BackwardTaint::singleton(Kind::new("SqlInjection"), frame());

        let flow_full_prefix = split_and_join(&["decode".to_string()], &source, &sink);
        assert!(!flow_full_prefix.is_bottom());
    }
}
