use std::collections::BTreeSet;

/// The rule configuration the host hands to the rule engine and triggered-
/// sink tracker. Generic over the host's concrete `Kind`/`Rule` types so
/// this crate never needs to depend on the domain types that define them.
pub trait TaintConfigurationHost {
    type Kind: Clone + Ord;
    type Rule;

    fn rules(&self) -> &[Self::Rule];

    /// When true, the rule engine emits one issue per access-path partition
    /// instead of joining all candidates under one issue handle.
    fn lineage_analysis(&self) -> bool;

    /// Looks up the complementary kind for a partial sink given one source
    /// half, for the multi-source triggered-sink protocol.
    fn get_triggered_sink(&self, partial_sink: &Self::Kind, source: &Self::Kind) -> Option<Self::Kind>;

    /// The breadcrumb set every collapsed source/sink subtree is widened
    /// with during flow matching and triggered-sink partial-kind lookups.
    fn collapse_breadcrumbs(&self) -> &BTreeSet<String>;
}
