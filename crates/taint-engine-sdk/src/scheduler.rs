/// Map-reduce scheduling contract the host provides to the query executor
/// and, in principle, to any other whole-program pass that fans work out
/// across worker shards. The core never spawns threads itself; it asks the
/// host for one.
///
/// `map` is applied to each input independently (shards own their inputs
/// exclusively, per the concurrency model: no input is visited by two
/// shards). `reduce` must be commutative and associative so that the
/// result is independent of shard count and scheduling order.
pub trait Scheduler {
    fn map_reduce<T, R>(
        &self,
        inputs: Vec<T>,
        initial: R,
        map: impl Fn(T) -> R + Sync,
        reduce: impl Fn(R, R) -> R + Sync,
    ) -> R
    where
        T: Send,
        R: Send + Clone;
}

/// A trivial single-shard scheduler usable wherever a `Scheduler` is
/// required but no parallelism is desired (small inputs, deterministic
/// tests). Hosts that want real parallelism supply their own.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialScheduler;

impl Scheduler for SequentialScheduler {
    fn map_reduce<T, R>(
        &self,
        inputs: Vec<T>,
        initial: R,
        map: impl Fn(T) -> R + Sync,
        reduce: impl Fn(R, R) -> R + Sync,
    ) -> R
    where
        T: Send,
        R: Send + Clone,
    {
        inputs
            .into_iter()
            .map(map)
            .fold(initial, |acc, item| reduce(acc, item))
    }
}
