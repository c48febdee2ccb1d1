//! A `rayon`-backed `Scheduler`, built only behind the `parallel` feature.
//! The default `SequentialScheduler` from `taint-engine-sdk` needs no extra
//! dependency; this is strictly an opt-in for larger demo fixture sets.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use taint_engine_sdk::Scheduler;

#[derive(Clone, Copy, Debug, Default)]
pub struct RayonScheduler;

impl Scheduler for RayonScheduler {
    fn map_reduce<T, R>(&self, inputs: Vec<T>, initial: R, map: impl Fn(T) -> R + Sync, reduce: impl Fn(R, R) -> R + Sync) -> R
    where
        T: Send,
        R: Send + Clone,
    {
        inputs.into_par_iter().map(map).reduce(|| initial.clone(), reduce)
    }
}
