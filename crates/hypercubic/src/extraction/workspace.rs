//! Splitting and merging shared by both engines.
//!
//! A [`Workspace`] owns the working sample set of one run: the real dataset
//! rows plus every synthetic row drawn to top up sparse cubes. Cube statistics
//! are always computed on the working set.

use std::collections::BTreeSet;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cube::{BoundaryKind, CubeError, HyperCube, Interval, OutputKind};
use crate::data::Dataset;
use crate::grid::GridLevel;
use crate::predictor::Predictor;
use crate::utils::Parallelism;

/// Two cubes of a merge pool with their ids.
type Pair<'c> = (usize, &'c HyperCube, usize, &'c HyperCube);

/// A merge candidate: two cubes, by id, and their union.
struct Candidate {
    left: usize,
    right: usize,
    merged: HyperCube,
}

pub(crate) struct Workspace<'a, P: ?Sized> {
    real: &'a Dataset,
    working: Dataset,
    predictor: &'a P,
    kind: OutputKind,
    boundary: BoundaryKind,
    min_examples: usize,
    threshold: f64,
    rng: StdRng,
    parallelism: Parallelism,
    ignored: BTreeSet<String>,
}

impl<'a, P: Predictor + ?Sized> Workspace<'a, P> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        real: &'a Dataset,
        predictor: &'a P,
        kind: OutputKind,
        boundary: BoundaryKind,
        min_examples: usize,
        threshold: f64,
        seed: u64,
        parallelism: Parallelism,
    ) -> Self {
        Self {
            real,
            working: real.without_targets(),
            predictor,
            kind,
            boundary,
            min_examples,
            threshold,
            rng: StdRng::seed_from_u64(seed),
            parallelism,
            ignored: BTreeSet::new(),
        }
    }

    /// Real rows plus synthetic rows drawn so far.
    pub(crate) fn working(&self) -> &Dataset {
        &self.working
    }

    pub(crate) fn predictor(&self) -> &'a P {
        self.predictor
    }

    /// Features never split at some level.
    pub(crate) fn into_ignored(self) -> Vec<String> {
        self.ignored.into_iter().collect()
    }

    /// Split `cube` along the level's grid and evaluate the children.
    ///
    /// Children without real rows are dropped unless `keep_empty`. Kept
    /// children with fewer than `min_examples` real rows are topped up with
    /// synthetic rows before every child is updated on the working set.
    pub(crate) fn split(
        &mut self,
        cube: &HyperCube,
        level: GridLevel<'_>,
        keep_empty: bool,
    ) -> Result<Vec<HyperCube>, CubeError> {
        let ranges: Vec<(String, Vec<Interval>)> = cube
            .dimensions()
            .iter()
            .map(|(name, interval)| {
                let parts = level.partitions(name);
                if parts <= 1 {
                    self.ignored.insert(name.clone());
                }
                (name.clone(), interval.split(parts))
            })
            .collect();

        let mut children = Vec::new();
        for bounds in product(&ranges) {
            let child = HyperCube::with_kind(bounds, self.kind, self.boundary);
            let n = child.count(self.real)?;
            if n == 0 && !keep_empty {
                continue;
            }
            if n < self.min_examples {
                self.top_up(&child, self.min_examples - n)?;
            }
            children.push(child);
        }

        self.update_all(children)
    }

    /// Greedily merge adjacent cubes while their union has a diversity below
    /// the threshold, lowest union diversity first.
    pub(crate) fn merge(&self, cubes: Vec<HyperCube>) -> Result<Vec<HyperCube>, CubeError> {
        let mut pool: Vec<(usize, HyperCube)> = cubes.into_iter().enumerate().collect();
        let mut next_id = pool.len();

        let pairs: Vec<Pair<'_>> = pool
            .iter()
            .enumerate()
            .flat_map(|(i, (a_id, a))| {
                pool[i + 1..]
                    .iter()
                    .map(move |(b_id, b)| (*a_id, a, *b_id, b))
            })
            .collect();
        let mut candidates = self.candidates(pairs)?;

        loop {
            let position = |id: usize| pool.iter().position(|(other, _)| *other == id);
            let best = candidates
                .iter()
                .enumerate()
                .min_by(|(_, x), (_, y)| {
                    x.merged
                        .diversity()
                        .total_cmp(&y.merged.diversity())
                        .then_with(|| {
                            (position(x.left), position(x.right))
                                .cmp(&(position(y.left), position(y.right)))
                        })
                })
                .map(|(i, _)| i);
            let Some(best) = best else {
                break;
            };

            let Candidate { left, right, merged } = candidates.swap_remove(best);
            pool.retain(|(id, _)| *id != left && *id != right);
            candidates.retain(|c| ![c.left, c.right].iter().any(|id| *id == left || *id == right));

            let id = next_id;
            next_id += 1;
            let fresh = {
                let pairs = pool.iter().map(|(a_id, a)| (*a_id, a, id, &merged)).collect();
                self.candidates(pairs)?
            };
            pool.push((id, merged));
            candidates.extend(fresh);
        }

        Ok(pool.into_iter().map(|(_, cube)| cube).collect())
    }

    fn top_up(&mut self, cube: &HyperCube, n: usize) -> Result<(), CubeError> {
        let samples: Array2<f64> = cube.create_samples(n, &mut self.rng);
        self.working = self.working.with_samples(samples.view())?;
        Ok(())
    }

    fn update_all(&self, cubes: Vec<HyperCube>) -> Result<Vec<HyperCube>, CubeError> {
        self.parallelism
            .maybe_par_map(cubes, |mut cube| -> Result<HyperCube, CubeError> {
                cube.update(&self.working, self.predictor)?;
                Ok(cube)
            })
            .into_iter()
            .collect()
    }

    fn candidates(
        &self,
        pairs: Vec<Pair<'_>>,
    ) -> Result<Vec<Candidate>, CubeError> {
        let evaluate = |(left, a, right, b): Pair<'_>| -> Result<Option<Candidate>, CubeError> {
            let Some(feature) = a.is_adjacent(b)? else {
                return Ok(None);
            };
            let mut merged = a.merge_along_dimension(b, &feature)?;
            merged.update(&self.working, self.predictor)?;
            let accepted = merged.diversity() < self.threshold;
            Ok(accepted.then_some(Candidate { left, right, merged }))
        };
        let evaluated: Vec<Result<Option<Candidate>, CubeError>> =
            self.parallelism.maybe_par_map(pairs, evaluate);
        evaluated
            .into_iter()
            .filter_map(Result::transpose)
            .collect()
    }
}

/// Cartesian product of per-feature intervals. The first feature varies slowest.
fn product(ranges: &[(String, Vec<Interval>)]) -> Vec<Vec<(String, Interval)>> {
    let mut combos: Vec<Vec<(String, Interval)>> = vec![Vec::with_capacity(ranges.len())];
    for (name, parts) in ranges {
        combos = combos
            .into_iter()
            .flat_map(|combo| {
                parts.iter().map(move |part| {
                    let mut next = combo.clone();
                    next.push((name.clone(), *part));
                    next
                })
            })
            .collect();
    }
    combos
}
