//! Gain-pruned hierarchical extraction.
//!
//! HEx refines the surrounding cube like [`GridEx`](super::GridEx) but keeps
//! the refinement as a tree. A child is kept only when it gains over its
//! nearest kept ancestor, and only kept children are refined further. A
//! parent whose kept children do not cover all of its samples is re-evaluated
//! on the samples left to it.

use super::workspace::Workspace;
use super::{finalize, resolve_output, ExtractedCubes, ExtractionConfig, ExtractionError, ExtractionLogger, Extractor};
use crate::cube::{CubeError, HyperCube, OutputKind};
use crate::data::Dataset;
use crate::predictor::Predictor;
use crate::utils::{run_with_threads, Parallelism};

/// Share of the threshold a child must improve on its ancestor's diversity.
const GAIN_DAMPING: f64 = 0.6;

/// Index of the root node.
const ROOT: usize = 0;

/// Whether `child` improves on `ancestor` enough to be kept.
///
/// Classification cubes gain when their label differs; the others when the
/// diversity drops by more than `GAIN_DAMPING * threshold`.
fn has_gain(ancestor: &HyperCube, child: &HyperCube, threshold: f64) -> bool {
    match ancestor.kind() {
        OutputKind::Classification => ancestor.output() != child.output(),
        OutputKind::Constant | OutputKind::Regression => {
            ancestor.diversity() - child.diversity() > threshold * GAIN_DAMPING
        }
    }
}

// =============================================================================
// Partition tree
// =============================================================================

#[derive(Debug, Clone)]
struct Node {
    cube: HyperCube,
    parent: Option<usize>,
    children: Vec<usize>,
    gain: bool,
}

/// Arena of nodes addressed by index. The root is always kept.
///
/// Replacing the children of a node leaves the old ones in the arena,
/// unreachable.
#[derive(Debug, Clone)]
struct PartitionTree {
    nodes: Vec<Node>,
}

impl PartitionTree {
    fn new(root: HyperCube) -> Self {
        Self {
            nodes: vec![Node {
                cube: root,
                parent: None,
                children: Vec::new(),
                gain: true,
            }],
        }
    }

    fn cube(&self, id: usize) -> &HyperCube {
        &self.nodes[id].cube
    }

    fn into_root(mut self) -> HyperCube {
        self.nodes.swap_remove(ROOT).cube
    }

    /// `id` itself if kept, else its nearest kept ancestor.
    fn kept_ancestor(&self, id: usize) -> usize {
        let mut current = id;
        while !self.nodes[current].gain {
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Replace the children of `id`, flagging each one's gain against the
    /// nearest kept ancestor of `id`.
    fn set_children(&mut self, id: usize, cubes: Vec<HyperCube>, threshold: f64) {
        let ancestor = self.kept_ancestor(id);
        let mut children = Vec::with_capacity(cubes.len());
        for cube in cubes {
            let gain = has_gain(&self.nodes[ancestor].cube, &cube, threshold);
            children.push(self.nodes.len());
            self.nodes.push(Node {
                cube,
                parent: Some(id),
                children: Vec::new(),
                gain,
            });
        }
        self.nodes[id].children = children;
    }

    /// Children of `id` holding at least one sample of `working`.
    fn eligible_children(&self, id: usize, working: &Dataset) -> Result<Vec<usize>, CubeError> {
        let mut eligible = Vec::new();
        for &child in &self.nodes[id].children {
            if self.nodes[child].cube.count(working)? > 0 {
                eligible.push(child);
            }
        }
        Ok(eligible)
    }

    /// Eligible children of `id` that gain.
    fn permanent_children(&self, id: usize, working: &Dataset) -> Result<Vec<usize>, CubeError> {
        Ok(self
            .eligible_children(id, working)?
            .into_iter()
            .filter(|&child| self.nodes[child].gain)
            .collect())
    }

    /// Re-evaluate a kept node on the samples its permanent children leave to
    /// it. Returns the cubes of the eligible children.
    fn update<P: Predictor + ?Sized>(
        &mut self,
        id: usize,
        working: &Dataset,
        predictor: &P,
    ) -> Result<Vec<HyperCube>, CubeError> {
        let eligible = self.eligible_children(id, working)?;

        let mut claimed = vec![false; working.n_samples()];
        let mut any_gain = false;
        for &child in &eligible {
            if self.nodes[child].gain {
                any_gain = true;
                let mask = self.nodes[child].cube.filter_indices(working)?;
                for (flag, inside) in claimed.iter_mut().zip(mask) {
                    *flag |= inside;
                }
            }
        }

        if any_gain && self.nodes[id].gain {
            let own = self.nodes[id].cube.filter_indices(working)?;
            let n_own = own.iter().filter(|&&inside| inside).count();
            let n_claimed = claimed.iter().filter(|&&inside| inside).count();
            if n_own > n_claimed {
                let remainder: Vec<bool> = own.iter().zip(&claimed).map(|(&o, &c)| o && !c).collect();
                let rows = working.select(&remainder);
                self.nodes[id].cube.update(&rows, predictor)?;
            }
        }

        Ok(eligible.into_iter().map(|child| self.nodes[child].cube.clone()).collect())
    }

    /// [`update`](Self::update) the subtree of `id`, children first.
    fn update_recursive<P: Predictor + ?Sized>(
        &mut self,
        id: usize,
        working: &Dataset,
        predictor: &P,
    ) -> Result<(), CubeError> {
        for child in self.nodes[id].children.clone() {
            self.update_recursive(child, working, predictor)?;
        }
        self.update(id, working, predictor)?;
        Ok(())
    }

    /// Kept cubes below `id`, deepest first.
    fn linearize(&self, id: usize, working: &Dataset) -> Result<Vec<HyperCube>, CubeError> {
        let permanent = self.permanent_children(id, working)?;
        let mut cubes = Vec::new();
        for &child in &permanent {
            cubes.extend(self.linearize(child, working)?);
        }
        cubes.extend(permanent.iter().map(|&child| self.nodes[child].cube.clone()));
        Ok(cubes)
    }
}

// =============================================================================
// HEx
// =============================================================================

/// Hierarchical extractor.
///
/// Per grid level, every kept node is split (empty children included), the
/// children are flagged by gain, the node is re-evaluated on its unclaimed
/// samples, and the eligible children are merged and re-attached. Only kept
/// children are split at the next level.
///
/// The result lists kept cubes deepest first, so a nested cube shadows the
/// ancestors it refines.
#[derive(Debug, Clone, Default)]
pub struct HEx {
    config: ExtractionConfig,
}

impl HEx {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    fn run<P: Predictor + ?Sized>(
        &self,
        dataset: &Dataset,
        predictor: &P,
        output: OutputKind,
        parallelism: Parallelism,
    ) -> Result<ExtractedCubes, ExtractionError> {
        let config = &self.config;
        let threshold = config.threshold;

        let mut logger = ExtractionLogger::new(config.verbosity);
        logger.start_extraction("hex", config.grid.n_levels(), dataset.n_samples());

        let mut surrounding = HyperCube::create_surrounding_cube(dataset, output, config.boundary)?;
        surrounding.update(dataset, predictor)?;

        let mut ws = Workspace::new(
            dataset,
            predictor,
            output,
            config.boundary,
            config.min_examples,
            threshold,
            config.seed,
            parallelism,
        );
        let mut tree = PartitionTree::new(surrounding);

        let mut kept = 0;
        let mut current = vec![ROOT];
        for level in config.grid.iterate() {
            let _span = tracing::info_span!("level", index = level.index()).entered();
            let mut next = Vec::new();
            for id in current {
                let children = ws.split(tree.cube(id), level, true)?;
                tree.set_children(id, children, threshold);

                let cleaned = tree.update(id, ws.working(), ws.predictor())?;
                let before = cleaned.len();
                let merged = ws.merge(cleaned)?;
                logger.log_merges(level.index(), before, merged.len());
                tree.set_children(id, merged, threshold);

                next.extend(tree.permanent_children(id, ws.working())?);
            }
            kept += next.len();
            current = next;
            logger.log_level(level.index(), current.len(), kept);
        }

        tree.update_recursive(ROOT, ws.working(), ws.predictor())?;
        let cubes = tree.linearize(ROOT, ws.working())?;

        let result = finalize(cubes, tree.into_root(), dataset, output, ws.into_ignored(), &logger)?;
        logger.finish_extraction(result.len());
        Ok(result)
    }
}

impl Extractor for HEx {
    #[tracing::instrument(skip_all, name = "hex::extract")]
    fn extract<P: Predictor + ?Sized>(
        &self,
        dataset: &Dataset,
        predictor: &P,
    ) -> Result<ExtractedCubes, ExtractionError> {
        let output = resolve_output(self.config.output, dataset, predictor)?;
        run_with_threads(self.config.thread_count(), |parallelism| {
            self.run(dataset, predictor, output, parallelism)
        })
    }
}
