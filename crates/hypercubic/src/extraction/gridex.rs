//! Grid-driven extraction.

use super::workspace::Workspace;
use super::{finalize, resolve_output, ExtractedCubes, ExtractionConfig, ExtractionError, ExtractionLogger, Extractor};
use crate::cube::{HyperCube, OutputKind};
use crate::data::Dataset;
use crate::predictor::Predictor;
use crate::utils::{run_with_threads, Parallelism};

/// Grid-driven extractor.
///
/// Starting from the cube surrounding the dataset, every level of the grid:
///
/// 1. Accepts frontier cubes whose diversity is below the threshold
/// 2. Splits the others along the level's strategy, dropping children
///    without real samples
/// 3. Merges adjacent children while their union stays below the threshold
///
/// Cubes still on the frontier once the grid is exhausted are accepted too.
/// With [`OutputKind::Regression`] this is GridREx.
///
/// # Example
///
/// ```
/// use hypercubic::{ExtractionConfig, Extractor, GridEx, OutputKind};
///
/// let gridrex = GridEx::regression(ExtractionConfig::default());
/// assert_eq!(gridrex.config().output, OutputKind::Regression);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridEx {
    config: ExtractionConfig,
}

impl GridEx {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// GridREx: cubes carry a linear model of the predictor.
    pub fn regression(config: ExtractionConfig) -> Self {
        Self {
            config: ExtractionConfig {
                output: OutputKind::Regression,
                ..config
            },
        }
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
        logger.start_extraction("gridex", config.grid.n_levels(), dataset.n_samples());

        let mut surrounding = HyperCube::create_surrounding_cube(dataset, output, config.boundary)?;
        surrounding.update(dataset, predictor)?;
        surrounding.init_diversity(2.0 * threshold);

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

        let mut accepted = Vec::new();
        let mut frontier = vec![surrounding.clone()];
        for level in config.grid.iterate() {
            let _span = tracing::info_span!("level", index = level.index()).entered();
            let mut next = Vec::new();
            for cube in frontier {
                if cube.count(dataset)? == 0 {
                    continue;
                }
                if cube.diversity() < threshold {
                    accepted.push(cube);
                    continue;
                }
                let children = ws.split(&cube, level, false)?;
                let before = children.len();
                let merged = ws.merge(children)?;
                logger.log_merges(level.index(), before, merged.len());
                next.extend(merged);
            }
            frontier = next;
            logger.log_level(level.index(), frontier.len(), accepted.len());
        }
        accepted.extend(frontier);

        let result = finalize(accepted, surrounding, dataset, output, ws.into_ignored(), &logger)?;
        logger.finish_extraction(result.len());
        Ok(result)
    }
}

impl Extractor for GridEx {
    #[tracing::instrument(skip_all, name = "gridex::extract")]
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, Strategy};
    use crate::predictor::{from_fn, Predictions};
    use crate::testing::{doubling_step, grid_dataset};
    use ndarray::ArrayView2;

    fn config(levels: usize, threshold: f64) -> ExtractionConfig {
        ExtractionConfig::builder()
            .grid(Grid::new(levels, Strategy::fixed(2)))
            .min_examples(0)
            .threshold(threshold)
            .build()
            .unwrap()
    }

    #[test]
    fn constant_predictor_is_accepted_by_the_first_level_merge() {
        let ds = grid_dataset(10);
        let predictor = from_fn(|rows: ArrayView2<'_, f64>| Predictions::Values(rows.column(0).mapv(|_| 3.0)));

        let cubes = GridEx::new(config(2, 0.1)).extract(&ds, &predictor).unwrap();
        assert_eq!(cubes.len(), 1);
        assert_eq!(cubes.cubes()[0].output().to_string(), "3");
        assert!(cubes.covers(&ds).unwrap());
    }

    #[test]
    fn accepted_cubes_stop_splitting() {
        let ds = grid_dataset(10);
        let predictor = from_fn(doubling_step);

        // Two halves after the first level; the second level has nothing left to split.
        let one = GridEx::new(config(1, 0.1)).extract(&ds, &predictor).unwrap();
        let three = GridEx::new(config(3, 0.1)).extract(&ds, &predictor).unwrap();
        assert_eq!(one.len(), 2);
        assert_eq!(three.len(), 2);
    }

    #[test]
    fn label_predictors_switch_to_classification() {
        let ds = grid_dataset(10);
        let predictor = from_fn(|rows: ArrayView2<'_, f64>| {
            Predictions::Labels(rows.column(1).iter().map(|&y| if y < 0.5 { "lo" } else { "hi" }.to_string()).collect())
        });

        let cubes = GridEx::new(config(1, 0.1)).extract(&ds, &predictor).unwrap();
        assert_eq!(cubes.output_kind(), OutputKind::Classification);
        let mut labels: Vec<String> = cubes.iter().map(|c| c.output().to_string()).collect();
        labels.sort();
        assert_eq!(labels, vec!["hi", "lo"]);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let ds = Dataset::new(vec!["x".into()], ndarray::Array2::zeros((0, 1)), None).unwrap();
        let predictor = from_fn(|rows: ArrayView2<'_, f64>| Predictions::Values(rows.column(0).to_owned()));
        let err = GridEx::default().extract(&ds, &predictor).unwrap_err();
        assert!(matches!(err, ExtractionError::Dataset(crate::data::DatasetError::Empty)));
    }
}
