//! The N-dimensional cube.

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    BoundaryKind, CubeError, CubeOutput, Direction, Expansion, Interval, Limit, LimitState,
    LinearModel, MinUpdate, OutputKind, Point, EPSILON,
};
use crate::data::{Dataset, DatasetError, Targets};
use crate::predictor::{Predictions, Predictor};
use crate::utils::mode;

/// An axis-aligned box with an output model.
///
/// Dimensions keep the order they were given in. Cubes derived from a
/// dataset (see [`HyperCube::create_surrounding_cube`]) follow its column
/// order, which is also the coefficient order of a linear output.
///
/// Bounds are rounded to [`INT_PRECISION`](super::INT_PRECISION) digits
/// whenever they are set. Equality compares bounds within [`EPSILON`] and
/// ignores outputs and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HyperCube {
    dimensions: Vec<(String, Interval)>,
    limits: Vec<Limit>,
    output: CubeOutput,
    boundary: BoundaryKind,
    diversity: f64,
    barycenter: Point,
}

impl HyperCube {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a cube from `(feature, bounds)` pairs.
    pub fn new<I, S, T>(dimensions: I, output: CubeOutput, boundary: BoundaryKind) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<Interval>,
    {
        Self {
            dimensions: dimensions
                .into_iter()
                .map(|(name, bounds)| (name.into(), bounds.into().rounded()))
                .collect(),
            limits: Vec::new(),
            output,
            boundary,
            diversity: 0.0,
            barycenter: Point::default(),
        }
    }

    /// Half-open cube with a constant output.
    pub fn constant<I, S, T>(dimensions: I, value: f64) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<Interval>,
    {
        Self::new(dimensions, CubeOutput::Constant(value), BoundaryKind::HalfOpen)
    }

    /// Cube with the initial output of `kind`.
    pub fn with_kind<I, S, T>(dimensions: I, kind: OutputKind, boundary: BoundaryKind) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<Interval>,
    {
        let mut cube = Self::new(dimensions, CubeOutput::Constant(0.0), boundary);
        cube.output = CubeOutput::empty(kind, cube.dimensions.len());
        cube
    }

    /// Replace the membership rule.
    pub fn with_boundary(mut self, boundary: BoundaryKind) -> Self {
        self.boundary = boundary;
        self
    }

    /// Bounding cube of a dataset, every column padded by `2 * EPSILON`.
    ///
    /// # Errors
    ///
    /// [`DatasetError::Empty`] if the dataset has no sample.
    pub fn create_surrounding_cube(
        dataset: &Dataset,
        kind: OutputKind,
        boundary: BoundaryKind,
    ) -> Result<Self, CubeError> {
        let dimensions = dataset
            .feature_names()
            .iter()
            .enumerate()
            .map(|(col, name)| {
                dataset
                    .column_bounds(col)
                    .map(|(min, max)| (name.clone(), (min - 2.0 * EPSILON, max + 2.0 * EPSILON)))
                    .ok_or(DatasetError::Empty)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_kind(dimensions, kind, boundary))
    }

    /// Zero-width cube anchored at `point` with an explicit output.
    ///
    /// See [`HyperCube::cube_from_row`] to take the output from a sample's target.
    pub fn cube_from_point(point: &Point, output: CubeOutput) -> Self {
        Self::new(
            point.iter().map(|(name, v)| (name.to_string(), Interval::point(v))),
            output,
            BoundaryKind::HalfOpen,
        )
    }

    /// Zero-width cube anchored at sample `index`, outputting its target.
    ///
    /// # Errors
    ///
    /// [`CubeError::MissingTarget`] if the dataset has no targets or `index`
    /// is out of range.
    pub fn cube_from_row(dataset: &Dataset, index: usize) -> Result<Self, CubeError> {
        let output = match dataset.targets() {
            Some(Targets::Values(values)) => values.get(index).map(|&v| CubeOutput::Constant(v)),
            Some(Targets::Labels(labels)) => labels.get(index).map(|l| CubeOutput::Label(l.clone())),
            None => None,
        }
        .ok_or(CubeError::MissingTarget { row: index })?;
        Ok(Self::cube_from_point(&dataset.point(index), output))
    }

    /// Same geometry, limits, output and boundary; statistics are reset.
    pub fn copy(&self) -> Self {
        Self {
            dimensions: self.dimensions.clone(),
            limits: self.limits.clone(),
            output: self.output.clone(),
            boundary: self.boundary,
            diversity: 0.0,
            barycenter: Point::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// `(feature, bounds)` pairs in dimension order.
    pub fn dimensions(&self) -> &[(String, Interval)] {
        &self.dimensions
    }

    /// Feature names in dimension order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|(name, _)| name.as_str())
    }

    pub fn n_dimensions(&self) -> usize {
        self.dimensions.len()
    }

    pub fn output(&self) -> &CubeOutput {
        &self.output
    }

    pub fn kind(&self) -> OutputKind {
        self.output.kind()
    }

    pub fn boundary(&self) -> BoundaryKind {
        self.boundary
    }

    pub fn diversity(&self) -> f64 {
        self.diversity
    }

    /// Mean of the rows seen by the last effective [`update`](Self::update).
    pub fn barycenter(&self) -> &Point {
        &self.barycenter
    }

    /// Overwrite the diversity, e.g. to force a split of a cube never updated.
    pub fn init_diversity(&mut self, diversity: f64) {
        self.diversity = diversity;
    }

    /// Bounds of `feature`.
    pub fn get(&self, feature: &str) -> Result<Interval, CubeError> {
        self.dimensions
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, interval)| *interval)
            .ok_or_else(|| CubeError::FeatureNotFound(feature.to_string()))
    }

    /// Lower bound of `feature`.
    pub fn get_first(&self, feature: &str) -> Result<f64, CubeError> {
        self.get(feature).map(|i| i.lower())
    }

    /// Upper bound of `feature`.
    pub fn get_second(&self, feature: &str) -> Result<f64, CubeError> {
        self.get(feature).map(|i| i.upper())
    }

    /// Replace the bounds of an existing dimension.
    pub fn update_dimension(
        &mut self,
        feature: &str,
        bounds: impl Into<Interval>,
    ) -> Result<(), CubeError> {
        let slot = self
            .dimensions
            .iter_mut()
            .find(|(name, _)| name == feature)
            .ok_or_else(|| CubeError::FeatureNotFound(feature.to_string()))?;
        slot.1 = bounds.into().rounded();
        Ok(())
    }

    // =========================================================================
    // Limits
    // =========================================================================

    /// Pin the face of `feature` in `direction`. Adding a limit twice is a no-op.
    pub fn add_limit(&mut self, feature: &str, direction: Direction) -> Result<(), CubeError> {
        self.get(feature)?;
        let limit = Limit::new(feature, direction);
        if !self.limits.contains(&limit) {
            self.limits.push(limit);
        }
        Ok(())
    }

    /// Number of pinned faces.
    pub fn limit_count(&self) -> usize {
        self.limits.len()
    }

    /// Pinned faces of `feature`.
    ///
    /// # Errors
    ///
    /// [`CubeError::TooManyLimits`] if the limit set was corrupted with more
    /// than one limit per direction (only reachable through deserialization).
    pub fn check_limits(&self, feature: &str) -> Result<LimitState, CubeError> {
        let directions: Vec<Direction> = self
            .limits
            .iter()
            .filter(|l| l.feature == feature)
            .map(|l| l.direction)
            .collect();
        match directions.as_slice() {
            [] => Ok(LimitState::None),
            [d] => Ok(LimitState::Single(*d)),
            [a, b] if a != b => Ok(LimitState::Both),
            _ => Err(CubeError::TooManyLimits {
                feature: feature.to_string(),
                count: directions.len(),
            }),
        }
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Returns `true` if the cube equals any cube of `cubes`.
    pub fn equal_any<'a>(&self, cubes: impl IntoIterator<Item = &'a HyperCube>) -> bool {
        cubes.into_iter().any(|c| self == c)
    }

    /// Returns `true` if the cubes intersect on every dimension of this cube.
    ///
    /// Touching faces do not overlap. A cube never overlaps itself (the same
    /// instance), which lets callers scan collections that include it.
    ///
    /// # Errors
    ///
    /// [`CubeError::FeatureNotFound`] if `other` lacks one of the cube's features.
    pub fn overlap(&self, other: &HyperCube) -> Result<bool, CubeError> {
        if std::ptr::eq(self, other) {
            return Ok(false);
        }
        for (name, interval) in &self.dimensions {
            if !interval.intersects(&other.get(name)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// First cube of `cubes` that differs from this one and overlaps it.
    pub fn overlap_any<'a>(
        &self,
        cubes: impl IntoIterator<Item = &'a HyperCube>,
    ) -> Result<Option<&'a HyperCube>, CubeError> {
        for cube in cubes {
            if self != cube && self.overlap(cube)? {
                return Ok(Some(cube));
            }
        }
        Ok(None)
    }

    /// Returns `true` if any candidate overlaps an existing cube.
    ///
    /// Candidates are scanned from the back. Once scanned, a candidate is
    /// exonerated: later candidates are not checked against existing cubes
    /// equal to it.
    pub fn check_overlap(candidates: &[HyperCube], existing: &[HyperCube]) -> Result<bool, CubeError> {
        let mut checked: Vec<&HyperCube> = Vec::with_capacity(candidates.len());
        for cube in candidates.iter().rev() {
            for hc in existing {
                if !hc.equal_any(checked.iter().copied()) && cube.overlap(hc)? {
                    return Ok(true);
                }
            }
            checked.push(cube);
        }
        Ok(false)
    }

    /// If the cubes agree on all dimensions but one, and touch along that one,
    /// return its name.
    pub fn is_adjacent(&self, other: &HyperCube) -> Result<Option<String>, CubeError> {
        let mut adjacent = None;
        for (name, interval) in &self.dimensions {
            let o = other.get(name)?;
            if *interval == o {
                continue;
            }
            if adjacent.is_some() || !interval.touches(&o) {
                return Ok(None);
            }
            adjacent = Some(name.clone());
        }
        Ok(adjacent)
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Returns `true` if every coordinate satisfies the boundary rule.
    ///
    /// # Errors
    ///
    /// [`CubeError::FeatureNotFound`] if `point` lacks one of the cube's features.
    pub fn contains(&self, point: &Point) -> Result<bool, CubeError> {
        for (name, interval) in &self.dimensions {
            if !interval.contains(point.get(name)?, self.boundary) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Row mask of the samples inside the cube.
    pub fn filter_indices(&self, dataset: &Dataset) -> Result<Vec<bool>, CubeError> {
        let columns = self.column_indices(dataset)?;
        let features = dataset.features();
        Ok(features
            .rows()
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .zip(&self.dimensions)
                    .all(|(&col, (_, interval))| interval.contains(row[col], self.boundary))
            })
            .collect())
    }

    /// Samples inside the cube.
    pub fn filter_dataset(&self, dataset: &Dataset) -> Result<Dataset, CubeError> {
        Ok(dataset.select(&self.filter_indices(dataset)?))
    }

    /// Number of samples inside the cube.
    pub fn count(&self, dataset: &Dataset) -> Result<usize, CubeError> {
        Ok(self.filter_indices(dataset)?.into_iter().filter(|&b| b).count())
    }

    fn column_indices(&self, dataset: &Dataset) -> Result<Vec<usize>, CubeError> {
        self.dimensions
            .iter()
            .map(|(name, _)| {
                dataset
                    .feature_index(name)
                    .ok_or_else(|| CubeError::FeatureNotFound(name.clone()))
            })
            .collect()
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Recompute output, diversity and barycenter from the samples inside the
    /// cube, as seen by `predictor`.
    ///
    /// When no sample falls inside the cube the previous statistics are kept
    /// and the predictor is not called.
    pub fn update<P: Predictor + ?Sized>(
        &mut self,
        dataset: &Dataset,
        predictor: &P,
    ) -> Result<(), CubeError> {
        let filtered = self.filter_dataset(dataset)?;
        if filtered.is_empty() {
            return Ok(());
        }

        let predictions = predictor.predict(filtered.features());
        if predictions.len() != filtered.n_samples() {
            return Err(CubeError::PredictionCount {
                expected: filtered.n_samples(),
                got: predictions.len(),
            });
        }

        let kind = self.kind();
        match (kind, predictions) {
            (OutputKind::Constant, Predictions::Values(values)) => {
                self.output = CubeOutput::Constant(values.mean().unwrap_or_default());
                self.diversity = values.std(0.0);
            }
            (OutputKind::Classification, Predictions::Labels(labels)) => {
                let label = mode(&labels).unwrap_or_default().to_string();
                let hits = labels.iter().filter(|l| **l == label).count();
                self.diversity = 1.0 - hits as f64 / labels.len() as f64;
                self.output = CubeOutput::Label(label);
            }
            (OutputKind::Regression, Predictions::Values(values)) => {
                let model = LinearModel::fit(filtered.features(), values.view());
                let fitted = model.predict(filtered.features());
                self.diversity = (&fitted - &values).mapv(f64::abs).mean().unwrap_or_default();
                self.output = CubeOutput::Linear(model);
            }
            (kind, other) => {
                return Err(CubeError::UnexpectedPredictions {
                    kind,
                    got: other.type_name(),
                })
            }
        }

        self.barycenter = Point::new(
            filtered.feature_names().iter().cloned(),
            filtered.column_means().iter().copied(),
        );
        Ok(())
    }

    // =========================================================================
    // Growth and merging
    // =========================================================================

    /// Grow one dimension as requested, then retract to the face of the first
    /// overlapping cube of `others`.
    ///
    /// # Errors
    ///
    /// [`CubeError::UnresolvedOverlap`] if a cube of `others` still overlaps
    /// after retraction.
    pub fn expand(&mut self, expansion: &Expansion, others: &[HyperCube]) -> Result<(), CubeError> {
        let feature = expansion.feature();
        let current = self.get(feature)?;
        self.update_dimension(feature, expansion.boundaries(current))?;

        if let Some(neighbour) = self.overlap_any(others)? {
            let face = neighbour.get(feature)?;
            let retracted = match expansion.direction() {
                Direction::Negative => Interval::new(face.upper(), current.upper()),
                Direction::Positive => Interval::new(current.lower(), face.lower()),
            };
            self.update_dimension(feature, retracted)?;
        }

        if self.overlap_any(others)?.is_some() {
            return Err(CubeError::UnresolvedOverlap {
                feature: feature.to_string(),
            });
        }
        Ok(())
    }

    /// Widen every updated dimension by `value / ratio` on both sides, without
    /// leaving `surrounding`.
    pub fn expand_all(
        &mut self,
        updates: &[MinUpdate],
        surrounding: &HyperCube,
        ratio: f64,
    ) -> Result<(), CubeError> {
        for update in updates {
            let current = self.get(&update.feature)?;
            let bounds = surrounding.get(&update.feature)?;
            let widened = current.widen_within(update.value / ratio, &bounds);
            self.update_dimension(&update.feature, widened)?;
        }
        Ok(())
    }

    /// Copy of this cube stretched along `feature` to cover `other` as well.
    pub fn merge_along_dimension(
        &self,
        other: &HyperCube,
        feature: &str,
    ) -> Result<HyperCube, CubeError> {
        let mut merged = self.copy();
        merged.update_dimension(feature, self.get(feature)?.union(&other.get(feature)?))?;
        Ok(merged)
    }

    /// Smallest cube covering both.
    pub fn merge(&self, other: &HyperCube) -> Result<HyperCube, CubeError> {
        let mut merged = self.copy();
        for (name, interval) in &self.dimensions {
            merged.update_dimension(name, interval.union(&other.get(name)?))?;
        }
        Ok(merged)
    }

    /// Smallest cube covering this one and `point`.
    pub fn merge_with_point(&self, point: &Point) -> Result<HyperCube, CubeError> {
        self.merge(&HyperCube::cube_from_point(point, self.output.clone()))
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Returns `false` if some dimension is not wider than [`EPSILON`].
    pub fn has_volume(&self) -> bool {
        self.dimensions.iter().all(|(_, i)| i.width() > EPSILON)
    }

    pub fn volume(&self) -> f64 {
        self.dimensions.iter().map(|(_, i)| i.width()).product()
    }

    pub fn diagonal(&self) -> f64 {
        self.dimensions
            .iter()
            .map(|(_, i)| i.width() * i.width())
            .sum::<f64>()
            .sqrt()
    }

    pub fn center(&self) -> Point {
        Point::new(self.features(), self.dimensions.iter().map(|(_, i)| i.midpoint()))
    }

    /// All `2^n` corners. The first dimension varies slowest.
    pub fn corners(&self) -> Vec<Point> {
        let axes: Vec<Vec<f64>> = self
            .dimensions
            .iter()
            .map(|(_, i)| vec![i.lower(), i.upper()])
            .collect();
        self.product(&axes)
    }

    /// Deduplicated boundary points.
    ///
    /// For each dimension in turn, that dimension takes `n` evenly spaced
    /// values (the midpoint when `n == 1`) while every other dimension takes
    /// both of its bounds.
    pub fn perimeter_samples(&self, n: usize) -> Vec<Point> {
        let mut points: Vec<Point> = Vec::new();
        for (primary, _) in &self.dimensions {
            let axes: Vec<Vec<f64>> = self
                .dimensions
                .iter()
                .map(|(name, i)| {
                    if name == primary {
                        i.linspace(n)
                    } else {
                        vec![i.lower(), i.upper()]
                    }
                })
                .collect();
            for point in self.product(&axes) {
                if !points.contains(&point) {
                    points.push(point);
                }
            }
        }
        points
    }

    fn product(&self, axes: &[Vec<f64>]) -> Vec<Point> {
        let mut rows: Vec<Vec<f64>> = vec![Vec::with_capacity(axes.len())];
        for axis in axes {
            rows = rows
                .into_iter()
                .flat_map(|row| {
                    axis.iter().map(move |&v| {
                        let mut next = row.clone();
                        next.push(v);
                        next
                    })
                })
                .collect();
        }
        rows.into_iter()
            .map(|values| Point::new(self.features(), values))
            .collect()
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// One uniform point inside the cube. Zero-width dimensions yield their bound.
    pub fn create_tuple<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(
            self.features(),
            self.dimensions.iter().map(|(_, i)| sample(i, rng)),
        )
    }

    /// `n` uniform rows `[n, n_dimensions]` in dimension order.
    pub fn create_samples<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array2<f64> {
        let mut samples = Array2::zeros((n, self.dimensions.len()));
        for mut row in samples.rows_mut() {
            for (slot, (_, interval)) in row.iter_mut().zip(&self.dimensions) {
                *slot = sample(interval, rng);
            }
        }
        samples
    }
}

fn sample<R: Rng + ?Sized>(interval: &Interval, rng: &mut R) -> f64 {
    if interval.width() > 0.0 {
        rng.gen_range(interval.lower()..interval.upper())
    } else {
        interval.lower()
    }
}

impl PartialEq for HyperCube {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions.len() == other.dimensions.len()
            && self.dimensions.iter().all(|(name, interval)| {
                other
                    .get(name)
                    .map(|o| {
                        (interval.lower() - o.lower()).abs() < EPSILON
                            && (interval.upper() - o.upper()).abs() < EPSILON
                    })
                    .unwrap_or(false)
            })
    }
}
