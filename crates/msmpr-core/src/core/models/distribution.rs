use std::fmt;
use std::marker::PhantomData;

/// The name and unit of the size axis shared by every distribution table.
pub const SIZE_NAME: &str = "size";
pub const SIZE_UNIT: &str = "um";

/// Describes the physical quantity carried by the value column of a [`Distribution`].
///
/// Implementors are zero-sized markers. Tagging a distribution with its quantity
/// lets the compiler reject, for example, a volume-fraction table being passed
/// where a number-fraction table is expected.
pub trait Quantity: fmt::Debug + Clone + Copy + PartialEq + Send + Sync + 'static {
    /// Column name used in table headers (e.g., "number fraction").
    const NAME: &'static str;
    /// Column unit used in table headers (e.g., "-").
    const UNIT: &'static str;
}

/// Crystal population density, in crystals per unit size per unit volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationDensity;

impl Quantity for PopulationDensity {
    const NAME: &'static str = "population density";
    const UNIT: &'static str = "1/um^4";
}

/// Fraction of the crystal count falling into a size bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFraction;

impl Quantity for NumberFraction {
    const NAME: &'static str = "number fraction";
    const UNIT: &'static str = "-";
}

/// Fraction of the crystal volume falling into a size bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeFraction;

impl Quantity for VolumeFraction {
    const NAME: &'static str = "volume fraction";
    const UNIT: &'static str = "-";
}

/// A single (size, value) sample of a distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizePoint {
    /// Crystal size in micrometers.
    pub size: f64,
    /// Value of the tagged quantity at `size`.
    pub value: f64,
}

impl SizePoint {
    pub fn new(size: f64, value: f64) -> Self {
        Self { size, value }
    }
}

/// An ordered sequence of size-indexed samples of a single physical quantity.
///
/// Samples are stored as pairs, so the size and value columns can never differ
/// in length. Sizes are expected to be non-decreasing; repeated sizes are
/// allowed and carry meaning (zone boundaries of a sampled density function
/// appear twice).
#[derive(Clone, PartialEq)]
pub struct Distribution<Q: Quantity> {
    points: Vec<SizePoint>,
    _quantity: PhantomData<Q>,
}

/// Sampled population density function across the three crystallizer zones.
pub type DensityFunctionSample = Distribution<PopulationDensity>;
/// Number-fraction table indexed by bin midpoint size.
pub type NumberFractions = Distribution<NumberFraction>;
/// Volume-fraction table indexed by bin midpoint size.
pub type VolumeFractions = Distribution<VolumeFraction>;

impl<Q: Quantity> Distribution<Q> {
    pub fn new(points: Vec<SizePoint>) -> Self {
        Self {
            points,
            _quantity: PhantomData,
        }
    }

    /// Builds a distribution from two parallel columns.
    ///
    /// Returns `None` if the columns differ in length.
    pub fn from_columns(sizes: &[f64], values: &[f64]) -> Option<Self> {
        if sizes.len() != values.len() {
            return None;
        }
        let points = sizes
            .iter()
            .zip(values)
            .map(|(&size, &value)| SizePoint::new(size, value))
            .collect();
        Some(Self::new(points))
    }

    pub fn name(&self) -> &'static str {
        Q::NAME
    }

    pub fn unit(&self) -> &'static str {
        Q::UNIT
    }

    pub fn points(&self) -> &[SizePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn sizes(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.size)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Sum of the value column. For fraction tables this is ≈1.
    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    /// Smallest and largest size, if any samples exist.
    pub fn size_range(&self) -> Option<(f64, f64)> {
        Some((self.points.first()?.size, self.points.last()?.size))
    }
}

impl<Q: Quantity> fmt::Debug for Distribution<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Distribution")
            .field("quantity", &Q::NAME)
            .field("unit", &Q::UNIT)
            .field("len", &self.points.len())
            .finish()
    }
}

impl<Q: Quantity> FromIterator<SizePoint> for Distribution<Q> {
    fn from_iter<I: IntoIterator<Item = SizePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_columns_pairs_values_in_order() {
        let dist = NumberFractions::from_columns(&[1.0, 2.0], &[0.25, 0.75]).unwrap();
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.points()[1], SizePoint::new(2.0, 0.75));
        assert_eq!(dist.size_range(), Some((1.0, 2.0)));
        assert!((dist.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn from_columns_rejects_mismatched_lengths() {
        assert!(VolumeFractions::from_columns(&[1.0, 2.0], &[1.0]).is_none());
    }

    #[test]
    fn quantity_metadata_is_exposed_per_type() {
        let density = DensityFunctionSample::new(vec![]);
        let number = NumberFractions::new(vec![]);
        assert_eq!(density.name(), "population density");
        assert_eq!(density.unit(), "1/um^4");
        assert_eq!(number.name(), "number fraction");
        assert_eq!(number.unit(), "-");
        assert!(density.is_empty());
        assert_eq!(density.size_range(), None);
    }

    #[test]
    fn collects_from_iterator_of_points() {
        let dist: DensityFunctionSample = (0..3)
            .map(|i| SizePoint::new(i as f64, 2.0))
            .collect();
        assert_eq!(dist.sizes().collect::<Vec<_>>(), vec![0.0, 1.0, 2.0]);
        assert_eq!(dist.values().collect::<Vec<_>>(), vec![2.0, 2.0, 2.0]);
    }
}
