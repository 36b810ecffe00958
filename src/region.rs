//! Region and demography data consumed by models.
//!
//! A [`Region`] supplies population size, an optional age distribution, and
//! optional healthcare capacities. Capacity fields that are unknown stay
//! `None` — downstream code treats an absent capacity as effectively
//! unlimited rather than erroring, so a model can always run with partial
//! regional data.
//!
//! This type is a plain value carrier: lookups against external demography
//! databases happen upstream and hand a finished `Region` to the model.

/// Demography and healthcare-capacity snapshot for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    /// Total population.
    pub population: f64,
    /// `(age bracket lower bound, head count)` pairs, coarse brackets.
    pub age_distribution: Option<Vec<(u8, f64)>>,
    /// Total regular hospital beds; `None` when unknown.
    pub hospital_capacity: Option<f64>,
    /// Total ICU beds; `None` when unknown.
    pub icu_capacity: Option<f64>,
    /// Baseline share of hospital beds already occupied.
    pub hospital_occupancy: f64,
    /// Baseline share of ICU beds already occupied.
    pub icu_occupancy: f64,
}

impl Region {
    /// Region with a bare population and no capacity data.
    pub fn new(name: impl Into<String>, population: f64) -> Self {
        Region {
            name: name.into(),
            population,
            age_distribution: None,
            hospital_capacity: None,
            icu_capacity: None,
            hospital_occupancy: 0.75,
            icu_occupancy: 0.75,
        }
    }

    /// Attach hospital/ICU bed counts.
    pub fn with_capacities(mut self, hospital: f64, icu: f64) -> Self {
        self.hospital_capacity = Some(hospital);
        self.icu_capacity = Some(icu);
        self
    }

    /// Override the baseline occupancy share for both bed pools.
    pub fn with_occupancy(mut self, occupancy: f64) -> Self {
        self.hospital_occupancy = occupancy;
        self.icu_occupancy = occupancy;
        self
    }

    /// Attach an age distribution as `(bracket lower bound, head count)`
    /// pairs.
    pub fn with_age_distribution(mut self, distribution: Vec<(u8, f64)>) -> Self {
        self.age_distribution = Some(distribution);
        self
    }

    /// Hospital beds free for surge use: `capacity * (1 - occupancy)`.
    /// `None` when the capacity is unknown.
    pub fn hospital_surge_capacity(&self) -> Option<f64> {
        self.hospital_capacity.map(|c| c * (1.0 - self.hospital_occupancy))
    }

    /// ICU beds free for surge use; `None` when the capacity is unknown.
    pub fn icu_surge_capacity(&self) -> Option<f64> {
        self.icu_capacity.map(|c| c * (1.0 - self.icu_occupancy))
    }
}
