//! Placeholder economic series.
//!
//! Real SA3/SA4 price, rent and wage data is not published by the ABS at
//! this granularity, so rows are synthesized from a seeded baseline per
//! region and grown linearly per year. Every row is marked `imputed`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::domain::Feature;

pub const DEFAULT_SEED: u64 = 42;

/// Annual linear growth rates relative to the first year
const PRICE_GROWTH: f64 = 0.04;
const RENT_GROWTH: f64 = 0.04;
const WAGE_GROWTH: f64 = 0.025;
const POPULATION_GROWTH: f64 = 0.015;
const DWELLING_GROWTH: f64 = 0.02;

pub fn default_years() -> Vec<i32> {
    (2015..=2024).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRow {
    pub code: String,
    pub year: i32,
    pub median_price: i64,
    pub median_annual_rent: i64,
    pub median_annual_wage: i64,
    pub population: i64,
    pub dwelling_stock: i64,
    pub source: &'static str,
    pub imputed: bool,
}

/// First-year values for one region
#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    price: f64,
    rent: f64,
    wage: f64,
    population: f64,
    dwellings: f64,
}

#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    seed: u64,
    years: Vec<i32>,
}

impl SeriesGenerator {
    pub fn new(seed: u64, years: Vec<i32>) -> Self {
        Self { seed, years }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Each region draws from its own generator so a row depends only on
    /// (code, year, seed), not on which other regions are in the batch.
    fn baseline(&self, code: &str) -> Baseline {
        let mut rng = StdRng::seed_from_u64(self.seed ^ fnv1a(code.as_bytes()));

        let price = rng.random_range(400_000.0..1_200_000.0);
        let rent = rng.random_range(18_000.0..45_000.0);
        let wage = rng.random_range(55_000.0..95_000.0);
        let population = rng.random_range(5_000.0..150_000.0);
        // roughly 2.5 persons per dwelling
        let dwellings = population / rng.random_range(2.3..2.8);

        Baseline {
            price,
            rent,
            wage,
            population,
            dwellings,
        }
    }

    pub fn rows_for(&self, code: &str) -> Vec<SeriesRow> {
        let Some(&first) = self.years.first() else {
            return Vec::new();
        };
        let base = self.baseline(code);

        self.years
            .iter()
            .map(|&year| {
                let offset = f64::from(year - first);
                let grow = |value: f64, rate: f64| (value * (1.0 + offset * rate)).round() as i64;

                SeriesRow {
                    code: code.to_string(),
                    year,
                    median_price: grow(base.price, PRICE_GROWTH),
                    median_annual_rent: grow(base.rent, RENT_GROWTH),
                    median_annual_wage: grow(base.wage, WAGE_GROWTH),
                    population: grow(base.population, POPULATION_GROWTH),
                    dwelling_stock: grow(base.dwellings, DWELLING_GROWTH),
                    source: "synthetic",
                    imputed: true,
                }
            })
            .collect()
    }

    /// Rows for every feature, grouped by feature in input order
    pub fn generate(&self, features: &[Feature]) -> Vec<SeriesRow> {
        features.iter().flat_map(|f| self.rows_for(&f.code)).collect()
    }
}

impl Default for SeriesGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, default_years())
    }
}

/// 64-bit FNV-1a, stable across platforms and releases
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}
