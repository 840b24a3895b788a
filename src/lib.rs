#![crate_name = "flower_genomics"]
//! Breeding-plan discovery for flowers whose genotype is hidden behind
//! their colour.
//!
//! Starting from a seed pool of known genotypes, every generation breeds
//! all known pairs, keeps the children whose colour gives them away, and
//! runs gene tests on the rest. The loop stops once a full generation
//! adds nothing to the pool.
//!
//! ```no_run
//! use flower_genomics::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = PhenotypeTable::builtin()?;
//! let seeds = builtin_seeds(&table)?;
//! let discovery = Discovery::new(&table, DiscoveryConfig::default()).run(seeds)?;
//! for record in Report::new(&table, &discovery.records)?.entries() {
//!     println!("{}", record);
//! }
//! # Ok(())
//! # }
//! ```
use std::collections::BTreeMap;

pub mod prelude;

pub mod classify;
pub mod config;
pub mod discovery;
pub mod error;
pub mod gene_test;
pub mod genetics;
pub mod punnett;
pub mod report;
pub mod table;

use genetics::Genotype;

/// Probability of an outcome. Every value the engine produces is a
/// multiple of 1/256, so sums and comparisons are exact.
pub type Probability = f64;

/// Child genotypes of one cross with their probabilities, in ascending
/// genotype order.
pub type CrossResult = BTreeMap<Genotype, Probability>;

/// The two genotypes bred to produce a cross.
pub type Parents = (Genotype, Genotype);

/// Index of a species in the phenotype table's species catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Species(pub(crate) u16);

impl Species {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a colour in the phenotype table's colour catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Colour(pub(crate) u16);

impl Colour {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
