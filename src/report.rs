//! Human and machine readable breeding plans.
//!
//! The engine hands out records keyed by catalog indices; this module
//! resolves them to names once, so a plan can be printed sentence by
//! sentence or serialized as JSON.

use crate::classify::{Identification, ReasonKind};
use crate::error::Result;
use crate::genetics::Genotype;
use crate::table::PhenotypeTable;
use crate::Probability;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A genotype with every name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flower {
    pub species: String,
    pub code: String,
    pub colour: String,
}

impl Flower {
    pub fn new(table: &PhenotypeTable, genotype: &Genotype) -> Result<Self> {
        Ok(Self {
            species: table.species_name(genotype.species()).to_owned(),
            code: genotype.code().to_string(),
            colour: table.colour_name(table.phenotype(genotype)?).to_owned(),
        })
    }
}

impl fmt::Display for Flower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.colour, self.species, self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestEntry {
    pub tester: Flower,
    pub colours: Vec<String>,
    pub success: Probability,
}

/// How to breed and recognise one genotype.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub flower: Flower,
    pub parents: [Flower; 2],
    pub probability: Probability,
    pub reason: ReasonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gene_test: Option<TestEntry>,
}

impl Entry {
    pub fn new(table: &PhenotypeTable, record: &Identification) -> Result<Self> {
        let gene_test = match record.reason.test_plan() {
            Some(plan) => Some(TestEntry {
                tester: Flower::new(table, &plan.tester)?,
                colours: plan
                    .colours
                    .iter()
                    .map(|c| table.colour_name(*c).to_owned())
                    .collect(),
                success: plan.success,
            }),
            None => None,
        };
        Ok(Self {
            flower: Flower::new(table, &record.genotype)?,
            parents: [
                Flower::new(table, &record.parents.0)?,
                Flower::new(table, &record.parents.1)?,
            ],
            probability: record.probability,
            reason: record.reason.kind(),
            gene_test,
        })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A {} should be bred from a {} and a {}. It has a {} chance of being bred. ",
            self.flower, self.parents[0], self.parents[1], self.probability
        )?;
        match (&self.reason, &self.gene_test) {
            (ReasonKind::Unique, _) => write!(f, "It is the only possible child."),
            (ReasonKind::Colour, _) => write!(f, "It can be identified by colour."),
            (ReasonKind::GeneTest, Some(test)) => write!(
                f,
                "It can be identified by breeding it with a {} and getting children of the following colours: {}. These occur with a chance of {}.",
                test.tester,
                test.colours.join(", "),
                test.success
            ),
            (ReasonKind::GeneTest, None) => write!(f, "It can be identified by gene test."),
        }
    }
}

/// A breeding plan: one entry per genotype discovered, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    pub fn new(table: &PhenotypeTable, records: &[Identification]) -> Result<Self> {
        Ok(Self {
            entries: records
                .iter()
                .map(|record| Entry::new(table, record))
                .collect::<Result<_>>()?,
        })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Genotypes of the table that `pool` does not contain, by species in
/// catalog order.
pub fn undiscovered(table: &PhenotypeTable, pool: &[Genotype]) -> Vec<Genotype> {
    let known: HashSet<&Genotype> = pool.iter().collect();
    table
        .species_catalog()
        .flat_map(|species| table.genotypes(species))
        .filter(|genotype| !known.contains(genotype))
        .collect()
}
