use crate::error::Result;
use crate::gene_test::TestPlan;
use crate::genetics::Genotype;
use crate::table::PhenotypeTable;
use crate::{Colour, CrossResult, Parents, Probability};
use serde::Serialize;
use std::collections::BTreeMap;

/// How a genotype can be told apart from its siblings.
#[derive(Debug, Clone, PartialEq)]
pub enum Reason {
    /// The cross can only produce this genotype.
    Unique,
    /// No sibling shares its colour.
    Colour,
    /// A follow-up cross against a known tester reveals it.
    GeneTest(TestPlan),
}

impl Reason {
    pub fn kind(&self) -> ReasonKind {
        match self {
            Reason::Unique => ReasonKind::Unique,
            Reason::Colour => ReasonKind::Colour,
            Reason::GeneTest(_) => ReasonKind::GeneTest,
        }
    }

    pub fn test_plan(&self) -> Option<&TestPlan> {
        match self {
            Reason::GeneTest(plan) => Some(plan),
            _ => None,
        }
    }

    /// Chance that the gene test identifies the genotype. Genotypes that
    /// need no test are always identified.
    pub fn success(&self) -> Probability {
        self.test_plan().map(|plan| plan.success).unwrap_or(1.0)
    }
}

/// The tag of a `Reason`, without its test plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReasonKind {
    Unique,
    Colour,
    GeneTest,
}

/// One way of obtaining a genotype and recognising it once bred.
#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    pub genotype: Genotype,
    /// Chance that crossing `parents` yields `genotype`.
    pub probability: Probability,
    pub parents: Parents,
    pub reason: Reason,
}

/// Siblings of one cross that share a colour.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbiguousGroup {
    pub colour: Colour,
    /// Members in ascending genotype order with their chance of being bred.
    pub members: Vec<(Genotype, Probability)>,
    pub parents: Parents,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub identified: Vec<Identification>,
    pub ambiguous: Vec<AmbiguousGroup>,
}

/// Splits the children of a cross into those whose colour gives them away
/// and groups of same-coloured siblings.
///
/// Every child ends up in exactly one of the two. Colours are visited in
/// catalog order. An empty cross classifies to nothing.
pub fn classify(
    children: &CrossResult,
    parents: Parents,
    table: &PhenotypeTable,
) -> Result<Classification> {
    let mut by_colour: BTreeMap<Colour, Vec<(Genotype, Probability)>> = BTreeMap::new();
    for (child, probability) in children {
        by_colour
            .entry(table.phenotype(child)?)
            .or_default()
            .push((*child, *probability));
    }

    let mut classification = Classification::default();
    for (colour, members) in by_colour {
        if let [(genotype, probability)] = members[..] {
            classification.identified.push(Identification {
                genotype,
                probability,
                parents,
                reason: if children.len() == 1 {
                    Reason::Unique
                } else {
                    Reason::Colour
                },
            });
        } else {
            classification.ambiguous.push(AmbiguousGroup {
                colour,
                members,
                parents,
            });
        }
    }
    Ok(classification)
}

/// Chance of each colour appearing among the children of a cross.
pub fn colour_distribution(
    children: &CrossResult,
    table: &PhenotypeTable,
) -> Result<BTreeMap<Colour, Probability>> {
    let mut colours = BTreeMap::new();
    for (child, probability) in children {
        *colours.entry(table.phenotype(child)?).or_insert(0.0) += *probability;
    }
    Ok(colours)
}
