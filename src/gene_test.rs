use crate::classify::{colour_distribution, AmbiguousGroup, Identification, Reason};
use crate::error::Result;
use crate::genetics::Genotype;
use crate::punnett::cross;
use crate::table::PhenotypeTable;
use crate::{Colour, Probability};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// How to confirm an ambiguous genotype: breed it with `tester` and look
/// for children of one of `colours`.
#[derive(Debug, Clone, PartialEq)]
pub struct TestPlan {
    pub tester: Genotype,
    /// Colours only this candidate can produce with `tester`, in catalog
    /// order.
    pub colours: Vec<Colour>,
    /// Chance that a single test cross shows one of `colours`.
    pub success: Probability,
}

/// Resolution of same-coloured siblings by test crosses.
pub trait GeneTest {
    /// Finds a test plan for every member of `group` that can be told
    /// apart from the other members.
    ///
    /// Each member is crossed with every tester of the same species. A
    /// colour that only one member produces with a given tester is
    /// distinguishing for that member. The tester giving a member the best
    /// chance of showing a distinguishing colour wins, earlier testers
    /// winning ties. Members with no distinguishing colour under any
    /// tester are left out.
    fn gene_test(
        &self,
        group: &AmbiguousGroup,
        table: &PhenotypeTable,
    ) -> Result<Vec<Identification>>;
}

impl GeneTest for [Genotype] {
    fn gene_test(
        &self,
        group: &AmbiguousGroup,
        table: &PhenotypeTable,
    ) -> Result<Vec<Identification>> {
        let species = group.parents.0.species();
        let mut best: Vec<Option<TestPlan>> = vec![None; group.members.len()];

        for tester in self.iter().filter(|t| t.species() == species) {
            let profiles = group
                .members
                .iter()
                .map(|(member, _)| colour_distribution(&cross(member, tester), table))
                .collect::<Result<Vec<_>>>()?;

            let mut producers: HashMap<Colour, usize> = HashMap::new();
            for profile in &profiles {
                for colour in profile.keys() {
                    *producers.entry(*colour).or_insert(0) += 1;
                }
            }

            for (slot, profile) in best.iter_mut().zip(profiles.iter()) {
                let plan = distinguishing(tester, profile, &producers);
                let better = match (&plan, slot.as_ref()) {
                    (Some(plan), Some(current)) => plan.success > current.success,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                if better {
                    *slot = plan;
                }
            }
        }

        let resolved: Vec<Identification> = group
            .members
            .iter()
            .zip(best)
            .filter_map(|(&(genotype, probability), plan)| {
                plan.map(|plan| Identification {
                    genotype,
                    probability,
                    parents: group.parents,
                    reason: Reason::GeneTest(plan),
                })
            })
            .collect();

        trace!(
            members = group.members.len(),
            resolved = resolved.len(),
            "gene tested ambiguous group"
        );
        Ok(resolved)
    }
}

impl GeneTest for Vec<Genotype> {
    fn gene_test(
        &self,
        group: &AmbiguousGroup,
        table: &PhenotypeTable,
    ) -> Result<Vec<Identification>> {
        self.as_slice().gene_test(group, table)
    }
}

/// Builds the plan for one member's colour profile, if any of its colours
/// is produced by no other member.
fn distinguishing(
    tester: &Genotype,
    profile: &BTreeMap<Colour, Probability>,
    producers: &HashMap<Colour, usize>,
) -> Option<TestPlan> {
    let colours: Vec<Colour> = profile
        .keys()
        .filter(|colour| producers.get(*colour) == Some(&1))
        .copied()
        .collect();
    if colours.is_empty() {
        return None;
    }
    let success = colours.iter().map(|colour| profile[colour]).sum();
    Some(TestPlan {
        tester: *tester,
        colours,
        success,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::table::TableBuilder;
    use std::error::Error;

    /// Red and yellow only: White without either, Yellow when yellow is
    /// homozygous dominant, Red when red is homozygous dominant and yellow
    /// absent, Orange otherwise. The white locus never shows.
    fn table() -> Result<PhenotypeTable, Box<dyn Error>> {
        let mut csv = "species,genotype,colour\n".to_owned();
        for loci in crate::genetics::all_loci(false) {
            let (r, y) = (loci[0].count(), loci[1].count());
            let colour = match (r, y) {
                (0, 0) => "White",
                (2, 0) => "Red",
                (_, 2) => "Yellow",
                _ => "Orange",
            };
            csv.push_str(&format!(
                "Toy,{},{}\n",
                crate::genetics::GenotypeCode::from(loci),
                colour
            ));
        }
        Ok(TableBuilder::new().from_reader(Box::new(std::io::Cursor::new(csv.into_bytes())))?)
    }

    #[test]
    fn test_tester_reveals_one_member() -> Result<(), Box<dyn Error>> {
        let table = table()?;
        let toy = table.species("Toy")?;
        let orange = table.colour("Orange")?;

        // Rryyww and rrYyww are both Orange.
        let a = Genotype::new(toy, 1, 0, 0, 0)?;
        let b = Genotype::new(toy, 0, 1, 0, 0)?;
        assert_eq!(table.phenotype(&a)?, orange);
        assert_eq!(table.phenotype(&b)?, orange);

        // Against RRyy, A gives RR (Red) children that B never can; B gives
        // RrYy (Orange) and Rryy (Orange), all shared with A.
        let tester = Genotype::new(toy, 2, 0, 0, 0)?;
        let group = AmbiguousGroup {
            colour: orange,
            members: vec![(a, 0.5), (b, 0.25)],
            parents: (a, b),
        };
        let resolved = vec![tester].gene_test(&group, &table)?;

        assert_eq!(resolved.len(), 1);
        let found = &resolved[0];
        assert_eq!(found.genotype, a);
        assert_eq!(found.probability, 0.5);
        let plan = found.reason.test_plan().ok_or("expected a test plan")?;
        assert_eq!(plan.tester, tester);
        assert_eq!(plan.colours, vec![table.colour("Red")?]);
        assert_eq!(plan.success, 0.5);
        Ok(())
    }

    #[test]
    fn test_best_tester_wins() -> Result<(), Box<dyn Error>> {
        let table = table()?;
        let toy = table.species("Toy")?;
        let a = Genotype::new(toy, 1, 0, 0, 0)?;
        let b = Genotype::new(toy, 0, 1, 0, 0)?;
        let group = AmbiguousGroup {
            colour: table.colour("Orange")?,
            members: vec![(a, 0.5), (b, 0.5)],
            parents: (a, b),
        };

        // White rryy: A gives half White, half Orange; B the same. No
        // information. Yellow rrYY: A gives Orange only, B gives Orange and
        // Yellow; Yellow reveals B half the time. Red RRyy reveals A with
        // Red half the time.
        let white = Genotype::new(toy, 0, 0, 0, 0)?;
        let yellow = Genotype::new(toy, 0, 2, 0, 0)?;
        let red = Genotype::new(toy, 2, 0, 0, 0)?;
        let resolved = [white, yellow, red].gene_test(&group, &table)?;

        assert_eq!(resolved.len(), 2);
        let plan_a = resolved[0].reason.test_plan().ok_or("expected a test plan")?;
        assert_eq!(resolved[0].genotype, a);
        assert_eq!(plan_a.tester, red);
        let plan_b = resolved[1].reason.test_plan().ok_or("expected a test plan")?;
        assert_eq!(resolved[1].genotype, b);
        assert_eq!(plan_b.tester, yellow);
        assert_eq!(plan_b.colours, vec![table.colour("Yellow")?]);
        assert_eq!(plan_b.success, 0.5);
        Ok(())
    }

    #[test]
    fn test_indistinguishable_group_stays_unresolved() -> Result<(), Box<dyn Error>> {
        let table = table()?;
        let toy = table.species("Toy")?;
        // White locus never shows, so rryyWw and rryyww can't be told apart.
        let a = Genotype::new(toy, 0, 0, 1, 0)?;
        let b = Genotype::new(toy, 0, 0, 0, 0)?;
        let group = AmbiguousGroup {
            colour: table.colour("White")?,
            members: vec![(a, 0.5), (b, 0.5)],
            parents: (a, b),
        };
        let testers = table.genotypes(toy);
        assert!(testers.gene_test(&group, &table)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_other_species_are_not_testers() -> Result<(), Box<dyn Error>> {
        let table = PhenotypeTable::builtin()?;
        let rose = table.species("Rose")?;
        let tulip = table.species("Tulip")?;
        let parent = Genotype::new(rose, 1, 1, 0, 0)?;
        let classification = classify(&cross(&parent, &parent), (parent, parent), &table)?;
        let group = classification
            .ambiguous
            .first()
            .ok_or("expected an ambiguous group")?;
        let testers = table.genotypes(tulip);
        assert!(testers.gene_test(group, &table)?.is_empty());
        Ok(())
    }
}
