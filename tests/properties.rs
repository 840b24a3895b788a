//! Property-based tests for the cross and classification engines.

use flower_genomics::prelude::*;
use flower_genomics::punnett::{locus_counts, OUTCOMES_PER_LOCUS};
use proptest::prelude::*;

/// Strategy: a valid locus state.
fn state() -> impl Strategy<Value = LocusState> {
    (0..=2u8).prop_map(|n| LocusState::ALL[n as usize])
}

/// Strategy: locus states for a rose, the one shipped species with blue.
fn rose_loci() -> impl Strategy<Value = [LocusState; 4]> {
    prop::array::uniform4(state())
}

fn rose(table: &PhenotypeTable, loci: [LocusState; 4]) -> Genotype {
    Genotype::from_loci(table.species("Rose").expect("builtin table has roses"), loci)
}

proptest! {
    // The Punnett square is symmetric and always has four outcomes.
    #[test]
    fn punnett_symmetric(a in state(), b in state()) {
        prop_assert_eq!(punnett_square(a, b), punnett_square(b, a));
        prop_assert_eq!(locus_counts(a, b).iter().sum::<u32>(), OUTCOMES_PER_LOCUS);
    }

    // Any valid count builds; anything above two is rejected.
    #[test]
    fn locus_state_range(n in 0..=255u8) {
        prop_assert_eq!(LocusState::new(n).is_ok(), n <= 2);
    }

    // Same-species crosses are distributions over reachable children.
    #[test]
    fn cross_is_distribution(a in rose_loci(), b in rose_loci()) {
        let table = PhenotypeTable::builtin().expect("builtin table loads");
        let (a, b) = (rose(&table, a), rose(&table, b));
        let children = cross(&a, &b);
        prop_assert!(!children.is_empty());
        prop_assert_eq!(children.values().sum::<f64>(), 1.0);
        prop_assert_eq!(&children, &cross(&b, &a));

        for (child, probability) in &children {
            prop_assert!(*probability > 0.0);
            for i in 0..4 {
                let reachable = punnett_square(a.loci()[i], b.loci()[i]);
                prop_assert!(reachable.contains(&child.loci()[i]));
            }
        }
    }

    // Self-crosses always reproduce the parent.
    #[test]
    fn self_cross_contains_parent(a in rose_loci()) {
        let table = PhenotypeTable::builtin().expect("builtin table loads");
        let a = rose(&table, a);
        let children = cross(&a, &a);
        prop_assert!(children[&a] >= 1.0 / 16.0);
    }

    // Every child lands in exactly one of identified or an ambiguous group.
    #[test]
    fn classification_partitions_children(a in rose_loci(), b in rose_loci()) {
        let table = PhenotypeTable::builtin().expect("builtin table loads");
        let (a, b) = (rose(&table, a), rose(&table, b));
        let children = cross(&a, &b);
        let classification = classify(&children, (a, b), &table).expect("table is complete");

        let mut seen: Vec<Genotype> = classification
            .identified
            .iter()
            .map(|r| r.genotype)
            .chain(classification.ambiguous.iter().flat_map(|g| g.members.iter().map(|m| m.0)))
            .collect();
        seen.sort();
        let expected: Vec<Genotype> = children.keys().copied().collect();
        prop_assert_eq!(seen, expected);
        for group in &classification.ambiguous {
            prop_assert!(group.members.len() >= 2);
        }
    }

    // Codes decode back to the states they were built from.
    #[test]
    fn code_round_trip(loci in rose_loci()) {
        let table = PhenotypeTable::builtin().expect("builtin table loads");
        let genotype = rose(&table, loci);
        let code = genotype.code();
        prop_assert_eq!(Genotype::from_code(genotype.species(), code.as_str()).expect("valid code"), genotype);
    }
}
