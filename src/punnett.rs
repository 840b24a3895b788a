use crate::genetics::{Genotype, Locus, LocusState, N_LOCI};
use crate::{CrossResult, Probability};
use ndarray::Array4;

/// Outcomes of one locus cross; every combination of parents yields four.
pub const OUTCOMES_PER_LOCUS: u32 = 4;

/// Equally likely combinations across all loci of one cross.
pub const COMBINATIONS: u32 = 256;

/// Punnett square for one locus.
///
/// Returns the four equally likely child states, duplicates included,
/// in ascending order. The square is symmetric in its arguments.
pub fn punnett_square(a: LocusState, b: LocusState) -> [LocusState; 4] {
    let [r, h, d] = LocusState::ALL;
    match (a.count().min(b.count()), a.count().max(b.count())) {
        (0, 0) => [r, r, r, r],
        (0, 1) => [r, r, h, h],
        (0, _) => [h, h, h, h],
        (1, 1) => [r, h, h, d],
        (1, _) => [h, h, d, d],
        _ => [d, d, d, d],
    }
}

/// Punnett square collapsed to counts per child state.
pub fn locus_counts(a: LocusState, b: LocusState) -> [u32; 3] {
    let mut counts = [0; 3];
    for child in punnett_square(a, b).iter() {
        counts[child.index()] += 1;
    }
    counts
}

/// Number of equally likely combinations producing each child, indexed
/// by `[red, yellow, white, blue]` locus state.
///
/// The loci are inherited independently, so the tensor is the outer
/// product of the four per-locus count vectors and sums to 256.
pub fn offspring_counts(a: &Genotype, b: &Genotype) -> Array4<u32> {
    let mut per_locus = [[0u32; 3]; N_LOCI];
    for (counts, &locus) in per_locus.iter_mut().zip(Locus::ALL.iter()) {
        *counts = locus_counts(a.state(locus), b.state(locus));
    }
    Array4::from_shape_fn((3, 3, 3, 3), |(r, y, w, bl)| {
        per_locus[0][r] * per_locus[1][y] * per_locus[2][w] * per_locus[3][bl]
    })
}

/// Breeds two genotypes.
///
/// Genotypes of different species cannot be crossed and give an empty
/// result. Otherwise every child that can occur is listed with its
/// probability and the probabilities sum to one.
pub fn cross(a: &Genotype, b: &Genotype) -> CrossResult {
    let mut children = CrossResult::new();
    if a.species() != b.species() {
        return children;
    }

    for ((r, y, w, bl), &count) in offspring_counts(a, b).indexed_iter() {
        if count == 0 {
            continue;
        }
        let loci = [
            LocusState::ALL[r],
            LocusState::ALL[y],
            LocusState::ALL[w],
            LocusState::ALL[bl],
        ];
        children.insert(
            Genotype::from_loci(a.species(), loci),
            count as Probability / COMBINATIONS as Probability,
        );
    }
    children
}
