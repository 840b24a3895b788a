use crate::classify::{classify, AmbiguousGroup, Classification, Identification, ReasonKind};
use crate::config::DiscoveryConfig;
use crate::error::{Error, Result};
use crate::gene_test::GeneTest;
use crate::genetics::Genotype;
use crate::punnett::cross;
use crate::table::PhenotypeTable;
use crate::Probability;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Where discovery stands after a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The last generation found something; breed again.
    Active,
    /// A full generation found nothing new.
    Converged,
}

/// One pass over a pool snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// 1-based generation number.
    pub number: usize,
    /// Same-species pairs bred, self-pairs included.
    pub crosses: usize,
    pub ambiguous_groups: usize,
    /// Genotypes added to the pool, one record each, in ascending
    /// genotype order.
    pub committed: Vec<Identification>,
    /// Pool size once `committed` has been added.
    pub pool_size: usize,
}

impl Generation {
    pub fn state(&self) -> State {
        if self.committed.is_empty() {
            State::Converged
        } else {
            State::Active
        }
    }
}

/// Result of running discovery to its fixed point.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Every known genotype in the order it became known, seeds first.
    pub pool: Vec<Genotype>,
    /// How each non-seed genotype of `pool` is obtained, in the same order.
    pub records: Vec<Identification>,
    /// Every generation run, the last one being the one that converged.
    pub generations: Vec<Generation>,
}

/// Grows a pool of known genotypes until nothing more can be identified.
pub struct Discovery<'t> {
    table: &'t PhenotypeTable,
    config: DiscoveryConfig,
}

impl<'t> Discovery<'t> {
    pub fn new(table: &'t PhenotypeTable, config: DiscoveryConfig) -> Self {
        Self { table, config }
    }

    /// Runs generations from `seeds` until one adds nothing.
    ///
    /// Duplicate seeds are dropped. Fails with `Error::NotConverged` if the
    /// configured generation cap is reached first.
    pub fn run(&self, seeds: Vec<Genotype>) -> Result<Outcome> {
        let mut pool: Vec<Genotype> = Vec::with_capacity(seeds.len());
        let mut seen = HashSet::new();
        for seed in seeds {
            self.table.phenotype(&seed)?;
            if seen.insert(seed) {
                pool.push(seed);
            } else {
                warn!(code = %seed.code(), "dropping duplicate seed");
            }
        }

        let mut records = vec![];
        let mut generations = vec![];
        for number in 1..=self.config.max_generations {
            let generation = self.generation(number, &pool)?;
            info!(
                generation = number,
                crosses = generation.crosses,
                ambiguous_groups = generation.ambiguous_groups,
                committed = generation.committed.len(),
                pool = generation.pool_size,
                "generation complete"
            );

            for record in &generation.committed {
                debug!(
                    species = self.table.species_name(record.genotype.species()),
                    code = %record.genotype.code(),
                    reason = ?record.reason.kind(),
                    probability = record.probability,
                    "committed genotype"
                );
                pool.push(record.genotype);
                records.push(record.clone());
            }

            let state = generation.state();
            generations.push(generation);
            if state == State::Converged {
                return Ok(Outcome {
                    pool,
                    records,
                    generations,
                });
            }
        }

        Err(Error::NotConverged {
            generations: self.config.max_generations,
            pool: pool.len(),
        })
    }

    /// Runs one generation over a snapshot of the pool without changing it.
    ///
    /// Every same-species pair is bred, every cross classified and every
    /// ambiguous group gene tested against the snapshot. Each genotype not
    /// yet in the pool that some record identifies is committed with its
    /// best record.
    pub fn generation(&self, number: usize, pool: &[Genotype]) -> Result<Generation> {
        let pairs: Vec<(usize, usize)> = (0..pool.len())
            .flat_map(|i| (i..pool.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| pool[i].species() == pool[j].species())
            .collect();

        let breed = |&(i, j): &(usize, usize)| -> Result<Classification> {
            let parents = (pool[i], pool[j]);
            classify(&cross(&parents.0, &parents.1), parents, self.table)
        };
        let classifications: Vec<Classification> = if self.config.parallel {
            pairs.par_iter().map(breed).collect::<Result<_>>()?
        } else {
            pairs.iter().map(breed).collect::<Result<_>>()?
        };

        let known: HashSet<Genotype> = pool.iter().copied().collect();
        let mut candidates: BTreeMap<Genotype, Vec<Identification>> = BTreeMap::new();
        let mut groups: Vec<AmbiguousGroup> = vec![];
        for classification in classifications {
            for record in classification.identified {
                if !known.contains(&record.genotype) {
                    candidates.entry(record.genotype).or_default().push(record);
                }
            }
            groups.extend(classification.ambiguous);
        }

        let test = |group: &AmbiguousGroup| pool.gene_test(group, self.table);
        let resolutions: Vec<Vec<Identification>> = if self.config.parallel {
            groups.par_iter().map(test).collect::<Result<_>>()?
        } else {
            groups.iter().map(test).collect::<Result<_>>()?
        };
        for record in resolutions.into_iter().flatten() {
            if !known.contains(&record.genotype) {
                candidates.entry(record.genotype).or_default().push(record);
            }
        }

        let committed: Vec<Identification> = candidates
            .into_iter()
            .filter_map(|(_, records)| select(records))
            .collect();

        Ok(Generation {
            number,
            crosses: pairs.len(),
            ambiguous_groups: groups.len(),
            pool_size: pool.len() + committed.len(),
            committed,
        })
    }
}

/// Picks the record to commit among all ways of obtaining one genotype.
///
/// Records that need no gene test beat those that do. Then the higher
/// breeding probability wins, then the higher test success probability.
/// Remaining ties go to the earliest record.
pub fn select(records: Vec<Identification>) -> Option<Identification> {
    let mut records = records.into_iter();
    let mut best = records.next()?;
    for record in records {
        if preference(&record).partial_cmp(&preference(&best)) == Some(Ordering::Greater) {
            best = record;
        }
    }
    Some(best)
}

fn preference(record: &Identification) -> (bool, Probability, Probability) {
    (
        record.reason.kind() != ReasonKind::GeneTest,
        record.probability,
        record.reason.success(),
    )
}
