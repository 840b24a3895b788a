use thiserror::Error;

/// Errors raised while building genotypes, loading reference data or
/// running discovery.
#[derive(Debug, Error)]
pub enum Error {
    /// A locus state outside `0..=2`.
    #[error("invalid locus state {0}, expected 0, 1 or 2")]
    InvalidLocusState(u8),

    #[error("invalid genotype code {code:?}: {reason}")]
    InvalidGenotypeCode { code: String, reason: &'static str },

    #[error("unknown species {0:?}")]
    UnknownSpecies(String),

    #[error("unknown colour {0:?}")]
    UnknownColour(String),

    /// The phenotype table has no colour for a genotype. The table is
    /// validated on load, so this means it was built incorrectly.
    #[error("phenotype table has no colour for {species} {code}")]
    PhenotypeMissing { species: String, code: String },

    #[error("phenotype table for {species} covers {found} genotype codes, expected 27 or 81")]
    IncompleteTable { species: String, found: usize },

    #[error("duplicate phenotype entry for {species} {code}")]
    DuplicateEntry { species: String, code: String },

    #[error("discovery did not converge within {generations} generations ({pool} genotypes known)")]
    NotConverged { generations: usize, pool: usize },

    #[error("malformed record on line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
