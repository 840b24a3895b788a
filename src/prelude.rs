pub use crate::classify::{
    classify, colour_distribution, AmbiguousGroup, Classification, Identification, Reason,
    ReasonKind,
};
pub use crate::config::DiscoveryConfig;
pub use crate::discovery::{select, Discovery, Generation, Outcome, State};
pub use crate::error::Error;
pub use crate::gene_test::{GeneTest, TestPlan};
pub use crate::genetics::{Genotype, GenotypeCode, Locus, LocusState};
pub use crate::punnett::{cross, punnett_square};
pub use crate::report::{undiscovered, Entry, Flower, Report};
pub use crate::table::{builtin_seeds, PhenotypeTable, SeedReader, TableBuilder};
pub use crate::{Colour, CrossResult, Parents, Probability, Species};
