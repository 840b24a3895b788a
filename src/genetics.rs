use crate::error::{Error, Result};
use crate::Species;
use std::fmt;

/// Number of loci every genotype carries.
pub const N_LOCI: usize = 4;

/// The four independently inherited loci, in code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Locus {
    Red,
    Yellow,
    White,
    Blue,
}

impl Locus {
    pub const ALL: [Locus; N_LOCI] = [Locus::Red, Locus::Yellow, Locus::White, Locus::Blue];

    /// Dominant allele letter. The recessive letter is its lowercase.
    pub fn letter(self) -> char {
        match self {
            Locus::Red => 'R',
            Locus::Yellow => 'Y',
            Locus::White => 'W',
            Locus::Blue => 'B',
        }
    }
}

/// Count of dominant alleles at one locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LocusState(u8);

impl LocusState {
    pub const RECESSIVE: LocusState = LocusState(0);
    pub const HETEROZYGOUS: LocusState = LocusState(1);
    pub const DOMINANT: LocusState = LocusState(2);

    pub const ALL: [LocusState; 3] = [Self::RECESSIVE, Self::HETEROZYGOUS, Self::DOMINANT];

    pub fn new(dominant_alleles: u8) -> Result<Self> {
        Self::try_from(dominant_alleles)
    }

    pub fn count(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for LocusState {
    type Error = Error;

    fn try_from(dominant_alleles: u8) -> Result<Self> {
        match dominant_alleles {
            0..=2 => Ok(Self(dominant_alleles)),
            other => Err(Error::InvalidLocusState(other)),
        }
    }
}

/// Locus states in code order: red, yellow, white, blue.
pub type Loci = [LocusState; N_LOCI];

/// A species together with its hidden locus states.
///
/// Genotypes are plain values: two genotypes are the same flower exactly
/// when species and every locus state match. Ordering is by species, then
/// by locus states in code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Genotype {
    species: Species,
    loci: Loci,
}

impl Genotype {
    /// Constructs a `Genotype` from raw dominant-allele counts
    ///
    /// Fails if any count is outside `0..=2`.
    pub fn new(species: Species, red: u8, yellow: u8, white: u8, blue: u8) -> Result<Self> {
        Ok(Self::from_loci(
            species,
            [
                LocusState::new(red)?,
                LocusState::new(yellow)?,
                LocusState::new(white)?,
                LocusState::new(blue)?,
            ],
        ))
    }

    pub fn from_loci(species: Species, loci: Loci) -> Self {
        Self { species, loci }
    }

    /// Decodes an eight letter genotype code such as `RrYYwwbb`
    pub fn from_code(species: Species, code: &str) -> Result<Self> {
        Ok(Self::from_loci(species, decode(code)?))
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn loci(&self) -> Loci {
        self.loci
    }

    pub fn state(&self, locus: Locus) -> LocusState {
        self.loci[locus as usize]
    }

    /// The canonical genotype code, e.g. `rrYywwbb`.
    pub fn code(&self) -> GenotypeCode {
        GenotypeCode::from(self.loci)
    }
}

/// Canonical eight letter rendering of a set of locus states.
///
/// Each locus contributes its dominant letter once per dominant allele,
/// followed by the recessive letter for the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenotypeCode([u8; 2 * N_LOCI]);

impl GenotypeCode {
    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever written.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl From<Loci> for GenotypeCode {
    fn from(loci: Loci) -> Self {
        let mut code = [0u8; 2 * N_LOCI];
        for (i, (locus, state)) in Locus::ALL.iter().zip(loci.iter()).enumerate() {
            let dominant = locus.letter() as u8;
            for allele in 0..2 {
                code[2 * i + allele] = if (allele as u8) < state.count() {
                    dominant
                } else {
                    dominant.to_ascii_lowercase()
                };
            }
        }
        GenotypeCode(code)
    }
}

impl fmt::Display for GenotypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes a genotype code into locus states.
///
/// Letters within a pair may appear in either case order (`Rr` and `rR`
/// both decode to one dominant allele), but pairs must follow the fixed
/// R, Y, W, B order.
pub fn decode(code: &str) -> Result<Loci> {
    let invalid = |reason| Error::InvalidGenotypeCode {
        code: code.to_owned(),
        reason,
    };

    let bytes = code.as_bytes();
    if bytes.len() != 2 * N_LOCI {
        return Err(invalid("expected 8 letters"));
    }

    let mut loci = [LocusState::RECESSIVE; N_LOCI];
    for (i, locus) in Locus::ALL.iter().enumerate() {
        let dominant = locus.letter() as u8;
        let mut count = 0;
        for &letter in &bytes[2 * i..2 * i + 2] {
            if letter == dominant {
                count += 1;
            } else if letter != dominant.to_ascii_lowercase() {
                return Err(invalid("letters must be R, Y, W, B pairs in that order"));
            }
        }
        loci[i] = LocusState::new(count)?;
    }
    Ok(loci)
}

static STATES: [LocusState; 3] = LocusState::ALL;

/// Every combination of locus states, red varying slowest. With
/// `with_blue` false only blue-recessive combinations are produced.
pub fn all_loci(with_blue: bool) -> impl Iterator<Item = Loci> {
    let blues: &'static [LocusState] = if with_blue { &STATES[..] } else { &STATES[..1] };
    STATES.iter().flat_map(move |&r| {
        STATES.iter().flat_map(move |&y| {
            STATES
                .iter()
                .flat_map(move |&w| blues.iter().map(move |&b| [r, y, w, b]))
        })
    })
}
