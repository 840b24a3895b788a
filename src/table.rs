use crate::error::{Error, Result};
use crate::genetics::{all_loci, decode, Genotype, Loci, LocusState};
use crate::{Colour, Species};
use csv;
use ndarray::Array4;
use std::collections::HashMap;
use std::io::Read;

const BUILTIN_PHENOTYPES: &str = include_str!("../data/phenotypes.csv");
const BUILTIN_SEEDS: &str = include_str!("../data/seeds.csv");

/// Colours of every genotype, per species.
///
/// Species and colours are catalogued in the order they are first seen
/// while loading. A species either carries the blue locus, in which case
/// all 81 codes are present, or it does not and only the 27 blue-recessive
/// codes are.
pub struct PhenotypeTable {
    species: Vec<String>,
    colours: Vec<String>,
    phenotypes: Vec<Array4<Option<Colour>>>,
    with_blue: Vec<bool>,
}

impl PhenotypeTable {
    /// The table shipped with the crate
    pub fn builtin() -> Result<Self> {
        TableBuilder::new().from_reader(Box::new(BUILTIN_PHENOTYPES.as_bytes()))
    }

    pub fn species(&self, name: &str) -> Result<Species> {
        self.species
            .iter()
            .position(|s| s == name)
            .and_then(|i| u16::try_from(i).ok())
            .map(Species)
            .ok_or_else(|| Error::UnknownSpecies(name.to_owned()))
    }

    pub fn colour(&self, name: &str) -> Result<Colour> {
        self.colours
            .iter()
            .position(|c| c == name)
            .and_then(|i| u16::try_from(i).ok())
            .map(Colour)
            .ok_or_else(|| Error::UnknownColour(name.to_owned()))
    }

    pub fn species_name(&self, species: Species) -> &str {
        &self.species[species.index()]
    }

    pub fn colour_name(&self, colour: Colour) -> &str {
        &self.colours[colour.index()]
    }

    /// All species in catalog order.
    pub fn species_catalog(&self) -> impl Iterator<Item = Species> + '_ {
        (0..self.species.len()).map_while(|i| u16::try_from(i).ok().map(Species))
    }

    /// All colours in catalog order.
    pub fn colour_catalog(&self) -> impl Iterator<Item = Colour> + '_ {
        (0..self.colours.len()).map_while(|i| u16::try_from(i).ok().map(Colour))
    }

    pub fn has_blue(&self, species: Species) -> bool {
        self.with_blue[species.index()]
    }

    /// Looks up the colour of a genotype.
    ///
    /// A miss means the table does not cover a genotype its species can
    /// produce. Tables built by `TableBuilder` are checked for this, so
    /// the error only surfaces for genotypes carrying a blue allele in a
    /// species without the blue locus.
    pub fn phenotype(&self, genotype: &Genotype) -> Result<Colour> {
        let [r, y, w, b] = genotype.loci();
        self.phenotypes
            .get(genotype.species().index())
            .and_then(|colours| colours[[r.index(), y.index(), w.index(), b.index()]])
            .ok_or_else(|| Error::PhenotypeMissing {
                species: self
                    .species
                    .get(genotype.species().index())
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", genotype.species().index())),
                code: genotype.code().to_string(),
            })
    }

    /// Every genotype the table knows for a species, in ascending order.
    pub fn genotypes(&self, species: Species) -> Vec<Genotype> {
        let mut genotypes: Vec<Genotype> = all_loci(self.has_blue(species))
            .map(|loci| Genotype::from_loci(species, loci))
            .collect();
        genotypes.sort();
        genotypes
    }
}

/// Reads a `PhenotypeTable` from `species,genotype,colour` records.
pub struct TableBuilder {
    headers: bool,
    delimiter: u8,
    species_field: String,
    genotype_field: String,
    colour_field: String,
}

impl TableBuilder {
    /// Construct a new table builder
    pub fn new() -> Self {
        Self {
            headers: true,
            delimiter: b',',
            species_field: "species".to_owned(),
            genotype_field: "genotype".to_owned(),
            colour_field: "colour".to_owned(),
        }
    }

    /// Without headers the columns are read positionally as species,
    /// genotype code, colour.
    pub fn headers(&mut self, headers: bool) -> &mut Self {
        self.headers = headers;
        self
    }

    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn species_field(&mut self, species_field: &str) -> &mut Self {
        self.species_field = species_field.to_owned();
        self
    }

    pub fn genotype_field(&mut self, genotype_field: &str) -> &mut Self {
        self.genotype_field = genotype_field.to_owned();
        self
    }

    pub fn colour_field(&mut self, colour_field: &str) -> &mut Self {
        self.colour_field = colour_field.to_owned();
        self
    }

    pub fn from_reader(&self, reader: Box<dyn Read>) -> Result<PhenotypeTable> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.headers)
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = if self.headers {
            let headers = rdr.headers()?;
            let find = |name: &str| {
                headers
                    .iter()
                    .position(|h| h == name)
                    .ok_or_else(|| Error::Parse {
                        line: 1,
                        reason: format!("missing column {:?}", name),
                    })
            };
            [
                find(self.species_field.as_str())?,
                find(self.genotype_field.as_str())?,
                find(self.colour_field.as_str())?,
            ]
        } else {
            [0, 1, 2]
        };

        let mut species: Vec<String> = vec![];
        let mut colours: Vec<String> = vec![];
        let mut species_index: HashMap<String, usize> = HashMap::new();
        let mut colour_index: HashMap<String, u16> = HashMap::new();
        let mut phenotypes: Vec<Array4<Option<Colour>>> = vec![];
        let mut entries: Vec<usize> = vec![];

        for record in rdr.into_records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let field = |i: usize| {
                record.get(columns[i]).ok_or_else(|| Error::Parse {
                    line,
                    reason: format!("expected at least {} fields", columns[i] + 1),
                })
            };
            let (species_name, code, colour_name) = (field(0)?, field(1)?, field(2)?);
            let [r, y, w, b] = decode(code)?;

            let s = match species_index.get(species_name) {
                Some(&s) => s,
                None => {
                    catalog_id(species.len(), line, "species")?;
                    species.push(species_name.to_owned());
                    phenotypes.push(Array4::from_elem((3, 3, 3, 3), None));
                    entries.push(0);
                    species_index.insert(species_name.to_owned(), species.len() - 1);
                    species.len() - 1
                }
            };
            let colour = match colour_index.get(colour_name) {
                Some(&colour) => colour,
                None => {
                    let colour = catalog_id(colours.len(), line, "colours")?;
                    colours.push(colour_name.to_owned());
                    colour_index.insert(colour_name.to_owned(), colour);
                    colour
                }
            };

            let cell = &mut phenotypes[s][[r.index(), y.index(), w.index(), b.index()]];
            if cell.is_some() {
                return Err(Error::DuplicateEntry {
                    species: species_name.to_owned(),
                    code: code.to_owned(),
                });
            }
            *cell = Some(Colour(colour));
            entries[s] += 1;
        }

        let mut with_blue = vec![];
        for (s, cells) in phenotypes.iter().enumerate() {
            let blue = cells
                .indexed_iter()
                .any(|((_, _, _, b), c)| b > 0 && c.is_some());
            let complete = all_loci(blue).all(|loci: Loci| {
                let [r, y, w, b] = loci;
                cells[[r.index(), y.index(), w.index(), b.index()]].is_some()
            });
            if !complete || entries[s] != all_loci(blue).count() {
                return Err(Error::IncompleteTable {
                    species: species[s].clone(),
                    found: entries[s],
                });
            }
            with_blue.push(blue);
        }

        Ok(PhenotypeTable {
            species,
            colours,
            phenotypes,
            with_blue,
        })
    }
}

/// Catalog ids are `u16`; the next id must still fit.
fn catalog_id(len: usize, line: u64, catalog: &str) -> Result<u16> {
    u16::try_from(len).map_err(|_| Error::Parse {
        line,
        reason: format!("more than {} {}", u16::MAX as usize + 1, catalog),
    })
}

/// The seed pool shipped with the crate
pub fn builtin_seeds(table: &PhenotypeTable) -> Result<Vec<Genotype>> {
    SeedReader::from_reader(table, Box::new(BUILTIN_SEEDS.as_bytes())).collect()
}

/// Produces seed genotypes from `species,red,yellow,white,blue` records
///
/// The header row is required. The blue column may be left out or empty,
/// in which case blue is recessive. Records with more than five fields
/// are rejected. Every seed must have a colour in the
/// table.
pub struct SeedReader<'t> {
    table: &'t PhenotypeTable,
    records: csv::StringRecordsIntoIter<Box<dyn Read>>,
}

impl<'t> SeedReader<'t> {
    pub fn from_reader(table: &'t PhenotypeTable, reader: Box<dyn Read>) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self {
            table,
            records: rdr.into_records(),
        }
    }

    fn parse(&self, record: csv::StringRecord) -> Result<Genotype> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() > 5 {
            return Err(Error::Parse {
                line,
                reason: format!("expected at most 5 fields, found {}", record.len()),
            });
        }
        let species = self.table.species(record.get(0).unwrap_or_default())?;

        let mut counts = [0u8; 4];
        for (i, count) in counts.iter_mut().enumerate() {
            match record.get(i + 1) {
                Some(field) if !field.is_empty() => {
                    *count = field.parse().map_err(|_| Error::Parse {
                        line,
                        reason: format!("locus state {:?} is not a number", field),
                    })?;
                }
                // Only blue may be omitted.
                _ if i == 3 => {}
                _ => {
                    return Err(Error::Parse {
                        line,
                        reason: "expected red, yellow and white locus states".to_owned(),
                    })
                }
            }
        }

        let genotype = Genotype::from_loci(
            species,
            [
                LocusState::new(counts[0])?,
                LocusState::new(counts[1])?,
                LocusState::new(counts[2])?,
                LocusState::new(counts[3])?,
            ],
        );
        self.table.phenotype(&genotype)?;
        Ok(genotype)
    }
}

impl<'t> Iterator for SeedReader<'t> {
    type Item = Result<Genotype>;

    fn next(&mut self) -> Option<Result<Genotype>> {
        let record = self.records.next()?;
        Some(record.map_err(Error::from).and_then(|r| self.parse(r)))
    }
}
