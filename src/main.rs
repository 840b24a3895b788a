use flower_genomics::config::parse_flag;
use flower_genomics::prelude::*;
use std::error::Error;
use std::fs::File;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: flower-plan [--phenotypes PATH] [--seeds PATH] [--max-generations N] [--parallel on|off] [--sequential] [--json] [--missing]";

struct Args {
    phenotypes: Option<String>,
    seeds: Option<String>,
    config: DiscoveryConfig,
    json: bool,
    missing: bool,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut parsed = Args {
        phenotypes: None,
        seeds: None,
        config: DiscoveryConfig::from_env(),
        json: false,
        missing: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--phenotypes" => parsed.phenotypes = Some(value(&args, &mut i)?),
            "--seeds" => parsed.seeds = Some(value(&args, &mut i)?),
            "--max-generations" => {
                let n = value(&args, &mut i)?;
                parsed.config.max_generations = n
                    .parse()
                    .ok()
                    .filter(|&n: &usize| n > 0)
                    .ok_or_else(|| format!("Invalid --max-generations value: {}", n))?;
            }
            "--parallel" => {
                let flag = value(&args, &mut i)?;
                parsed.config.parallel =
                    parse_flag(&flag).ok_or_else(|| format!("Invalid --parallel value: {}", flag))?;
            }
            "--sequential" => parsed.config.parallel = false,
            "--json" => parsed.json = true,
            "--missing" => parsed.missing = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => return Err(format!("Unknown argument: {}\n{}", other, USAGE)),
        }
        i += 1;
    }
    Ok(parsed)
}

fn value(args: &[String], i: &mut usize) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{} expects a value", args[*i - 1]))
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    let table = match &args.phenotypes {
        Some(path) => TableBuilder::new().from_reader(Box::new(File::open(path)?))?,
        None => PhenotypeTable::builtin()?,
    };
    let seeds = match &args.seeds {
        Some(path) => SeedReader::from_reader(&table, Box::new(File::open(path)?))
            .collect::<Result<Vec<_>, _>>()?,
        None => builtin_seeds(&table)?,
    };
    info!(
        species = table.species_catalog().count(),
        seeds = seeds.len(),
        "loaded reference data"
    );

    let start = Instant::now();
    let outcome = Discovery::new(&table, args.config).run(seeds)?;
    info!(
        generations = outcome.generations.len(),
        pool = outcome.pool.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "discovery converged"
    );

    let report = Report::new(&table, &outcome.records)?;
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report);
    }

    if args.missing {
        let missing = undiscovered(&table, &outcome.pool);
        println!("{} genotypes were not discovered:", missing.len());
        for genotype in &missing {
            println!("{}", Flower::new(&table, genotype)?);
        }
    }
    Ok(())
}
