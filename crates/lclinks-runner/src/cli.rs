//! Command-line interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Generate download links for land-cover rasters covering an area of interest.
#[derive(Parser, Debug)]
#[command(name = "lclinks", version, about)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve every requested source and year and write the link table
    Generate(GenerateArgs),

    /// Download a FROM_GLC catalog snapshot
    FetchCatalog(FetchCatalogArgs),

    /// List the supported sources and their years
    Sources,
}

/// Arguments of `generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// GeoJSON file with the area of interest, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    pub aoi: PathBuf,

    /// Years to generate links for
    #[arg(long, short = 'y', value_delimiter = ',', required = true, num_args = 1..)]
    pub years: Vec<u16>,

    /// Region name used in the output file names and the `region` column
    #[arg(long, short = 'r', default_value = "custom_AOI")]
    pub region: String,

    /// Sources to include (default: all)
    #[arg(long, short = 's', value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Directory receiving the CSV and the saved AOI
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// YAML configuration file
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Worker threads for resolution (default: number of CPUs)
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Never download missing catalog snapshots
    #[arg(long)]
    pub no_fetch: bool,
}

/// Arguments of `fetch-catalog`.
#[derive(Args, Debug, Clone)]
pub struct FetchCatalogArgs {
    /// Catalog to fetch: from-glc-2010, from-glc-2015 or from-glc-2017
    pub catalog: String,

    /// Output file (default: the configured snapshot path)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::parse_from(["lclinks", "generate", "--aoi", "aoi.geojson", "--years", "2000,2015"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.years, vec![2000, 2015]);
        assert_eq!(args.region, "custom_AOI");
        assert!(args.sources.is_empty());
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.jobs, None);
        assert!(!args.no_fetch);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_generate_full() {
        let cli = Cli::parse_from([
            "lclinks", "-v", "generate", "--aoi", "-", "-y", "2010", "--sources", "GSW,GFC", "--jobs", "1",
            "--no-fetch", "--region", "East_Africa",
        ]);
        assert!(cli.verbose);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.aoi, PathBuf::from("-"));
        assert_eq!(args.sources, vec!["GSW", "GFC"]);
        assert_eq!(args.jobs, Some(1));
        assert!(args.no_fetch);
    }

    #[test]
    fn test_years_are_required() {
        assert!(Cli::try_parse_from(["lclinks", "generate", "--aoi", "a.geojson"]).is_err());
        assert!(Cli::try_parse_from(["lclinks", "generate", "--aoi", "a.geojson", "--years", "twenty"]).is_err());
    }

    #[test]
    fn test_fetch_catalog() {
        let cli = Cli::parse_from(["lclinks", "fetch-catalog", "from-glc-2017", "-o", "meta.json"]);
        let Command::FetchCatalog(args) = cli.command else {
            panic!("expected fetch-catalog");
        };
        assert_eq!(args.catalog, "from-glc-2017");
        assert_eq!(args.output, Some(PathBuf::from("meta.json")));
    }
}
