use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cl_syllabus::{logging, Config, Scraper};
use tokio::runtime;

/// Scrape course syllabus and objectives into TSV files
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Args {
    /// Minimum level of emitted log lines
    #[clap(long, short, default_value = "INFO")]
    pub loglevel: String,
    /// Path to the toml configuration file
    #[clap(parse(from_os_str), long, short, default_value = "cl-syllabus.toml")]
    pub config: PathBuf,
    /// Directory where syllabus.tsv and objectives.tsv are appended to
    #[clap(parse(from_os_str), long, short, default_value = ".")]
    pub output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init(logging::parse_level(&args.loglevel)?)?;

    let config = Config::from_path(&args.config)
        .with_context(|| format!("Couldn't load config {}", args.config.display()))?;
    let scraper = Scraper::new(config, args.output_dir)?;
    log::debug!("Appending entries to {}", scraper.output_dir().display());

    let rt = runtime::Builder::new_current_thread().enable_all().build()?;
    rt.block_on(scraper.run())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args() {
        let args = Args::try_parse_from(["cl-syllabus"]).unwrap();
        assert_eq!("INFO", args.loglevel);
        assert_eq!(PathBuf::from("cl-syllabus.toml"), args.config);
        assert_eq!(PathBuf::from("."), args.output_dir);
    }

    #[test]
    fn short_flags() {
        let args =
            Args::try_parse_from(["cl-syllabus", "-l", "DEBUG", "-c", "my.toml", "-o", "out"])
                .unwrap();
        assert_eq!("DEBUG", args.loglevel);
        assert_eq!(PathBuf::from("my.toml"), args.config);
        assert_eq!(PathBuf::from("out"), args.output_dir);
    }
}
