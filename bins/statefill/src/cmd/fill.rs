//! `fill`: run fillers and emit fixture suites.

use super::Error;
use clap::Parser;
use fillers::{all_fillers, fill_all, FillConfig, Filler};
use primitives::{ForkRegistry, SpecId};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// `fill` subcommand
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Skip forks before this one
    #[arg(long)]
    from: Option<SpecId>,
    /// Skip this fork and every later one
    #[arg(long)]
    until: Option<SpecId>,
    /// Only fill fillers whose id contains this string
    #[arg(long)]
    filter: Option<String>,
    /// Fill the forks of a filler one after the other
    #[arg(short = 's', long)]
    single_thread: bool,
    /// Write one JSON file per filler below this directory instead of printing
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl Cmd {
    /// Fills every selected filler and emits the suites.
    pub fn run(&self) -> Result<(), Error> {
        let config = FillConfig {
            from: self.from,
            until: self.until,
            filter: self.filter.clone(),
            single_thread: self.single_thread,
        };
        let fillers = all_fillers();
        let suites = fill_all(
            fillers.iter().map(|filler| filler.as_ref() as &dyn Filler),
            ForkRegistry::mainnet(),
            &config,
        )?;

        for (id, suite) in &suites {
            let json = suite.to_json()?;
            match &self.output {
                Some(dir) => {
                    let path = suite_path(dir, id);
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&path, json)?;
                    info!(filler = %id, path = %path.display(), fixtures = suite.0.len(), "wrote suite");
                }
                None => println!("{json}"),
            }
        }
        Ok(())
    }
}

/// `vm/swap/test_swap` is written to `<dir>/vm/swap/test_swap.json`.
fn suite_path(dir: &Path, id: &str) -> PathBuf {
    let mut path = id.split('/').fold(dir.to_path_buf(), |path, part| path.join(part));
    path.set_extension("json");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suite_paths_follow_the_filler_id() {
        assert_eq!(
            suite_path(Path::new("out"), "vm/swap/test_swap"),
            Path::new("out/vm/swap/test_swap.json")
        );
    }
}
