// ABOUTME: Merge command: combines source WARs and extra JARs into one archive.

use cargolift::error::{Error, Result};
use cargolift::merge::{ConcatenatingProcessor, MergedWarArchive, WarArchive};
use cargolift::output::Output;
use std::path::PathBuf;

pub struct MergeArgs {
    pub wars: Vec<PathBuf>,
    pub target: PathBuf,
    pub jars: Vec<PathBuf>,
    pub merge_jars: bool,
    pub concat: Vec<String>,
}

pub fn merge(args: MergeArgs, mut output: Output) -> Result<()> {
    let mut wars = args.wars.iter();
    let Some(first) = wars.next() else {
        return Err(Error::InvalidConfig(
            "at least one WAR is required".to_string(),
        ));
    };

    output.start_timer();
    let mut merged = MergedWarArchive::new(WarArchive::open(first)?);
    for war in wars {
        merged.add(WarArchive::open(war)?);
    }
    for jar in args.jars {
        merged.add_jar(jar);
    }
    merged.set_merge_jar_files(args.merge_jars);
    for path in &args.concat {
        merged.add_processor(path, ConcatenatingProcessor::new());
    }

    output.progress(&format!("Merging {} WAR(s)...", args.wars.len()));
    merged.store(&args.target)?;
    output.success(&format!("Wrote {}", args.target.display()));
    Ok(())
}
