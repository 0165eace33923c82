use super::input::Settings;
use anyhow::Context;
use fraglabel_core::pipeline::Analysis;
use fraglabel_core::sequence::Sequence;
use log::info;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Output file stem for every input table. Stems shared by several tables
/// (`a/sample.tsv`, `b/sample.tsv`) get the table's index appended, so that
/// no two tables write to the same files
pub fn output_stems(paths: &[String]) -> Vec<String> {
    let stems = paths
        .iter()
        .map(|path| {
            Path::new(path)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone())
        })
        .collect::<Vec<_>>();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }

    let mut taken = stems
        .iter()
        .filter(|stem| counts[stem.as_str()] == 1)
        .cloned()
        .collect::<HashSet<_>>();

    stems
        .iter()
        .enumerate()
        .map(|(idx, stem)| {
            if counts[stem.as_str()] == 1 {
                return stem.clone();
            }
            let mut candidate = format!("{}.{}", stem, idx);
            while taken.contains(&candidate) {
                candidate.push('_');
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

pub struct Runner {
    pub parameters: Settings,
    sequence: Sequence,
    start: Instant,
}

impl Runner {
    pub fn new(parameters: Settings) -> Self {
        let sequence = Sequence::new(&parameters.sequence);
        Self {
            parameters,
            sequence,
            start: Instant::now(),
        }
    }

    // Create a path for `file_name` in the specified output directory
    pub(crate) fn make_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        self.parameters.output_directory.join(file_name.as_ref())
    }

    /// Analyze a single fragment table, returning the paths of the files written
    fn process_file(&self, path: &str, stem: &str) -> anyhow::Result<Vec<String>> {
        let start = Instant::now();
        let records = fraglabel_core::read_fragments(path)
            .with_context(|| format!("Failed to read fragment table `{}`", path))?;
        info!("{}: read {} records", path, records.len());

        let analysis = Analysis::run(&records, self.sequence.clone(), &self.parameters.peaks);

        let outputs = vec![
            self.write_matrix(stem, &analysis)?,
            self.write_sheet(stem, &analysis)?,
            self.write_color_script(stem, &analysis)?,
        ];
        info!(
            "{}: processed in {} ms",
            path,
            (Instant::now() - start).as_millis()
        );
        Ok(outputs)
    }

    pub fn run(mut self) -> anyhow::Result<Settings> {
        let stems = output_stems(&self.parameters.tsv_paths);
        let outputs = self
            .parameters
            .tsv_paths
            .par_iter()
            .zip(stems.par_iter())
            .map(|(path, stem)| self.process_file(path, stem))
            .collect::<anyhow::Result<Vec<_>>>()?;

        self.parameters
            .output_paths
            .extend(outputs.into_iter().flatten());

        let path = self.make_path("results.json");
        self.parameters
            .output_paths
            .push(path.to_string_lossy().into_owned());
        println!("{}", serde_json::to_string_pretty(&self.parameters)?);

        let bytes = serde_json::to_vec_pretty(&self.parameters)?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write `{}`", path.display()))?;

        let run_time = (Instant::now() - self.start).as_secs();
        info!("finished in {}s", run_time);
        Ok(self.parameters)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn paths(p: &[&str]) -> Vec<String> {
        p.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn distinct_stems_are_kept() {
        assert_eq!(
            output_stems(&paths(&["a/first.tsv", "b/second.txt"])),
            vec!["first", "second"]
        );
    }

    #[test]
    fn shared_stems_are_indexed() {
        assert_eq!(
            output_stems(&paths(&["a/sample.tsv", "other.tsv", "b/sample.tsv"])),
            vec!["sample.0", "other", "sample.2"]
        );
    }

    #[test]
    fn indexed_stem_avoids_existing_names() {
        let stems = output_stems(&paths(&["a/sample.tsv", "sample.0.tsv", "b/sample.tsv"]));
        assert_eq!(stems, vec!["sample.0_", "sample.0", "sample.2"]);

        let stems = output_stems(&paths(&["a/x.tsv", "b/x.tsv", "x.1.tsv"]));
        assert_eq!(stems.len(), stems.iter().collect::<HashSet<_>>().len());
    }
}
