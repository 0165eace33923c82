pub mod classify;
pub mod color;
pub mod fraction;
pub mod ion;
pub mod matrix;
pub mod peaks;
pub mod pipeline;
pub mod record;
pub mod sequence;

use std::io::Read;

/// Rendering of a missing value in every text output
pub const MISSING: &str = "---";

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::Csv(e) => e.fmt(f),
            Self::Json(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Read a tab-delimited fragment table exported by Protein Prospector
pub fn read_fragments<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<Vec<record::FragmentRecord>, Error> {
    let file = std::fs::File::open(path)?;
    Ok(record::parse_fragments(std::io::BufReader::new(file))?)
}

pub fn read_json<P, T>(path: P) -> Result<T, Error>
where
    P: AsRef<std::path::Path>,
    T: for<'de> serde::Deserialize<'de>,
{
    let mut contents = String::new();
    std::fs::File::open(path)?.read_to_string(&mut contents)?;
    Ok(serde_json::from_str(&contents)?)
}
