use serde::{Deserialize, Serialize};

/// One row of a Protein Prospector fragment ion export.
///
/// Every column is optional: empty or unparseable fields become `None`
/// rather than failing the whole table
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FragmentRecord {
    #[serde(rename = "m/z", default, deserialize_with = "csv::invalid_option")]
    pub mz: Option<f64>,
    #[serde(rename = "z", default, deserialize_with = "csv::invalid_option")]
    pub charge: Option<i32>,
    #[serde(rename = "Intensity", default, deserialize_with = "csv::invalid_option")]
    pub intensity: Option<f64>,
    /// 1 = unlabeled, 2 = labeled
    #[serde(rename = "Peptide #", default, deserialize_with = "csv::invalid_option")]
    pub peptide: Option<u8>,
    #[serde(rename = "Ion Type", default, deserialize_with = "csv::invalid_option")]
    pub ion_type: Option<String>,
    /// Fragment index along the backbone
    #[serde(rename = "Index", default, deserialize_with = "csv::invalid_option")]
    pub index: Option<u32>,
    #[serde(rename = "Charge", default, deserialize_with = "csv::invalid_option")]
    pub ion_charge: Option<i32>,
    #[serde(rename = "Elem Comp", default, deserialize_with = "csv::invalid_option")]
    pub elemental_composition: Option<String>,
    #[serde(rename = "Error", default, deserialize_with = "csv::invalid_option")]
    pub error: Option<f64>,
}

impl FragmentRecord {
    /// Intensity, if the record carries a nonzero one
    pub fn observed_intensity(&self) -> Option<f64> {
        self.intensity.filter(|x| *x != 0.0 && !x.is_nan())
    }
}

/// Parse a tab-delimited fragment table from any reader
pub fn parse_fragments<R: std::io::Read>(rdr: R) -> Result<Vec<FragmentRecord>, csv::Error> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
        .deserialize()
        .collect()
}
