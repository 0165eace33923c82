use serde::{Deserialize, Serialize};

use crate::ion::{IonLabel, Terminus};
use crate::record::FragmentRecord;

/// Isotope label state, encoded by the `Peptide #` column
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Label {
    Unlabeled,
    Labeled,
}

impl Label {
    pub fn from_peptide_number(peptide: u8) -> Option<Self> {
        match peptide {
            1 => Some(Label::Unlabeled),
            2 => Some(Label::Labeled),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Label::Unlabeled => "unlabeled",
            Label::Labeled => "labeled",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Bucket {
    pub terminus: Terminus,
    pub label: Label,
}

impl Bucket {
    /// All buckets, in grid order
    pub const ALL: [Bucket; 4] = [
        Bucket::new(Terminus::N, Label::Unlabeled),
        Bucket::new(Terminus::N, Label::Labeled),
        Bucket::new(Terminus::C, Label::Unlabeled),
        Bucket::new(Terminus::C, Label::Labeled),
    ];

    pub const fn new(terminus: Terminus, label: Label) -> Self {
        Self { terminus, label }
    }

    /// Position of this bucket within [`Bucket::ALL`]
    pub fn ix(self) -> usize {
        match (self.terminus, self.label) {
            (Terminus::N, Label::Unlabeled) => 0,
            (Terminus::N, Label::Labeled) => 1,
            (Terminus::C, Label::Unlabeled) => 2,
            (Terminus::C, Label::Labeled) => 3,
        }
    }
}

/// A peak-selected fragment that could be routed into a bucket
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    pub bucket: Bucket,
    pub ion: IonLabel,
    /// Fragment index as annotated in the input table
    pub index: usize,
    pub intensity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Classified {
    pub records: Vec<ClassifiedRecord>,
    /// Number of records that lacked a peptide number, ion type, index or
    /// intensity, or whose values were outside the catalog
    pub dropped: usize,
}

impl Classified {
    pub fn bucket(&self, bucket: Bucket) -> impl Iterator<Item = &ClassifiedRecord> + '_ {
        self.records.iter().filter(move |r| r.bucket == bucket)
    }
}

/// Route a single record, or `None` if it can't be classified
pub fn classify_record(record: &FragmentRecord) -> Option<ClassifiedRecord> {
    let label = Label::from_peptide_number(record.peptide?)?;
    let ion = record.ion_type.as_deref()?.parse::<IonLabel>().ok()?;
    Some(ClassifiedRecord {
        bucket: Bucket::new(ion.terminus(), label),
        ion,
        index: record.index? as usize,
        intensity: record.observed_intensity()?,
    })
}

/// Best-effort classification of peak-selected records. Records failing any
/// precondition are skipped, never reported as errors
pub fn classify<'a, I>(records: I) -> Classified
where
    I: IntoIterator<Item = &'a FragmentRecord>,
{
    let mut classified = Classified::default();
    for record in records {
        match classify_record(record) {
            Some(r) => classified.records.push(r),
            None => classified.dropped += 1,
        }
    }
    log::debug!(
        "classified {} records, dropped {}",
        classified.records.len(),
        classified.dropped
    );
    classified
}
