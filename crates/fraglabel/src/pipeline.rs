use serde::Serialize;

use crate::classify::{classify, Classified};
use crate::color::ColorMap;
use crate::fraction::FractionTable;
use crate::matrix::ResidueMatrix;
use crate::peaks::PeakDetector;
use crate::record::FragmentRecord;
use crate::sequence::Sequence;

/// Records that survived intensity filtering and peak detection
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PeakSelection {
    /// Records with a nonzero intensity, in table order
    pub observed: usize,
    /// Indices into the observed records that were detected as peaks
    pub peaks: Vec<usize>,
}

impl PeakSelection {
    /// Drop records without intensity, then keep only the peaks of the
    /// remaining intensity trace
    pub fn select<'a>(
        records: &'a [FragmentRecord],
        detector: &PeakDetector,
    ) -> (Self, Vec<&'a FragmentRecord>) {
        let observed = records
            .iter()
            .filter(|r| r.observed_intensity().is_some())
            .collect::<Vec<_>>();
        let trace = observed
            .iter()
            .filter_map(|r| r.observed_intensity())
            .collect::<Vec<_>>();

        let peaks = detector.detect(&trace);
        let selected = peaks.iter().map(|&ix| observed[ix]).collect();
        (
            Self {
                observed: observed.len(),
                peaks,
            },
            selected,
        )
    }
}

/// Every intermediate and final result for one sample
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Analysis {
    pub sequence: Sequence,
    pub selection: PeakSelection,
    pub classified: Classified,
    pub matrix: ResidueMatrix,
    pub fractions: FractionTable,
    pub colors: ColorMap,
}

impl Analysis {
    /// Run the whole pipeline over one sample's fragment records
    pub fn run(records: &[FragmentRecord], sequence: Sequence, detector: &PeakDetector) -> Self {
        let (selection, selected) = PeakSelection::select(records, detector);
        log::info!(
            "- peaks: {} of {} records with intensity ({} total)",
            selection.peaks.len(),
            selection.observed,
            records.len()
        );

        let classified = classify(selected);
        log::info!(
            "- classified: {} records, {} dropped",
            classified.records.len(),
            classified.dropped
        );

        let mut analysis = Self::from_classified(classified, sequence);
        analysis.selection = selection;
        analysis
    }

    /// Run the aggregation stages over records that were already classified
    pub fn from_classified(classified: Classified, sequence: Sequence) -> Self {
        let matrix = ResidueMatrix::build(&classified, sequence.len());
        log::info!(
            "- matrix: {} matched cells over {} positions",
            matrix.matched_cells(),
            matrix.positions
        );

        let mut fractions = FractionTable::build(&matrix);
        let colors = ColorMap::build(fractions.evidence());
        for (row, color) in fractions.rows.iter_mut().zip(&colors.channels) {
            row.color = *color;
        }

        Self {
            sequence,
            selection: PeakSelection::default(),
            classified,
            matrix,
            fractions,
            colors,
        }
    }
}
