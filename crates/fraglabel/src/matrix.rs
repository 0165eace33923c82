use serde::{Deserialize, Serialize};

use crate::classify::{Bucket, Classified};
use crate::ion::IonLabel;
use crate::sequence::Sequence;

/// Order in which a terminus' fragment indices are laid out over residue
/// positions
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Direction {
    /// Position `p` holds fragment index `p`
    Forward,
    /// Position `p` holds fragment index `len - 1 - p`
    Reverse,
}

impl Direction {
    pub fn fragment_index(self, position: usize, len: usize) -> usize {
        match self {
            Direction::Forward => position,
            Direction::Reverse => len - 1 - position,
        }
    }
}

/// Summed intensities for a single (bucket, ion) pair, one cell per residue
/// position. `None` marks a cell where nothing was matched
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Column {
    pub bucket: Bucket,
    pub ion: IonLabel,
    pub cells: Vec<Option<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResidueMatrix {
    /// Columns in grid order: buckets in [`Bucket::ALL`] order, ions in
    /// catalog order within each bucket
    pub columns: Vec<Column>,
    /// Residue positions (rows)
    pub positions: usize,
    /// Classified records whose fragment index falls outside the sequence
    pub out_of_range: usize,
}

impl ResidueMatrix {
    /// Aggregate classified records into a per (bucket, ion, position) grid
    pub fn build(classified: &Classified, positions: usize) -> Self {
        let columns_per_bucket = Bucket::ALL
            .iter()
            .map(|b| b.terminus.ions().len())
            .collect::<Vec<_>>();
        let offsets = columns_per_bucket
            .iter()
            .scan(0, |acc, n| {
                let start = *acc;
                *acc += n;
                Some(start)
            })
            .collect::<Vec<_>>();

        // Sums indexed by [column][fragment index]
        let total_columns = columns_per_bucket.iter().sum::<usize>();
        let mut sums = vec![vec![0.0f64; positions]; total_columns];
        let mut out_of_range = 0;

        for record in &classified.records {
            let ion_ix = record
                .bucket
                .terminus
                .ions()
                .iter()
                .position(|ion| *ion == record.ion);
            let ion_ix = match ion_ix {
                Some(ix) => ix,
                None => continue,
            };
            match sums[offsets[record.bucket.ix()] + ion_ix].get_mut(record.index) {
                Some(sum) => *sum += record.intensity,
                None => out_of_range += 1,
            }
        }

        if out_of_range > 0 {
            log::warn!(
                "{} classified records have a fragment index outside of the {} residue positions",
                out_of_range,
                positions
            );
        }

        let mut columns = Vec::with_capacity(total_columns);
        for bucket in Bucket::ALL {
            let direction = bucket.terminus.direction();
            for (ion_ix, ion) in bucket.terminus.ions().iter().enumerate() {
                let column = &sums[offsets[bucket.ix()] + ion_ix];
                let cells = (0..positions)
                    .map(|p| {
                        let sum = column[direction.fragment_index(p, positions)];
                        match sum == 0.0 {
                            true => None,
                            false => Some(sum),
                        }
                    })
                    .collect();
                columns.push(Column {
                    bucket,
                    ion: *ion,
                    cells,
                });
            }
        }

        Self {
            columns,
            positions,
            out_of_range,
        }
    }

    pub fn column(&self, bucket: Bucket, ion: IonLabel) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.bucket == bucket && c.ion == ion)
    }

    pub fn cell(&self, bucket: Bucket, ion: IonLabel, position: usize) -> Option<f64> {
        self.column(bucket, ion)?.cells.get(position).copied().flatten()
    }

    /// Sum of all matched cells of `bucket` at `position`
    pub fn bucket_sum(&self, bucket: Bucket, position: usize) -> f64 {
        self.columns
            .iter()
            .filter(|c| c.bucket == bucket)
            .filter_map(|c| c.cells[position])
            .sum()
    }

    /// Number of cells holding a matched intensity
    pub fn matched_cells(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.cells.iter().filter(|x| x.is_some()).count())
            .sum()
    }

    /// Three header rows (terminus, label state, ion) aligned with the rows
    /// produced by [`ResidueMatrix::row_labels`] + the cells.
    ///
    /// Layout: `[position label] [n-terminal columns] [c-terminal label] [c-terminal columns]`
    pub fn headers(&self) -> [Vec<String>; 3] {
        let mut terminus = vec![String::new()];
        let mut label = vec![String::new()];
        let mut ion = vec![String::new()];

        let mut previous: Option<Bucket> = None;
        for column in &self.columns {
            let new_terminus = previous.map_or(true, |b| b.terminus != column.bucket.terminus);
            let new_bucket = previous != Some(column.bucket);
            if new_terminus && previous.is_some() {
                // slot for the reverse numbered label column
                terminus.push(String::new());
                label.push(String::new());
                ion.push(String::new());
            }
            terminus.push(match new_terminus {
                true => column.bucket.terminus.name().into(),
                false => String::new(),
            });
            label.push(match new_bucket {
                true => column.bucket.label.name().into(),
                false => String::new(),
            });
            ion.push(column.ion.to_string());
            previous = Some(column.bucket);
        }
        [terminus, label, ion]
    }

    /// Forward and reverse position labels for each row
    pub fn row_labels(&self, sequence: &Sequence) -> Vec<(String, String)> {
        (0..self.positions)
            .map_while(|p| Some((sequence.position_label(p)?, sequence.reverse_label(p)?)))
            .collect()
    }
}
