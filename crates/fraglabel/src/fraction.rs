use serde::Serialize;

use crate::classify::{Bucket, Label};
use crate::ion::Terminus;
use crate::matrix::ResidueMatrix;

/// First-difference of the weighted average series
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub enum Relative {
    /// First or last position of the sequence
    Boundary,
    /// A required weighted average is missing
    NoData,
    Delta(f64),
}

impl Relative {
    pub fn value(self) -> Option<f64> {
        match self {
            Relative::Delta(x) => Some(x),
            _ => None,
        }
    }
}

/// Per-residue labeling summary
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ResidueFraction {
    /// Summed unlabeled n-terminal intensity
    pub n_numerator: f64,
    /// Summed labeled n-terminal intensity
    pub n_denominator: f64,
    pub n_fraction: Option<f64>,
    pub c_numerator: f64,
    pub c_denominator: f64,
    pub c_fraction: Option<f64>,
    /// `1 - c_fraction`, aligning the c-terminal estimator with the n-terminal one
    pub c_fraction_flipped: Option<f64>,
    pub weighted_average: Option<f64>,
    /// Labeled-channel intensity supporting this residue
    pub evidence: Option<f64>,
    pub relative: Relative,
    /// Filled in by [`crate::color::ColorMap`]
    pub color: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FractionTable {
    pub rows: Vec<ResidueFraction>,
}

/// `unlabeled / (unlabeled + labeled)`, or `None` if nothing was observed
pub fn unlabeled_fraction(unlabeled: f64, labeled: f64) -> Option<f64> {
    let total = unlabeled + labeled;
    match total == 0.0 {
        true => None,
        false => Some(unlabeled / total),
    }
}

/// Blend the two terminal estimators, weighting each by its own labeled
/// intensity.
///
/// Both estimators can be present while neither has labeled intensity
/// (only unlabeled fragments observed on both sides) - in that case they
/// receive equal weight
pub fn weighted_average(
    n_fraction: Option<f64>,
    c_flipped: Option<f64>,
    n_labeled: f64,
    c_labeled: f64,
) -> Option<f64> {
    match (n_fraction, c_flipped) {
        (Some(n), Some(c)) => {
            let total = n_labeled + c_labeled;
            match total == 0.0 {
                true => Some((n + c) / 2.0),
                false => Some(n * (n_labeled / total) + c * (c_labeled / total)),
            }
        }
        (Some(n), None) => Some(n),
        (None, Some(c)) => Some(c),
        (None, None) => None,
    }
}

impl FractionTable {
    pub fn build(matrix: &ResidueMatrix) -> Self {
        let sum = |terminus, label, position| {
            matrix.bucket_sum(Bucket::new(terminus, label), position)
        };

        let mut rows = (0..matrix.positions)
            .map(|p| {
                let n_numerator = sum(Terminus::N, Label::Unlabeled, p);
                let n_denominator = sum(Terminus::N, Label::Labeled, p);
                let c_numerator = sum(Terminus::C, Label::Unlabeled, p);
                let c_denominator = sum(Terminus::C, Label::Labeled, p);

                let n_fraction = unlabeled_fraction(n_numerator, n_denominator);
                let c_fraction = unlabeled_fraction(c_numerator, c_denominator);
                let c_fraction_flipped = c_fraction.map(|c| 1.0 - c);

                let evidence = Some(n_denominator + c_denominator).filter(|x| *x != 0.0);

                ResidueFraction {
                    n_numerator,
                    n_denominator,
                    n_fraction,
                    c_numerator,
                    c_denominator,
                    c_fraction,
                    c_fraction_flipped,
                    weighted_average: weighted_average(
                        n_fraction,
                        c_fraction_flipped,
                        n_denominator,
                        c_denominator,
                    ),
                    evidence,
                    relative: Relative::Boundary,
                    color: None,
                }
            })
            .collect::<Vec<_>>();

        let relative = relative_labels(
            &rows.iter().map(|r| r.weighted_average).collect::<Vec<_>>(),
        );
        for (row, relative) in rows.iter_mut().zip(relative) {
            row.relative = relative;
        }

        Self { rows }
    }

    pub fn evidence(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.rows.iter().map(|r| r.evidence)
    }
}

/// First differences of `averages`, skipping the two boundary positions.
/// Position 1 reports its own value, so that a cumulative sum from position 1
/// reconstructs the original series
pub fn relative_labels(averages: &[Option<f64>]) -> Vec<Relative> {
    let last = averages.len().saturating_sub(1);
    (0..averages.len())
        .map(|i| {
            if i == 0 || i == last {
                return Relative::Boundary;
            }
            let current = match averages[i] {
                Some(x) => x,
                None => return Relative::NoData,
            };
            match i {
                1 => Relative::Delta(current),
                _ => match averages[i - 1] {
                    Some(previous) => Relative::Delta(current - previous),
                    None => Relative::NoData,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fractions() {
        assert_eq!(unlabeled_fraction(0.0, 0.0), None);
        assert_eq!(unlabeled_fraction(3.0, 1.0), Some(0.75));
        assert_eq!(unlabeled_fraction(0.0, 5.0), Some(0.0));
        assert_eq!(unlabeled_fraction(5.0, 0.0), Some(1.0));
    }

    #[test]
    fn weighting() {
        assert_eq!(weighted_average(None, None, 0.0, 0.0), None);
        assert_eq!(weighted_average(Some(0.4), None, 10.0, 30.0), Some(0.4));
        assert_eq!(weighted_average(None, Some(0.6), 10.0, 30.0), Some(0.6));

        let wa = weighted_average(Some(0.2), Some(0.6), 10.0, 30.0).unwrap();
        assert!((wa - (0.2 * 0.25 + 0.6 * 0.75)).abs() < 1e-12);

        // unlabeled-only on both sides
        assert_eq!(weighted_average(Some(1.0), Some(0.0), 0.0, 0.0), Some(0.5));
    }

    #[test]
    fn relative() {
        let wa = [Some(0.1), Some(0.3), Some(0.5), Some(0.4), Some(0.9)];
        let rel = relative_labels(&wa);
        assert_eq!(rel[0], Relative::Boundary);
        assert_eq!(rel[1], Relative::Delta(0.3));
        assert!((rel[2].value().unwrap() - 0.2).abs() < 1e-12);
        assert!((rel[3].value().unwrap() + 0.1).abs() < 1e-12);
        assert_eq!(rel[4], Relative::Boundary);
    }

    #[test]
    fn relative_with_gaps() {
        let wa = [None, None, Some(0.3), None, Some(0.2), None];
        let rel = relative_labels(&wa);
        assert_eq!(
            rel,
            vec![
                Relative::Boundary,
                Relative::NoData,
                Relative::NoData,
                Relative::NoData,
                Relative::NoData,
                Relative::Boundary,
            ]
        );
    }

    #[test]
    fn degenerate_lengths() {
        assert!(relative_labels(&[]).is_empty());
        assert_eq!(relative_labels(&[Some(1.0)]), vec![Relative::Boundary]);
        assert_eq!(
            relative_labels(&[Some(1.0), Some(2.0)]),
            vec![Relative::Boundary, Relative::Boundary]
        );
    }
}
