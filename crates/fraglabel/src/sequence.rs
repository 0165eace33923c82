use serde::Serialize;

/// Conventional boundary marker flanking a peptide sequence, e.g. `*PEPTIDE*`
pub const BOUNDARY_MARKER: char = '*';

/// Peptide sequence whose first and last characters are boundary markers.
///
/// Boundary markers are not residues, but they occupy positions `0` and
/// `len() - 1` of every residue-indexed array
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Sequence {
    residues: Vec<char>,
}

impl Sequence {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let residues = s.as_ref().chars().collect::<Vec<_>>();
        match (residues.first(), residues.last()) {
            (Some(&BOUNDARY_MARKER), Some(&BOUNDARY_MARKER)) if residues.len() >= 2 => {}
            _ => log::warn!(
                "sequence `{}` is not flanked by `{}` - first and last characters are still treated as boundaries",
                s.as_ref(),
                BOUNDARY_MARKER
            ),
        }
        Self { residues }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<char> {
        self.residues.get(position).copied()
    }

    pub fn is_boundary(&self, position: usize) -> bool {
        position == 0 || position + 1 == self.residues.len()
    }

    /// 1-based label used for row names: `"3 (E)"`, or `None` past the end
    pub fn position_label(&self, position: usize) -> Option<String> {
        let residue = self.get(position)?;
        Some(format!("{} ({})", position + 1, residue))
    }

    /// Label counting from the C-terminal end: `"N - p (residue)"`, or `None`
    /// past the end
    pub fn reverse_label(&self, position: usize) -> Option<String> {
        let residue = self.get(position)?;
        Some(format!("{} ({})", self.residues.len() - position, residue))
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in &self.residues {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn boundaries() {
        let seq = Sequence::new("*AB*");
        assert_eq!(seq.len(), 4);
        assert!(seq.is_boundary(0));
        assert!(!seq.is_boundary(1));
        assert!(!seq.is_boundary(2));
        assert!(seq.is_boundary(3));
        assert_eq!(seq.to_string(), "*AB*");
    }

    #[test]
    fn labels() {
        let seq = Sequence::new("*DAEF*");
        assert_eq!(seq.position_label(0).unwrap(), "1 (*)");
        assert_eq!(seq.position_label(2).unwrap(), "3 (A)");
        assert_eq!(seq.reverse_label(0).unwrap(), "6 (*)");
        assert_eq!(seq.reverse_label(5).unwrap(), "1 (*)");
    }

    #[test]
    fn labels_past_the_end() {
        let seq = Sequence::new("*DAEF*");
        assert_eq!(seq.position_label(6), None);
        assert_eq!(seq.reverse_label(6), None);
        assert_eq!(seq.reverse_label(usize::MAX), None);
        assert_eq!(Sequence::new("").position_label(0), None);
    }

    #[test]
    fn unmarked_sequence_still_has_boundaries() {
        let seq = Sequence::new("PEPTIDE");
        assert!(seq.is_boundary(0));
        assert!(seq.is_boundary(6));
        assert_eq!(seq.get(1), Some('E'));
    }
}
