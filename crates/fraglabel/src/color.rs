use serde::Serialize;

/// Green/blue channel assigned to every residue when all evidence values are equal
pub const DEGENERATE_CHANNEL: f64 = 127.5;

/// Directive for a green/blue channel value, e.g. `color [255, 127.5, 127.5]`
pub fn color_directive(channel: f64) -> String {
    format!("color [255, {}, {}]", channel, channel)
}

/// Min-max normalized red/white heat ramp over per-residue evidence.
///
/// Each present value maps to `color [255, g, g]` with `g` in `[0, 255]`:
/// the least supported residue is pure red, the best supported one white
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ColorMap {
    /// Green and blue channel for each position, `None` without evidence
    pub channels: Vec<Option<f64>>,
    pub lo: Option<f64>,
    pub hi: Option<f64>,
}

impl ColorMap {
    pub fn build<I>(evidence: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let evidence = evidence.into_iter().collect::<Vec<_>>();
        let (lo, hi) = evidence
            .iter()
            .flatten()
            .fold((None, None), |(lo, hi): (Option<f64>, Option<f64>), &x| {
                (
                    Some(lo.map_or(x, |lo| lo.min(x))),
                    Some(hi.map_or(x, |hi| hi.max(x))),
                )
            });

        let channels = evidence
            .iter()
            .map(|value| {
                let (value, lo, hi) = (value.as_ref()?, lo?, hi?);
                match hi - lo == 0.0 {
                    true => Some(DEGENERATE_CHANNEL),
                    false => Some(255.0 * (value - lo) / (hi - lo)),
                }
            })
            .collect::<Vec<_>>();

        if lo.is_some() && lo == hi {
            log::warn!(
                "all residues have identical evidence, coloring them with channel value {}",
                DEGENERATE_CHANNEL
            );
        }

        Self { channels, lo, hi }
    }

    /// Color directive for a position, or `None` without evidence
    pub fn directive(&self, position: usize) -> Option<String> {
        self.channels
            .get(position)
            .copied()
            .flatten()
            .map(color_directive)
    }

    /// Selection script: a `select` line and a color directive for each
    /// position, 1-based, in position order
    pub fn script(&self) -> String {
        let mut script = String::new();
        for position in 0..self.channels.len() {
            script.push_str(&format!("select {}\n", position + 1));
            match self.directive(position) {
                Some(directive) => script.push_str(&directive),
                None => script.push_str(crate::MISSING),
            }
            script.push('\n');
        }
        script
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalization() {
        let map = ColorMap::build(vec![None, Some(10.0), Some(30.0), Some(20.0), None]);
        assert_eq!(map.lo, Some(10.0));
        assert_eq!(map.hi, Some(30.0));
        assert_eq!(
            map.channels,
            vec![None, Some(0.0), Some(255.0), Some(127.5), None]
        );
        assert_eq!(map.directive(1).unwrap(), "color [255, 0, 0]");
        assert_eq!(map.directive(2).unwrap(), "color [255, 255, 255]");
        assert_eq!(map.directive(0), None);
    }

    #[test]
    fn degenerate_range() {
        let map = ColorMap::build(vec![None, Some(4.0), Some(4.0), None]);
        assert_eq!(
            map.channels,
            vec![None, Some(DEGENERATE_CHANNEL), Some(DEGENERATE_CHANNEL), None]
        );
        assert!(map.channels.iter().flatten().all(|x| x.is_finite()));
    }

    #[test]
    fn no_evidence() {
        let map = ColorMap::build(vec![None, None, None]);
        assert_eq!(map.lo, None);
        assert!(map.channels.iter().all(Option::is_none));
        assert_eq!(map.script(), "select 1\n---\nselect 2\n---\nselect 3\n---\n");
    }

    #[test]
    fn script() {
        let map = ColorMap::build(vec![Some(1.0), None, Some(3.0)]);
        let script = map.script();
        assert_eq!(
            script,
            "select 1\ncolor [255, 0, 0]\nselect 2\n---\nselect 3\ncolor [255, 255, 255]\n"
        );
        assert_eq!(script.matches("select ").count(), 3);
    }
}
