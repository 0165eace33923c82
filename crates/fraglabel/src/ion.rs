use serde::{Deserialize, Serialize};

use crate::matrix::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    A,
    B,
    C,
    X,
    Y,
    Z,
}

/// Neutral loss (or gain) annotated on a fragment ion
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Modification {
    None,
    LossNH3,
    LossH2O,
    GainH2O,
}

/// Which end of the peptide backbone a fragment series retains
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Terminus {
    N,
    C,
}

/// A fragment ion identity as annotated in the input table, e.g. `y-H2O`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct IonLabel {
    pub kind: Kind,
    pub modification: Modification,
}

const MODIFICATIONS: [Modification; 4] = [
    Modification::None,
    Modification::LossNH3,
    Modification::LossH2O,
    Modification::GainH2O,
];

const fn series(kinds: [Kind; 3]) -> [IonLabel; 12] {
    let mut out = [IonLabel::new(Kind::A, Modification::None); 12];
    let mut i = 0;
    while i < 12 {
        out[i] = IonLabel::new(kinds[i / 4], MODIFICATIONS[i % 4]);
        i += 1;
    }
    out
}

/// N-terminal half of the catalog, in grid column order
pub const N_IONS: [IonLabel; 12] = series([Kind::A, Kind::B, Kind::C]);
/// C-terminal half of the catalog, in grid column order
pub const C_IONS: [IonLabel; 12] = series([Kind::X, Kind::Y, Kind::Z]);

impl Kind {
    pub fn terminus(self) -> Terminus {
        match self {
            Kind::A | Kind::B | Kind::C => Terminus::N,
            Kind::X | Kind::Y | Kind::Z => Terminus::C,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Kind::A => "a",
            Kind::B => "b",
            Kind::C => "c",
            Kind::X => "x",
            Kind::Y => "y",
            Kind::Z => "z",
        }
    }
}

impl Modification {
    fn suffix(self) -> &'static str {
        match self {
            Modification::None => "",
            Modification::LossNH3 => "-NH3",
            Modification::LossH2O => "-H2O",
            Modification::GainH2O => "+H2O",
        }
    }
}

impl Terminus {
    /// Catalog entries belonging to this terminus, in column order
    pub fn ions(self) -> &'static [IonLabel] {
        match self {
            Terminus::N => &N_IONS,
            Terminus::C => &C_IONS,
        }
    }

    /// C-terminal fragments are numbered from the opposite end of the peptide
    pub fn direction(self) -> Direction {
        match self {
            Terminus::N => Direction::Forward,
            Terminus::C => Direction::Reverse,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Terminus::N => "n-terminal",
            Terminus::C => "c-terminal",
        }
    }
}

impl IonLabel {
    pub const fn new(kind: Kind, modification: Modification) -> Self {
        Self { kind, modification }
    }

    pub fn terminus(&self) -> Terminus {
        self.kind.terminus()
    }
}

impl std::fmt::Display for IonLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind.symbol(), self.modification.suffix())
    }
}

/// Returned when an ion annotation is not part of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIon(pub String);

impl std::fmt::Display for UnknownIon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown ion type `{}`", self.0)
    }
}

impl std::error::Error for UnknownIon {}

impl std::str::FromStr for IonLabel {
    type Err = UnknownIon;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        N_IONS
            .iter()
            .chain(C_IONS.iter())
            .find(|ion| {
                let (symbol, suffix) = (ion.kind.symbol(), ion.modification.suffix());
                s.len() == symbol.len() + suffix.len()
                    && s.starts_with(symbol)
                    && s.ends_with(suffix)
            })
            .copied()
            .ok_or_else(|| UnknownIon(s.into()))
    }
}
