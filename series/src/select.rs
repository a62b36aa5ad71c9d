use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::extract::SeriesSpec;

/// One of the three phases of a feeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    R,
    Y,
    B,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::R, Phase::Y, Phase::B];

    /// Suffix of the current columns of this phase.
    pub fn column_suffix(&self) -> &'static str {
        match self {
            Phase::R => "R_Current",
            Phase::Y => "Y_Current",
            Phase::B => "B_Current",
        }
    }

    /// Current column of this phase for the unit `group`.
    pub fn column(&self, group: &str) -> String {
        format!("{group}_{}", self.column_suffix())
    }
}

/// Which sub-series of every group should be displayed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    #[default]
    All,
    Only(Phase),
}

impl Selector {
    pub const CHOICES: [Selector; 4] = [
        Selector::Only(Phase::R),
        Selector::Only(Phase::Y),
        Selector::Only(Phase::B),
        Selector::All,
    ];

    pub fn phases(&self) -> &'static [Phase] {
        match self {
            Selector::All => &Phase::ALL,
            Selector::Only(Phase::R) => &[Phase::R],
            Selector::Only(Phase::Y) => &[Phase::Y],
            Selector::Only(Phase::B) => &[Phase::B],
        }
    }

    /// One direct projection per group, holding the selected phases in R, Y, B order.
    pub fn specs<S: AsRef<str>>(&self, groups: &[S]) -> Vec<SeriesSpec> {
        groups
            .iter()
            .map(|group| {
                let group = group.as_ref();
                SeriesSpec::direct(
                    group,
                    self.phases().iter().map(|phase| phase.column(group)),
                )
            })
            .collect()
    }

    /// The current columns of every group for the selected phases.
    pub fn columns<S: AsRef<str>>(&self, groups: &[S]) -> Vec<String> {
        groups
            .iter()
            .flat_map(|group| {
                self.phases()
                    .iter()
                    .map(move |phase| phase.column(group.as_ref()))
            })
            .collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Selector::All => "All Currents",
            Selector::Only(Phase::R) => "R Current",
            Selector::Only(Phase::Y) => "Y Current",
            Selector::Only(Phase::B) => "B Current",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("All"),
            Selector::Only(phase) => f.write_str(phase.column_suffix()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown selector `{0}`, expected one of R_Current, Y_Current, B_Current or All")]
pub struct UnknownSelector(pub String);

impl FromStr for Selector {
    type Err = UnknownSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(Selector::All),
            "R_Current" => Ok(Selector::Only(Phase::R)),
            "Y_Current" => Ok(Selector::Only(Phase::Y)),
            "B_Current" => Ok(Selector::Only(Phase::B)),
            other => Err(UnknownSelector(other.to_string())),
        }
    }
}
