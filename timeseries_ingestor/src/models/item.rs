use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifier of a tradable item on the prices API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(NonZeroU32);

impl ItemId {
    pub const fn new(id: NonZeroU32) -> Self {
        Self(id)
    }

    /// Returns `None` for zero.
    pub const fn from_u32(id: u32) -> Option<Self> {
        match NonZeroU32::new(id) {
            Some(nz) => Some(Self(nz)),
            None => None,
        }
    }

    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<NonZeroU32>().map(Self)
    }
}
