use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;
use crate::identity::ComponentId;
use crate::temporal::EffectiveTime;

/// Namespace under which stamp identities are derived from their tuples.
const STAMP_NAMESPACE: Uuid = uuid::uuid!("7e43a9d2-18c5-4f60-b9d7-5a2e5c6f8b10");

/// Lifecycle state of a component version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    Active,
    Inactive,
}

impl Lifecycle {
    /// Resolve a release-file state flag: `"1"` is active, `"0"` is inactive.
    ///
    /// Anything else fails with [`TypeError::UnknownStateFlag`]. This is a
    /// hard stop, not a recoverable default.
    pub fn from_flag(flag: &str) -> Result<Self, TypeError> {
        match flag {
            "1" => Ok(Self::Active),
            "0" => Ok(Self::Inactive),
            other => Err(TypeError::UnknownStateFlag(other.to_owned())),
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// The version-context tuple attached to every content record.
///
/// Records created within one transaction with an equal tuple share a single
/// issued [`Stamp`]; the transaction owns that deduplication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StampKey {
    pub state: Lifecycle,
    pub time: EffectiveTime,
    pub author: ComponentId,
    pub module: ComponentId,
    pub path: ComponentId,
}

/// An issued version stamp: a [`StampKey`] plus its derived identity.
///
/// The identity is a pure function of the tuple, so storage backends treat
/// equal tuples as the same version context regardless of which transaction
/// issued them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stamp {
    id: ComponentId,
    key: StampKey,
}

impl Stamp {
    /// Issue a stamp for a tuple. Deterministic; equal keys yield equal stamps.
    pub fn for_key(key: StampKey) -> Self {
        let material = format!(
            "{}|{}|{}|{}|{}",
            if key.state.is_active() { 1 } else { 0 },
            key.time.epoch_ms(),
            key.author.as_uuid(),
            key.module.as_uuid(),
            key.path.as_uuid(),
        );
        Self {
            id: ComponentId::from_uuid(Uuid::new_v5(&STAMP_NAMESPACE, material.as_bytes())),
            key,
        }
    }

    pub const fn id(&self) -> ComponentId {
        self.id
    }

    pub const fn key(&self) -> &StampKey {
        &self.key
    }

    pub const fn state(&self) -> Lifecycle {
        self.key.state
    }

    pub const fn time(&self) -> EffectiveTime {
        self.key.time
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {}", self.id.short_id(), self.key.state, self.key.time)
    }
}
