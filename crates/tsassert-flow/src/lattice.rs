//! The Clean/Dirty/Escaped lattice (§3 "Dataflow Fact").
//!
//! `Clean` immediately follows a successful validator or a
//! `JSON.parse`-as-T result. `Dirty` is the conservative default - top
//! of the lattice for merges and for anything the analyzer can't prove
//! better about. `Escaped` marks a value that left local control (an
//! opaque call, a mutable external store) without yet being observed
//! again; an `await` following an escape demotes it back to `Dirty`
//! rather than restoring `Clean`, since an external holder may have
//! mutated it while we were suspended.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fact {
    Clean,
    Dirty,
    Escaped,
}

impl Fact {
    /// Ordering used for control-flow-merge joins: the more pessimistic
    /// fact always wins, so neither branch of a conditional can make the
    /// merged state look safer than its least-safe arm.
    fn rank(self) -> u8 {
        match self {
            Fact::Clean => 0,
            Fact::Dirty => 1,
            Fact::Escaped => 2,
        }
    }

    #[must_use]
    pub fn join(self, other: Fact) -> Fact {
        if self.rank() >= other.rank() {
            self
        } else {
            other
        }
    }

    #[must_use]
    pub fn is_clean(self) -> bool {
        matches!(self, Fact::Clean)
    }
}

#[cfg(test)]
#[path = "tests/lattice.rs"]
mod tests;
