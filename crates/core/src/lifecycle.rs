//! Status lifecycles.
//!
//! Re-applying the current state is always accepted and reported as
//! [`Transition::Unchanged`]; it is never a conflict.

use core::fmt::Debug;

use crate::{DomainError, DomainResult};

pub trait Lifecycle: Copy + Eq + Debug {
    /// Whether `self -> to` is a legal move. Not consulted when `self == to`.
    fn allows(self, to: Self) -> bool;

    fn as_str(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    Unchanged,
    Moved { from: S, to: S },
}

impl<S> Transition<S> {
    pub fn is_move(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

pub fn transition<S: Lifecycle>(from: S, to: S) -> DomainResult<Transition<S>> {
    if from == to {
        return Ok(Transition::Unchanged);
    }
    if from.allows(to) {
        Ok(Transition::Moved { from, to })
    } else {
        Err(DomainError::invalid_argument(format!(
            "invalid status transition: {} -> {}",
            from.as_str(),
            to.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Open,
        Shut,
        Welded,
    }

    impl Lifecycle for Door {
        fn allows(self, to: Self) -> bool {
            matches!((self, to), (Door::Open, Door::Shut) | (Door::Shut, Door::Welded))
        }

        fn as_str(self) -> &'static str {
            match self {
                Door::Open => "open",
                Door::Shut => "shut",
                Door::Welded => "welded",
            }
        }
    }

    #[test]
    fn same_state_is_unchanged() {
        assert_eq!(transition(Door::Welded, Door::Welded).unwrap(), Transition::Unchanged);
    }

    #[test]
    fn legal_move_is_reported() {
        let t = transition(Door::Open, Door::Shut).unwrap();
        assert!(t.is_move());
    }

    #[test]
    fn illegal_move_names_both_states() {
        let err = transition(Door::Welded, Door::Open).unwrap_err();
        assert_eq!(
            err,
            DomainError::invalid_argument("invalid status transition: welded -> open")
        );
    }
}
