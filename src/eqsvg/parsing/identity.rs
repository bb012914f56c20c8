//! Stable equation identity
//!
//!     Re-parsing a document must not invalidate state keyed by equation id (selection,
//!     cached renders). Each new section looks for its predecessor in the previous parse
//!     result:
//!
//!         1. An explicit label matches a previous equation with the same label.
//!         2. Otherwise (or if no label matched) the color-rewritten latex must be equal.
//!         3. Otherwise a fresh id is minted.
//!
//!     Matching is first-match over the previous list, not multiset-aware. When bodies are
//!     duplicated or edited into each other, an equation can take over the id that used to
//!     belong to a different one. Ids already handed out in the current parse are skipped,
//!     so ids stay unique within a document.

use std::collections::HashSet;

use crate::eqsvg::document::{Equation, EquationId};

pub struct IdentityMatcher<'p> {
    previous: &'p [Equation],
    claimed: HashSet<EquationId>,
}

impl<'p> IdentityMatcher<'p> {
    pub fn new(previous: &'p [Equation]) -> Self {
        Self {
            previous,
            claimed: HashSet::new(),
        }
    }

    pub fn assign(&mut self, explicit_label: Option<&str>, latex: &str) -> EquationId {
        let by_label = explicit_label.and_then(|label| self.first_unclaimed(|eq| eq.label == label));
        let matched = by_label.or_else(|| self.first_unclaimed(|eq| eq.latex == latex));

        let id = match matched {
            Some(id) => {
                tracing::debug!(%id, "reusing equation id");
                id
            }
            None => EquationId::generate(),
        };
        self.claimed.insert(id.clone());
        id
    }

    fn first_unclaimed(&self, predicate: impl Fn(&Equation) -> bool) -> Option<EquationId> {
        self.previous
            .iter()
            .filter(|eq| !self.claimed.contains(&eq.id))
            .find(|&eq| predicate(eq))
            .map(|eq| eq.id.clone())
    }
}
