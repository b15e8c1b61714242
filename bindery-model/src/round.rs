//! Round views handed to the coordinator.

use indexmap::IndexMap;

use crate::Element;

/// Read-only view of one compilation round.
///
/// A view is only valid for the duration of the round it describes.
pub trait RoundEnv {
    /// 1-based round number.
    fn number(&self) -> usize;

    /// Elements newly introduced in this round.
    fn root_elements(&self) -> &[Element];

    /// Look up any element known to the compilation so far by name.
    fn lookup(&self, name: &str) -> Option<&Element>;

    /// Every element known to the compilation so far, earlier rounds first.
    fn visible_elements(&self) -> Vec<&Element>;

    /// Whether the host will issue no further rounds.
    fn is_last(&self) -> bool;

    /// Root elements carrying the given marker, in declaration order.
    fn annotated_with(&self, marker: &str) -> Vec<&Element> {
        self.root_elements()
            .iter()
            .filter(|e| e.has_annotation(marker))
            .collect()
    }
}

/// A concrete round produced by a [`Session`].
#[derive(Debug, Clone)]
pub struct Round {
    number: usize,
    roots: Vec<Element>,
    visible: IndexMap<String, Element>,
    last: bool,
}

impl Round {
    /// A standalone round whose visible set is exactly its roots.
    pub fn new(number: usize, roots: Vec<Element>) -> Self {
        let visible = roots
            .iter()
            .map(|e| (e.display_name(), e.clone()))
            .collect();
        Self {
            number,
            roots,
            visible,
            last: false,
        }
    }

    /// Flag this round as the final one.
    pub fn last(mut self) -> Self {
        self.last = true;
        self
    }
}

impl RoundEnv for Round {
    fn number(&self) -> usize {
        self.number
    }

    fn root_elements(&self) -> &[Element] {
        &self.roots
    }

    fn lookup(&self, name: &str) -> Option<&Element> {
        self.visible.get(name)
    }

    fn visible_elements(&self) -> Vec<&Element> {
        self.visible.values().collect()
    }

    fn is_last(&self) -> bool {
        self.last
    }
}

/// Host-side sequence of rounds for one compilation.
///
/// Elements introduced in earlier rounds stay visible to lookups in later
/// rounds, while only the new ones are reported as roots.
#[derive(Debug, Default)]
pub struct Session {
    known: IndexMap<String, Element>,
    rounds: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next round from the elements it introduces.
    pub fn round(&mut self, roots: Vec<Element>, last: bool) -> Round {
        self.rounds += 1;
        for element in &roots {
            self.known.insert(element.display_name(), element.clone());
        }
        Round {
            number: self.rounds,
            roots,
            visible: self.known.clone(),
            last,
        }
    }

    /// Number of rounds issued so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}
