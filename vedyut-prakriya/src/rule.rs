//! A single sūtra as registered content: the filter window it looks
//! through, the operator it fires, and the modifier that governs how
//! conflicting options are resolved (spec §4.4, §4.6).

use crate::filter::{Filter, Rank};
use crate::operator::Operator;
use crate::state::State;
use crate::term::Locus;
use compact_str::CompactString;

pub type RuleId = u32;

/// Which term in the three-term window (previous, current, next) the
/// operator is applied to. Most rules target `Current`; a handful of
/// sandhi-adjacent and āgama rules target a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSlot {
    Previous,
    Current,
    Next,
}

/// How a rule's application interacts with the rest of the derivation.
/// The optional variants (`Anyatarasyam`, `Va`, `Vibhasha`, `Artha`,
/// `Opinion`) all fork the derivation into an applied and an unapplied
/// branch; they differ in the grammatical commentary that names who
/// holds the option, which doesn't change engine behavior, so they
/// share one code path (`Modifier::is_optional`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Plain,
    /// A prohibition: blocks a rule it targets rather than firing an
    /// operator of its own.
    Na,
    /// Obligatory even where an ancestor rule introduced optionality.
    Nityam,
    Anyatarasyam,
    Va,
    Vibhasha,
    Artha,
    Opinion,
}

impl Modifier {
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Modifier::Anyatarasyam
                | Modifier::Va
                | Modifier::Vibhasha
                | Modifier::Artha
                | Modifier::Opinion
        )
    }

    pub fn is_prohibition(self) -> bool {
        matches!(self, Modifier::Na)
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) id: RuleId,
    pub name: CompactString,
    pub description: CompactString,
    pub previous: Filter,
    pub current: Filter,
    pub next: Filter,
    pub operator: Operator,
    pub target: WindowSlot,
    pub modifier: Modifier,
    /// Which value-stack layer the operator writes (spec §3 "Rule",
    /// §4.4). Defaults to `Value`, the layer most rules write; a rule
    /// belonging to the asiddhavat or asiddha sub-domains overrides
    /// this with `.writing(Locus::Asiddhavat)` / `.writing(Locus::Asiddha)`.
    pub locus: Locus,
    pub(crate) rank: Rank,
    /// Every more general rule this one overrides as an apavāda, found
    /// by the registry's inference pass (spec §4.6). A rule can
    /// generalize more than one apavāda condition at once, hence a list
    /// rather than a single slot.
    pub(crate) utsargas: Vec<RuleId>,
    /// Rules that treat `self` as one of their utsargas.
    pub(crate) apavadas: Vec<RuleId>,
}

impl Rule {
    pub fn new(name: &str, current: Filter, operator: Operator) -> Self {
        let rank = current.rank();
        Rule {
            id: 0,
            name: CompactString::from(name),
            description: CompactString::new(""),
            previous: Filter::AllowAll,
            current,
            next: Filter::AllowAll,
            operator,
            target: WindowSlot::Current,
            modifier: Modifier::Plain,
            locus: Locus::Value,
            rank,
            utsargas: Vec::new(),
            apavadas: Vec::new(),
        }
    }

    #[must_use]
    pub fn described(mut self, description: &str) -> Self {
        self.description = CompactString::from(description);
        self
    }

    #[must_use]
    pub fn when_previous(mut self, previous: Filter) -> Self {
        self.previous = previous;
        self.recompute_rank();
        self
    }

    #[must_use]
    pub fn when_next(mut self, next: Filter) -> Self {
        self.next = next;
        self.recompute_rank();
        self
    }

    #[must_use]
    pub fn targeting(mut self, target: WindowSlot) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn modified(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    #[must_use]
    pub fn writing(mut self, locus: Locus) -> Self {
        self.locus = locus;
        self
    }

    fn recompute_rank(&mut self) {
        let mut rank = self.current.rank();
        let prev = self.previous.rank();
        let next = self.next.rank();
        rank.gana += prev.gana + next.gana;
        rank.samjna += prev.samjna + next.samjna;
        rank.literal += prev.literal + next.literal;
        rank.sound += prev.sound + next.sound;
        rank.sound_narrowness += prev.sound_narrowness + next.sound_narrowness;
        self.rank = rank;
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn utsargas(&self) -> &[RuleId] {
        &self.utsargas
    }

    pub fn apavadas(&self) -> &[RuleId] {
        &self.apavadas
    }

    /// Absolute index of the target term, given the position `index`
    /// the rule's `current` filter matched at.
    pub fn target_index(&self, index: usize) -> usize {
        match self.target {
            WindowSlot::Previous => index.wrapping_sub(1),
            WindowSlot::Current => index,
            WindowSlot::Next => index + 1,
        }
    }

    /// True iff this rule's three-term window matches the state at
    /// `index` (the `current` slot). A window slot with no
    /// corresponding term (there is no term before the first, or after
    /// the last) only matches if the rule left that slot at its
    /// default `AllowAll`.
    pub fn matches(&self, state: &State, index: usize) -> bool {
        let current_ok = state
            .get(index)
            .is_some_and(|t| self.current.matches(t));
        if !current_ok {
            return false;
        }
        let previous_ok = match index.checked_sub(1).and_then(|i| state.get(i)) {
            Some(t) => self.previous.matches(t),
            None => self.previous == Filter::AllowAll,
        };
        if !previous_ok {
            return false;
        }
        match state.get(index + 1) {
            Some(t) => self.next.matches(t),
            None => self.next == Filter::AllowAll,
        }
    }
}
