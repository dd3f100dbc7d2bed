//! A `GameState` is an immutable snapshot of one point in a game. Every
//! operation (drawing a card, playing a land, casting a spell) builds new
//! snapshots instead of mutating, and branching operations return a
//! `StateSet` with one member per legal choice. The set collapses duplicate
//! positions, which is what keeps exhaustive search tractable: two lines
//! that arrive at the same board are explored once.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::card::{Card, Cards, EntersTapped, UnknownCard};
use crate::effect;
use crate::mana::Mana;
use crate::search::meter;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("search overflow after {states} states in {elapsed_ms}ms")]
    Overflow { states: u64, elapsed_ms: u128 },
    #[error("no {kind} handler for {card}")]
    MissingHandler { kind: &'static str, card: &'static str },
    #[error("{card} is not a land")]
    NotALand { card: &'static str },
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error(transparent)]
    UnknownCard(#[from] UnknownCard),
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) deck_list: Arc<Vec<Card>>,
    pub(crate) deck_index: usize,
    pub(crate) hand: Cards,
    pub(crate) battlefield: Cards,
    pub(crate) mana_pool: Mana,
    pub(crate) mana_debt: Mana,
    pub(crate) suspended: Vec<(Card, u8)>,
    pub(crate) turn: u32,
    pub(crate) land_drops: u32,
    pub(crate) spells_cast: u32,
    pub(crate) on_the_play: bool,
    pub(crate) done: bool,
    pub(crate) overflowed: bool,
    pub(crate) notes: Arc<String>,
}

// `notes` is narrative and `deck_list` is fixed up to grabbed copies, so
// neither may keep equivalent positions apart.
impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.deck_index == other.deck_index
            && self.turn == other.turn
            && self.land_drops == other.land_drops
            && self.spells_cast == other.spells_cast
            && self.on_the_play == other.on_the_play
            && self.done == other.done
            && self.overflowed == other.overflowed
            && self.mana_pool == other.mana_pool
            && self.mana_debt == other.mana_debt
            && self.hand == other.hand
            && self.battlefield == other.battlefield
            && self.suspended == other.suspended
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.deck_index.hash(hasher);
        self.turn.hash(hasher);
        self.land_drops.hash(hasher);
        self.spells_cast.hash(hasher);
        self.on_the_play.hash(hasher);
        self.done.hash(hasher);
        self.overflowed.hash(hasher);
        self.mana_pool.hash(hasher);
        self.mana_debt.hash(hasher);
        self.hand.hash(hasher);
        self.battlefield.hash(hasher);
        self.suspended.hash(hasher);
    }
}

impl GameState {
    pub fn new(deck: Vec<Card>, on_the_play: bool, reset_clock: bool) -> GameState {
        if reset_clock {
            meter::reset();
        } else {
            meter::tick();
        }
        let notes = if on_the_play {
            "[on the play]"
        } else {
            "[on the draw]"
        };
        GameState {
            deck_list: Arc::new(deck),
            deck_index: 0,
            hand: Cards::new(),
            battlefield: Cards::new(),
            mana_pool: Mana::default(),
            mana_debt: Mana::default(),
            suspended: Vec::new(),
            turn: 0,
            land_drops: 0,
            spells_cast: 0,
            on_the_play,
            done: false,
            overflowed: false,
            notes: Arc::new(notes.to_string()),
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn on_the_play(&self) -> bool {
        self.on_the_play
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn hand(&self) -> &Cards {
        &self.hand
    }

    pub fn battlefield(&self) -> &Cards {
        &self.battlefield
    }

    pub fn mana_pool(&self) -> Mana {
        self.mana_pool
    }

    pub fn mana_debt(&self) -> Mana {
        self.mana_debt
    }

    pub fn spells_cast(&self) -> u32 {
        self.spells_cast
    }

    pub fn land_drops(&self) -> u32 {
        self.land_drops
    }

    pub fn suspended(&self) -> &[(Card, u8)] {
        &self.suspended
    }

    /// The one way to derive a new snapshot from an old one; counts against
    /// the global search meter.
    fn derived(&self) -> GameState {
        meter::tick();
        self.clone()
    }

    /// Appends to the play trace. Entries run together with commas; a note
    /// starting with a newline opens a fresh line (the turn markers).
    pub fn note(&self, text: &str) -> GameState {
        let mut next = self.derived();
        let mut notes = String::with_capacity(self.notes.len() + text.len() + 2);
        notes.push_str(&self.notes);
        if !notes.is_empty() && !text.starts_with('\n') {
            notes.push_str(", ");
        }
        notes.push_str(text);
        next.notes = Arc::new(notes);
        next
    }

    /// Terminal bail-out flag; set by the search manager when the meter trips.
    pub fn overflow(&self) -> GameState {
        let mut next = self.note("search overflowed");
        next.overflowed = true;
        next
    }

    pub(crate) fn win(&self) -> GameState {
        let mut next = self.derived();
        next.done = true;
        next
    }

    // ---- resource moves ----------------------------------------------

    pub fn draw(&self, count: usize) -> GameState {
        let take = count.min(self.deck_list.len() - self.deck_index);
        let mut next = self.derived();
        for offset in 0..take {
            next.hand = next.hand.with(self.deck_list[self.deck_index + offset]);
        }
        next.deck_index += take;
        next
    }

    /// Like `draw` but the trace records what was seen.
    pub(crate) fn draw_noted(&self, count: usize) -> GameState {
        let take = count.min(self.deck_list.len() - self.deck_index);
        if take == 0 {
            return self.derived();
        }
        let seen: Cards = self.top(take).iter().copied().collect();
        self.note(&format!("draw {seen}")).draw(take)
    }

    pub fn mill(&self, count: usize) -> GameState {
        let take = count.min(self.deck_list.len() - self.deck_index);
        let mut next = self.derived();
        next.deck_index += take;
        next
    }

    /// Peeks at the next `count` cards without moving them.
    pub fn top(&self, count: usize) -> &[Card] {
        let end = (self.deck_index + count).min(self.deck_list.len());
        &self.deck_list[self.deck_index..end]
    }

    /// The undrawn portion of the deck as a multiset.
    pub(crate) fn remaining(&self) -> Cards {
        self.deck_list[self.deck_index..].iter().copied().collect()
    }

    // ---- mana moves --------------------------------------------------

    pub fn add_mana(&self, mana: Mana) -> GameState {
        let mut next = self.derived();
        next.mana_pool = next.mana_pool + mana;
        next
    }

    pub(crate) fn add_mana_debt(&self, mana: Mana) -> GameState {
        let mut next = self.derived();
        next.mana_debt = next.mana_debt + mana;
        next
    }

    /// One successor per legal residue; empty when the cost can't be paid.
    pub fn pay(&self, cost: Mana, note: &str) -> StateSet {
        let mut out = StateSet::new();
        for residue in self.mana_pool.minus(cost) {
            let mut next = if note.is_empty() {
                self.derived()
            } else {
                self.note(note)
            };
            next.mana_pool = residue;
            out.insert(next);
        }
        out
    }

    /// One successor per mana option of the card; identity for cards that
    /// don't tap for mana.
    pub fn tap(&self, card: Card) -> StateSet {
        match card.taps_for() {
            Some(options) => options.into_iter().map(|mana| self.add_mana(mana)).collect(),
            None => StateSet::from(self.derived()),
        }
    }

    /// Accumulates every distinct pool reachable by tapping the whole
    /// battlefield.
    pub fn tap_out(&self) -> StateSet {
        let mut pools = FxHashSet::default();
        pools.insert(self.mana_pool);
        for card in self.battlefield.iter() {
            if let Some(options) = card.taps_for() {
                let mut expanded = FxHashSet::default();
                for pool in pools.iter() {
                    for option in options.iter() {
                        expanded.insert(*pool + *option);
                    }
                }
                pools = expanded;
            }
        }
        pools
            .into_iter()
            .map(|pool| {
                let mut next = self.derived();
                next.mana_pool = pool;
                next
            })
            .collect()
    }

    // ---- zone moves --------------------------------------------------

    pub(crate) fn to_battlefield(&self, card: Card) -> GameState {
        let mut next = self.derived();
        next.battlefield = next.battlefield.with(card);
        next
    }

    pub(crate) fn without_hand(&self, card: Card) -> Option<GameState> {
        let hand = self.hand.without(card)?;
        let mut next = self.derived();
        next.hand = hand;
        Some(next)
    }

    pub(crate) fn add_land_drops(&self, count: u32) -> GameState {
        let mut next = self.derived();
        next.land_drops += count;
        next
    }

    pub(crate) fn suspend(&self, card: Card, counters: u8) -> GameState {
        let mut next = self.derived();
        next.suspended.push((card, counters.max(1)));
        next.suspended.sort();
        next
    }

    pub(crate) fn play_tapped(&self, card: Card) -> Result<StateSet, GameError> {
        self.land_enters(card, true)
    }

    pub(crate) fn play_untapped(&self, card: Card) -> Result<StateSet, GameError> {
        self.land_enters(card, false)
    }

    /// A land arrives on the battlefield. A tapped land still produces mana
    /// once per Amulet of Vigor already in play; an untapped one taps
    /// immediately, since nothing in this model waits to spend mana.
    fn land_enters(&self, card: Card, tapped: bool) -> Result<StateSet, GameError> {
        let amulets = self.battlefield.count_named("Amulet of Vigor");
        let entered = self.to_battlefield(card);
        let mut states = StateSet::from(entered);
        if tapped {
            for _ in 0..amulets {
                states = states.apply(|state| state.tap(card));
            }
        } else {
            states = states.apply(|state| state.tap(card));
        }
        effect::dispatch_play(states, card)
    }

    /// Plays a land from hand. Errors on non-lands; infeasible attempts
    /// (no drop left, card not in hand) return the empty set.
    pub fn play(&self, card: Card) -> Result<StateSet, GameError> {
        if !card.is_land() {
            return Err(GameError::NotALand { card: card.name() });
        }
        if self.land_drops == 0 {
            return Ok(StateSet::new());
        }
        let hand = match self.hand.without(card) {
            Some(hand) => hand,
            None => return Ok(StateSet::new()),
        };
        let mut next = self.note(&format!("play {card}"));
        next.hand = hand;
        next.land_drops -= 1;
        let tapped = match card.enters_tapped() {
            EntersTapped::No => false,
            EntersTapped::Yes => true,
            EntersTapped::Check => match effect::enters_tapped_check(card.slug()) {
                Some(check) => check(&next),
                None => false,
            },
        };
        if tapped {
            next.play_tapped(card)
        } else {
            next.play_untapped(card)
        }
    }

    // ---- spells ------------------------------------------------------

    /// Casts a spell from hand, branching over payments, then hands off to
    /// the card's mandatory effect handler.
    pub fn cast(&self, card: Card) -> Result<StateSet, GameError> {
        let cost = match card.cost() {
            Some(cost) => cost,
            None => return Ok(StateSet::new()),
        };
        if !self.mana_pool.can_pay(cost) {
            return Ok(StateSet::new());
        }
        let hand = match self.hand.without(card) {
            Some(hand) => hand,
            None => return Ok(StateSet::new()),
        };
        let handler = match effect::cast_handler(card.slug()) {
            Some(handler) => handler,
            None => {
                return Err(GameError::MissingHandler {
                    kind: "cast",
                    card: card.name(),
                })
            }
        };
        let mut next = self.note(&format!("cast {card}"));
        next.hand = hand;
        next.spells_cast += 1;
        next.pay(cost, "").try_apply(|state| handler(state, card))
    }

    /// The card's alternate action: cycling, transmuting, suspending, or a
    /// free casting modality, depending on its cycle verb.
    pub fn cycle(&self, card: Card) -> Result<StateSet, GameError> {
        let cost = match card.cycle_cost() {
            Some(cost) => cost,
            None => return Ok(StateSet::new()),
        };
        if !effect::cycle_available(self, card) {
            return Ok(StateSet::new());
        }
        if !self.mana_pool.can_pay(cost) {
            return Ok(StateSet::new());
        }
        let hand = match self.hand.without(card) {
            Some(hand) => hand,
            None => return Ok(StateSet::new()),
        };
        let mut next = self.note(&format!("{} {}", card.cycle_verb(), card));
        next.hand = hand;
        next.spells_cast += 1;
        let paid = next.pay(cost, "");
        effect::dispatch_cycle(paid, card)
    }

    pub fn sacrifice(&self, card: Card) -> Result<StateSet, GameError> {
        let cost = match card.sacrifice_cost() {
            Some(cost) => cost,
            None => return Ok(StateSet::new()),
        };
        if !self.mana_pool.can_pay(cost) {
            return Ok(StateSet::new());
        }
        let battlefield = match self.battlefield.without(card) {
            Some(battlefield) => battlefield,
            None => return Ok(StateSet::new()),
        };
        let handler = match effect::sacrifice_handler(card.slug()) {
            Some(handler) => handler,
            None => {
                return Err(GameError::MissingHandler {
                    kind: "sacrifice",
                    card: card.name(),
                })
            }
        };
        let mut next = self.note(&format!("sacrifice {card}"));
        next.battlefield = battlefield;
        next.pay(cost, "").try_apply(|state| handler(state, card))
    }

    /// A suspended card resolves: no cost, no hand, straight to its cast
    /// handler.
    pub fn cast_from_suspend(&self, card: Card) -> Result<StateSet, GameError> {
        let handler = match effect::cast_handler(card.slug()) {
            Some(handler) => handler,
            None => {
                return Err(GameError::MissingHandler {
                    kind: "cast",
                    card: card.name(),
                })
            }
        };
        let mut next = self.note(&format!("cast {card} from suspend"));
        next.spells_cast += 1;
        handler(&next, card)
    }

    // ---- combinatorial helpers ---------------------------------------

    /// One successor per distinct way to discard `count` cards out of
    /// `options` from hand.
    pub fn pitch(&self, count: usize, options: &Cards) -> StateSet {
        let mut out = StateSet::new();
        for combo in combinations(options, count) {
            if let Some(hand) = self.hand.without_all(&combo) {
                let mut next = self.note(&format!("pitch {combo}"));
                next.hand = hand;
                out.insert(next);
            }
        }
        out
    }

    /// One successor per land on the battlefield, that land returned to hand.
    pub fn bounce_land(&self) -> StateSet {
        let mut out = StateSet::new();
        for land in self.battlefield.lands(false).unique() {
            if let Some(battlefield) = self.battlefield.without(land) {
                let mut next = self.note(&format!("bounce {land}"));
                next.battlefield = battlefield;
                next.hand = next.hand.with(land);
                out.insert(next);
            }
        }
        out
    }

    /// Two successors: put the top card on the bottom, or leave it.
    pub fn scry(&self, count: usize) -> Result<StateSet, GameError> {
        if count != 1 {
            return Err(GameError::Unsupported(format!("scry {count}")));
        }
        let seen = match self.top(1).first() {
            Some(card) => *card,
            None => return Ok(StateSet::from(self.derived())),
        };
        let mut out = StateSet::from(self.derived());
        out.insert(self.note(&format!("scry {seen} to the bottom")).mill(1));
        Ok(out)
    }

    /// Moves one copy of the card from the undrawn deck to hand. Decks are
    /// multisets, so which physical copy leaves doesn't matter.
    pub fn grab(&self, card: Card) -> StateSet {
        match self.deck_position(card) {
            Some(position) => {
                let mut next = self.note(&format!("grab {card}"));
                next.deck_list = Arc::new(without_index(&self.deck_list, position));
                next.hand = next.hand.with(card);
                StateSet::from(next)
            }
            None => StateSet::new(),
        }
    }

    /// Union of `grab` over every distinct card in `options`.
    pub fn grabs(&self, options: &Cards) -> StateSet {
        let mut out = StateSet::new();
        for card in options.unique() {
            out.extend(self.grab(card));
        }
        out
    }

    /// Moves one copy of a land from the undrawn deck straight onto the
    /// battlefield.
    pub(crate) fn fetch_land(&self, card: Card, tapped: bool) -> Result<StateSet, GameError> {
        match self.deck_position(card) {
            Some(position) => {
                let mut next = self.note(&format!("fetch {card}"));
                next.deck_list = Arc::new(without_index(&self.deck_list, position));
                next.land_enters(card, tapped)
            }
            None => Ok(StateSet::new()),
        }
    }

    fn deck_position(&self, card: Card) -> Option<usize> {
        self.deck_list[self.deck_index..]
            .iter()
            .position(|held| *held == card)
            .map(|offset| self.deck_index + offset)
    }

    // ---- turn end / begin --------------------------------------------

    /// Ends the turn and starts the next one. Prunes positions that can
    /// never win, applies the opponent's kill policy, recounts land drops,
    /// taps out, resolves pre-game and suspended cards, pays stored debt,
    /// and draws.
    pub fn pass_turn(&self) -> Result<StateSet, GameError> {
        // a board with no permanents after turn 1 never gets there
        if self.turn >= 1 && self.battlefield.is_empty() {
            return Ok(StateSet::new());
        }
        // debt due on the upkeep of turn 2 or earlier can't be covered
        if self.turn < 2 && !self.mana_debt.is_zero() {
            return Ok(StateSet::new());
        }

        let mut next = self.derived();
        let killed: Cards = next.battlefield.iter().filter(|card| card.dies()).collect();
        if !killed.is_empty() {
            next = next.note(&format!("opponent kills {killed}"));
            if let Some(survivors) = next.battlefield.without_all(&killed) {
                next.battlefield = survivors;
            }
        }
        next.land_drops = 1
            + 2 * next.battlefield.count_named("Azusa, Lost but Seeking") as u32
            + next.battlefield.count_named("Dryad of the Ilysian Grove") as u32
            + next.battlefield.count_named("Sakura-Tribe Scout") as u32;

        let debt = next.mana_debt;
        next.mana_pool = Mana::default();
        next.mana_debt = Mana::default();
        let entering_turn_one = next.turn == 0;
        next.turn += 1;
        let next = next.note(&format!("\n---- turn {}", next.turn));

        let mut states = next.tap_out();
        if entering_turn_one {
            states = states.apply(|state| state.pre_game_actions());
        }
        states = states.try_apply(|state| state.tick_down())?;
        if !debt.is_zero() {
            states = states.apply(|state| state.pay(debt, &format!("pay {debt} upkeep debt")));
        }
        if !(next.turn == 1 && next.on_the_play) {
            states = states.apply(|state| StateSet::from(state.draw_noted(1)));
        }
        Ok(states)
    }

    /// Gemstone Caverns, before the game even starts: on the draw, pitch any
    /// other card to begin with an extra land in play, or don't.
    fn pre_game_actions(&self) -> StateSet {
        let caverns = Card::named("Gemstone Caverns");
        if self.on_the_play || !self.hand.contains(caverns) {
            return StateSet::from(self.derived());
        }
        let mut out = StateSet::from(self.derived());
        let others = match self.hand.without(caverns) {
            Some(cards) => cards,
            None => return out,
        };
        for branch in self.pitch(1, &others) {
            if let Some(next) = branch.without_hand(caverns) {
                out.insert(
                    next.note("put Gemstone Caverns in play")
                        .to_battlefield(Card::named("Gemstone Mine")),
                );
            }
        }
        out
    }

    /// Every suspended counter drops by one; cards that hit zero resolve.
    fn tick_down(&self) -> Result<StateSet, GameError> {
        if self.suspended.is_empty() {
            return Ok(StateSet::from(self.derived()));
        }
        let mut due = Vec::new();
        let mut next = self.derived();
        next.suspended = self
            .suspended
            .iter()
            .filter_map(|(card, counters)| {
                if *counters <= 1 {
                    due.push(*card);
                    None
                } else {
                    Some((*card, counters - 1))
                }
            })
            .collect();
        let mut states = StateSet::from(next);
        for card in due {
            states = states.try_apply(|state| state.cast_from_suspend(card))?;
        }
        Ok(states)
    }

    // ---- branching oracle --------------------------------------------

    /// Every state reachable by one action. Terminal states return
    /// themselves; infeasible actions contribute nothing.
    pub fn next_states(&self, max_turns: u32) -> Result<StateSet, GameError> {
        if self.done || self.overflowed {
            return Ok(StateSet::from(self.clone()));
        }
        // a free Once Upon a Time dominates every other opening action
        let ouat = Card::named("Once Upon a Time");
        if self.spells_cast == 0 && self.hand.contains(ouat) {
            return self.cycle(ouat);
        }
        let mut out = StateSet::new();
        if self.turn != max_turns {
            out.extend(self.pass_turn()?);
        }
        for land in self.hand.lands(false).unique() {
            out.extend(self.play(land)?);
        }
        for card in self.hand.unique() {
            out.extend(self.cast(card)?);
            out.extend(self.cycle(card)?);
        }
        for card in self.battlefield.unique() {
            out.extend(self.sacrifice(card)?);
        }
        Ok(out)
    }
}

/// Every distinct way to pick `count` cards out of a multiset.
fn combinations(cards: &Cards, count: usize) -> Vec<Cards> {
    let counts: Vec<(Card, usize)> = cards.unique().map(|card| (card, cards.count(card))).collect();
    let mut out = Vec::new();
    let mut chosen = Vec::new();
    choose(&counts, count, &mut chosen, &mut out);
    out
}

fn choose(counts: &[(Card, usize)], count: usize, chosen: &mut Vec<Card>, out: &mut Vec<Cards>) {
    if count == 0 {
        out.push(chosen.clone().into());
        return;
    }
    let (card, available) = match counts.first() {
        Some(entry) => *entry,
        None => return,
    };
    for take in (0..=available.min(count)).rev() {
        for _ in 0..take {
            chosen.push(card);
        }
        choose(&counts[1..], count - take, chosen, out);
        for _ in 0..take {
            chosen.pop();
        }
    }
}

fn without_index(deck: &[Card], position: usize) -> Vec<Card> {
    let mut next = deck.to_vec();
    next.remove(position);
    next
}

/// An unordered set of game states with canonical-equality semantics.
/// Applying a transition to a set applies it to every member and unions the
/// results; reading a property reads it off an arbitrary member, which is
/// safe exactly when the search guarantees the members agree.
#[derive(Clone, Debug, Default)]
pub struct StateSet {
    states: FxHashSet<GameState>,
}

impl StateSet {
    pub fn new() -> StateSet {
        StateSet::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn insert(&mut self, state: GameState) -> bool {
        self.states.insert(state)
    }

    pub fn extend(&mut self, other: StateSet) {
        self.states.extend(other.states);
    }

    pub fn contains(&self, state: &GameState) -> bool {
        self.states.contains(state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameState> {
        self.states.iter()
    }

    pub fn pop(&mut self) -> Option<GameState> {
        let state = self.states.iter().next().cloned()?;
        self.states.remove(&state);
        Some(state)
    }

    pub fn peek(&self) -> Option<&GameState> {
        self.states.iter().next()
    }

    /// Property projection: the turn of an arbitrary member.
    pub fn turn(&self) -> Option<u32> {
        self.peek().map(|state| state.turn)
    }

    pub fn winner(&self) -> Option<&GameState> {
        self.states.iter().find(|state| state.done)
    }

    pub fn longest_trace(&self) -> Option<&GameState> {
        self.states.iter().max_by_key(|state| state.notes.len())
    }

    /// Batch application of a branching transition.
    pub fn apply(&self, transition: impl Fn(&GameState) -> StateSet) -> StateSet {
        let mut out = StateSet::new();
        for state in self.states.iter() {
            out.extend(transition(state));
        }
        out
    }

    pub fn try_apply(
        &self,
        transition: impl Fn(&GameState) -> Result<StateSet, GameError>,
    ) -> Result<StateSet, GameError> {
        let mut out = StateSet::new();
        for state in self.states.iter() {
            out.extend(transition(state)?);
        }
        Ok(out)
    }
}

impl From<GameState> for StateSet {
    fn from(state: GameState) -> StateSet {
        let mut states = FxHashSet::default();
        states.insert(state);
        StateSet { states }
    }
}

impl FromIterator<GameState> for StateSet {
    fn from_iter<I: IntoIterator<Item = GameState>>(iter: I) -> StateSet {
        StateSet {
            states: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for StateSet {
    type Item = GameState;
    type IntoIter = <FxHashSet<GameState> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.states.into_iter()
    }
}
