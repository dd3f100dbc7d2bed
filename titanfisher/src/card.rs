use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::mana::Mana;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardType {
    Land,
    Creature,
    Artifact,
    Enchantment,
    Instant,
    Sorcery,
    Planeswalker,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntersTapped {
    No,
    Yes,
    /// Resolved by a card-specific predicate against the game state.
    Check,
}

pub struct CardData {
    name: &'static str,
    display: &'static str,
    slug: String,
    types: &'static [CardType],
    cost: Option<&'static str>,
    /// Mana produced when tapped; `|` separates alternatives.
    taps_for: Option<&'static str>,
    cycle_cost: Option<&'static str>,
    cycle_verb: &'static str,
    sacrifice_cost: Option<&'static str>,
    enters_tapped: EntersTapped,
    dies: bool,
    is_green: bool,
    is_colorless: bool,
    /// "Best" ordering for pruned fetches; lower is better.
    rank: u8,
}

impl Default for CardData {
    fn default() -> Self {
        CardData {
            name: "",
            display: "",
            slug: String::new(),
            types: &[],
            cost: None,
            taps_for: None,
            cycle_cost: None,
            cycle_verb: "cycle",
            sacrifice_cost: None,
            enters_tapped: EntersTapped::No,
            dies: false,
            is_green: false,
            is_colorless: false,
            rank: u8::MAX,
        }
    }
}

struct Oracle {
    cards: Vec<CardData>,
    index: FxHashMap<&'static str, u16>,
}

fn oracle() -> &'static Oracle {
    static ORACLE: OnceLock<Oracle> = OnceLock::new();
    ORACLE.get_or_init(Oracle::standard)
}

impl Oracle {
    fn standard() -> Oracle {
        use CardType::*;
        use EntersTapped::{Check, Yes};

        let mut cards = vec![
            CardData {
                name: "Primeval Titan",
                types: &[Creature],
                cost: Some("4GG"),
                is_green: true,
                dies: true,
                rank: 1,
                ..Default::default()
            },
            CardData {
                name: "Amulet of Vigor",
                types: &[Artifact],
                cost: Some("1"),
                is_colorless: true,
                rank: 8,
                ..Default::default()
            },
            CardData {
                name: "Azusa, Lost but Seeking",
                types: &[Creature],
                cost: Some("2G"),
                is_green: true,
                dies: true,
                rank: 12,
                ..Default::default()
            },
            CardData {
                name: "Dryad of the Ilysian Grove",
                types: &[Creature, Enchantment],
                cost: Some("2G"),
                is_green: true,
                dies: true,
                rank: 10,
                ..Default::default()
            },
            CardData {
                name: "Sakura-Tribe Scout",
                types: &[Creature],
                cost: Some("G"),
                is_green: true,
                dies: true,
                rank: 14,
                ..Default::default()
            },
            CardData {
                name: "Arboreal Grazer",
                types: &[Creature],
                cost: Some("G"),
                is_green: true,
                dies: true,
                rank: 16,
                ..Default::default()
            },
            CardData {
                name: "Devoted Druid",
                types: &[Creature],
                cost: Some("1G"),
                taps_for: Some("G"),
                is_green: true,
                dies: true,
                rank: 18,
                ..Default::default()
            },
            CardData {
                name: "Expedition Map",
                types: &[Artifact],
                cost: Some("1"),
                sacrifice_cost: Some("2"),
                is_colorless: true,
                rank: 40,
                ..Default::default()
            },
            CardData {
                name: "Summer Bloom",
                types: &[Sorcery],
                cost: Some("1G"),
                rank: 30,
                ..Default::default()
            },
            CardData {
                name: "Explore",
                types: &[Sorcery],
                cost: Some("1G"),
                is_green: true,
                rank: 32,
                ..Default::default()
            },
            CardData {
                name: "Ancient Stirrings",
                types: &[Sorcery],
                cost: Some("G"),
                is_green: true,
                rank: 34,
                ..Default::default()
            },
            CardData {
                name: "Once Upon a Time",
                types: &[Instant],
                cost: Some("1G"),
                cycle_cost: Some("0"),
                cycle_verb: "cast for free",
                is_green: true,
                rank: 20,
                ..Default::default()
            },
            CardData {
                name: "Summoner's Pact",
                types: &[Instant],
                cost: Some("0"),
                is_green: true,
                rank: 5,
                ..Default::default()
            },
            CardData {
                name: "Through the Breach",
                types: &[Sorcery],
                cost: Some("4R"),
                rank: 36,
                ..Default::default()
            },
            CardData {
                name: "Search for Tomorrow",
                types: &[Sorcery],
                cost: Some("2G"),
                cycle_cost: Some("G"),
                cycle_verb: "suspend",
                is_green: true,
                rank: 38,
                ..Default::default()
            },
            CardData {
                name: "Forest",
                types: &[Land],
                taps_for: Some("G"),
                is_colorless: true,
                rank: 30,
                ..Default::default()
            },
            CardData {
                name: "Simic Growth Chamber",
                types: &[Land],
                taps_for: Some("GU"),
                enters_tapped: Yes,
                is_colorless: true,
                rank: 20,
                ..Default::default()
            },
            CardData {
                name: "Gruul Turf",
                types: &[Land],
                taps_for: Some("RG"),
                enters_tapped: Yes,
                is_colorless: true,
                rank: 22,
                ..Default::default()
            },
            CardData {
                name: "Golgari Rot Farm",
                types: &[Land],
                taps_for: Some("BG"),
                enters_tapped: Yes,
                is_colorless: true,
                rank: 23,
                ..Default::default()
            },
            CardData {
                name: "Selesnya Sanctuary",
                types: &[Land],
                taps_for: Some("GW"),
                enters_tapped: Yes,
                is_colorless: true,
                rank: 24,
                ..Default::default()
            },
            CardData {
                name: "Boros Garrison",
                types: &[Land],
                taps_for: Some("RW"),
                enters_tapped: Yes,
                is_colorless: true,
                rank: 25,
                ..Default::default()
            },
            CardData {
                name: "Castle Garenbrig",
                types: &[Land],
                taps_for: Some("G"),
                sacrifice_cost: Some("2GG"),
                enters_tapped: Check,
                is_colorless: true,
                rank: 26,
                ..Default::default()
            },
            CardData {
                name: "Gemstone Mine",
                types: &[Land],
                taps_for: Some("W|U|B|R|G"),
                is_colorless: true,
                rank: 28,
                ..Default::default()
            },
            CardData {
                name: "Gemstone Caverns",
                types: &[Land],
                taps_for: Some("1"),
                is_colorless: true,
                rank: 44,
                ..Default::default()
            },
            CardData {
                name: "Tolaria West",
                types: &[Land],
                taps_for: Some("U"),
                cycle_cost: Some("1UU"),
                cycle_verb: "transmute",
                enters_tapped: Yes,
                is_colorless: true,
                rank: 42,
                ..Default::default()
            },
            CardData {
                name: "Khalni Garden",
                types: &[Land],
                taps_for: Some("G"),
                enters_tapped: Yes,
                is_colorless: true,
                rank: 36,
                ..Default::default()
            },
            CardData {
                name: "Bojuka Bog",
                types: &[Land],
                taps_for: Some("B"),
                enters_tapped: Yes,
                is_colorless: true,
                rank: 46,
                ..Default::default()
            },
            CardData {
                name: "Crumbling Vestige",
                types: &[Land],
                taps_for: Some("1"),
                enters_tapped: Yes,
                is_colorless: true,
                rank: 45,
                ..Default::default()
            },
            CardData {
                name: "Radiant Fountain",
                types: &[Land],
                taps_for: Some("1"),
                is_colorless: true,
                rank: 47,
                ..Default::default()
            },
            CardData {
                name: "Tranquil Thicket",
                types: &[Land],
                taps_for: Some("G"),
                cycle_cost: Some("1"),
                enters_tapped: Yes,
                is_colorless: true,
                rank: 48,
                ..Default::default()
            },
            CardData {
                name: "Zhalfirin Void",
                types: &[Land],
                taps_for: Some("1"),
                is_colorless: true,
                rank: 43,
                ..Default::default()
            },
        ];

        for card in cards.iter_mut() {
            card.slug = slugify(card.name);
            if card.display.is_empty() {
                card.display = card.name;
            }
        }

        let index = cards
            .iter()
            .enumerate()
            .map(|(position, card)| (card.name, position as u16))
            .collect();

        Oracle { cards, index }
    }
}

/// The dispatch key: lowercase, apostrophes/hyphens/commas removed, spaces
/// replaced by underscores.
pub fn slugify(name: &str) -> String {
    name.chars()
        .filter(|symbol| !matches!(symbol, '\'' | '-' | ','))
        .map(|symbol| {
            if symbol == ' ' {
                '_'
            } else {
                symbol.to_ascii_lowercase()
            }
        })
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown card: {0}")]
pub struct UnknownCard(pub String);

/// A card identity, interned as an index into the oracle. Copying and
/// comparing cards is free; every behavioral attribute lives in the oracle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u16);

impl Card {
    pub fn get(name: &str) -> Result<Card, UnknownCard> {
        match oracle().index.get(name) {
            Some(position) => Ok(Card(*position)),
            None => Err(UnknownCard(name.to_string())),
        }
    }

    /// Lookup for names hard-wired into the engine itself; the oracle tests
    /// cover every such name.
    pub(crate) fn named(name: &str) -> Card {
        match Card::get(name) {
            Ok(card) => card,
            Err(_) => panic!("card missing from the oracle: {name}"),
        }
    }

    fn data(self) -> &'static CardData {
        &oracle().cards[self.0 as usize]
    }

    pub fn name(self) -> &'static str {
        self.data().name
    }

    pub fn display_name(self) -> &'static str {
        self.data().display
    }

    pub fn slug(self) -> &'static str {
        &self.data().slug
    }

    pub fn cost(self) -> Option<Mana> {
        self.data().cost.map(Mana::parse)
    }

    pub fn taps_for(self) -> Option<Vec<Mana>> {
        self.data()
            .taps_for
            .map(|options| options.split('|').map(Mana::parse).collect())
    }

    pub fn cycle_cost(self) -> Option<Mana> {
        self.data().cycle_cost.map(Mana::parse)
    }

    pub fn cycle_verb(self) -> &'static str {
        self.data().cycle_verb
    }

    pub fn sacrifice_cost(self) -> Option<Mana> {
        self.data().sacrifice_cost.map(Mana::parse)
    }

    pub fn enters_tapped(self) -> EntersTapped {
        self.data().enters_tapped
    }

    pub fn dies(self) -> bool {
        self.data().dies
    }

    pub fn rank(self) -> u8 {
        self.data().rank
    }

    pub fn is_type(self, card_type: CardType) -> bool {
        self.data().types.contains(&card_type)
    }

    pub fn is_land(self) -> bool {
        self.is_type(CardType::Land)
    }

    pub fn is_creature(self) -> bool {
        self.is_type(CardType::Creature)
    }

    pub fn is_permanent(self) -> bool {
        self.data().types.iter().any(|t| {
            matches!(
                t,
                CardType::Land
                    | CardType::Creature
                    | CardType::Artifact
                    | CardType::Enchantment
                    | CardType::Planeswalker
            )
        })
    }

    pub fn is_green(self) -> bool {
        self.data().is_green
    }

    pub fn is_colorless(self) -> bool {
        self.data().is_colorless
    }

    pub fn is_forest(self) -> bool {
        self.name() == "Forest"
    }

    pub fn is_zero_cost(self) -> bool {
        matches!(self.cost(), Some(cost) if cost.is_zero())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An ordered bag of cards. The backing vector stays sorted, so equal
/// multisets compare and hash identically regardless of insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cards(Vec<Card>);

impl Cards {
    pub fn new() -> Cards {
        Cards::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.0.iter().copied()
    }

    /// Each distinct card once, in canonical order.
    pub fn unique(&self) -> impl Iterator<Item = Card> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(position, card)| *position == 0 || self.0[position - 1] != **card)
            .map(|(_, card)| *card)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.0.binary_search(&card).is_ok()
    }

    pub fn count(&self, card: Card) -> usize {
        self.0.iter().filter(|held| **held == card).count()
    }

    pub fn count_named(&self, name: &str) -> usize {
        match Card::get(name) {
            Ok(card) => self.count(card),
            Err(_) => 0,
        }
    }

    pub fn with(&self, card: Card) -> Cards {
        let mut cards = self.0.clone();
        let position = cards.partition_point(|held| *held <= card);
        cards.insert(position, card);
        Cards(cards)
    }

    pub fn with_all(&self, other: &Cards) -> Cards {
        let mut cards = self.0.clone();
        cards.extend_from_slice(&other.0);
        cards.sort();
        Cards(cards)
    }

    /// Removes one copy, or `None` when the card isn't present.
    pub fn without(&self, card: Card) -> Option<Cards> {
        let position = self.0.binary_search(&card).ok()?;
        let mut cards = self.0.clone();
        cards.remove(position);
        Some(Cards(cards))
    }

    /// Removes a sub-multiset, or `None` when any copy is missing.
    pub fn without_all(&self, other: &Cards) -> Option<Cards> {
        let mut cards = self.clone();
        for card in other.iter() {
            cards = cards.without(card)?;
        }
        Some(cards)
    }

    fn filtered(&self, best: bool, keep: impl Fn(Card) -> bool) -> Cards {
        let picked: Vec<Card> = self.0.iter().copied().filter(|card| keep(*card)).collect();
        if best {
            match picked.into_iter().min_by_key(|card| (card.rank(), *card)) {
                Some(card) => Cards(vec![card]),
                None => Cards::new(),
            }
        } else {
            Cards(picked)
        }
    }

    pub fn lands(&self, best: bool) -> Cards {
        self.filtered(best, Card::is_land)
    }

    pub fn creatures(&self, best: bool) -> Cards {
        self.filtered(best, Card::is_creature)
    }

    pub fn green_creatures(&self, best: bool) -> Cards {
        self.filtered(best, |card| card.is_creature() && card.is_green())
    }

    pub fn forests(&self, best: bool) -> Cards {
        self.filtered(best, Card::is_forest)
    }

    pub fn permanents(&self, best: bool) -> Cards {
        self.filtered(best, Card::is_permanent)
    }

    pub fn colorless(&self, best: bool) -> Cards {
        self.filtered(best, Card::is_colorless)
    }

    pub fn creatures_lands(&self, best: bool) -> Cards {
        self.filtered(best, |card| card.is_creature() || card.is_land())
    }

    /// Cards that cost zero mana to cast.
    pub fn zeros(&self, best: bool) -> Cards {
        self.filtered(best, Card::is_zero_cost)
    }
}

impl From<Vec<Card>> for Cards {
    fn from(mut cards: Vec<Card>) -> Cards {
        cards.sort();
        Cards(cards)
    }
}

impl FromIterator<Card> for Cards {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Cards {
        Cards::from(iter.into_iter().collect::<Vec<Card>>())
    }
}

impl fmt::Display for Cards {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<&str> = self.iter().map(Card::display_name).collect();
        names.sort();
        names.dedup();
        let mut first = true;
        for name in names {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            let copies = self.count_named(name);
            if copies > 1 {
                write!(f, "{copies}*{name}")?;
            } else {
                write!(f, "{name}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    #[test]
    fn it_resolves_oracle_attributes() {
        let titan = Card::named("Primeval Titan");
        assert_eq!(Some(Mana::parse_with(crate::mana::ALL_COLORS, "4GG")), titan.cost());
        assert_eq!(true, titan.is_creature());
        assert_eq!(true, titan.is_green());
        assert_eq!(true, titan.dies());

        let simic = Card::named("Simic Growth Chamber");
        assert_eq!(EntersTapped::Yes, simic.enters_tapped());
        assert_eq!(1, simic.taps_for().unwrap().len());
        assert_eq!(2, simic.taps_for().unwrap()[0].total());

        let mine = Card::named("Gemstone Mine");
        assert_eq!(5, mine.taps_for().unwrap().len());

        let tolaria = Card::named("Tolaria West");
        assert_eq!("transmute", tolaria.cycle_verb());
        assert_eq!(3, tolaria.cycle_cost().unwrap().total());

        assert_eq!(EntersTapped::Check, Card::named("Castle Garenbrig").enters_tapped());
        assert_eq!(true, Card::named("Summoner's Pact").is_zero_cost());
    }

    #[test]
    fn it_rejects_unknown_cards() {
        assert_eq!(
            Err(UnknownCard("Black Lotus".to_string())),
            Card::get("Black Lotus")
        );
    }

    #[test]
    fn it_slugifies_names() {
        assert_eq!("primeval_titan", Card::named("Primeval Titan").slug());
        assert_eq!("azusa_lost_but_seeking", Card::named("Azusa, Lost but Seeking").slug());
        assert_eq!("summoners_pact", Card::named("Summoner's Pact").slug());
        assert_eq!("sakuratribe_scout", Card::named("Sakura-Tribe Scout").slug());
    }

    #[test]
    fn it_keeps_multiset_semantics() {
        let forest = Card::named("Forest");
        let titan = Card::named("Primeval Titan");
        let hand: Cards = vec![forest, titan, forest].into();

        assert_eq!(3, hand.len());
        assert_eq!(2, hand.count(forest));

        // adding and removing a card is the identity
        assert_eq!(Some(hand.clone()), hand.with(titan).without(titan));
        assert_eq!(None, hand.without(Card::named("Explore")));

        // order of insertion doesn't matter
        let other: Cards = vec![titan, forest, forest].into();
        assert_eq!(hand, other);
        assert_eq!(2, hand.unique().count());
    }

    #[test]
    fn it_removes_sub_multisets() {
        let forest = Card::named("Forest");
        let titan = Card::named("Primeval Titan");
        let hand: Cards = vec![forest, forest, titan].into();

        let two_forests: Cards = vec![forest, forest].into();
        assert_eq!(Some(vec![titan].into()), hand.without_all(&two_forests));

        let three_forests: Cards = vec![forest, forest, forest].into();
        assert_eq!(None, hand.without_all(&three_forests));
    }

    #[test]
    fn it_filters_by_card_kind() {
        let cards: Cards = vec![
            Card::named("Forest"),
            Card::named("Simic Growth Chamber"),
            Card::named("Primeval Titan"),
            Card::named("Amulet of Vigor"),
            Card::named("Summer Bloom"),
        ]
        .into();

        assert_eq!(2, cards.lands(false).len());
        assert_eq!(1, cards.creatures(false).len());
        assert_eq!(1, cards.forests(false).len());
        assert_eq!(3, cards.creatures_lands(false).len());
        assert_eq!(4, cards.permanents(false).len());
        // colorless covers the artifact and the lands but not the titan
        assert_eq!(3, cards.colorless(false).len());
    }

    #[test]
    fn it_selects_the_best_by_rank() {
        let cards: Cards = vec![
            Card::named("Azusa, Lost but Seeking"),
            Card::named("Primeval Titan"),
            Card::named("Sakura-Tribe Scout"),
        ]
        .into();

        let best = cards.green_creatures(true);
        assert_eq!(1, best.len());
        assert_eq!(true, best.contains(Card::named("Primeval Titan")));

        assert_eq!(true, Cards::new().lands(true).is_empty());
    }

    #[test]
    fn it_displays_counts() {
        let cards: Cards = vec![
            Card::named("Forest"),
            Card::named("Forest"),
            Card::named("Amulet of Vigor"),
        ]
        .into();
        assert_eq!("Amulet of Vigor 2*Forest", cards.to_string());
    }
}
