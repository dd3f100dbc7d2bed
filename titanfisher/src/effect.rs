//! Card-specific behavior, keyed by slug. The cast and sacrifice tables are
//! mandatory: a castable card with no entry is a bug, surfaced as
//! `GameError::MissingHandler`. The cycle, play, and check tables are safe:
//! lookup or identity.

use crate::card::{Card, Cards};
use crate::mana::Mana;
use crate::state::{GameError, GameState, StateSet};

pub type Handler = fn(&GameState, Card) -> Result<StateSet, GameError>;

pub fn cast_handler(slug: &str) -> Option<Handler> {
    let handler: Handler = match slug {
        "primeval_titan" => cast_primeval_titan,
        "amulet_of_vigor" => cast_permanent,
        "expedition_map" => cast_permanent,
        "sakuratribe_scout" => cast_permanent,
        "devoted_druid" => cast_permanent,
        "azusa_lost_but_seeking" => cast_azusa_lost_but_seeking,
        "dryad_of_the_ilysian_grove" => cast_dryad_of_the_ilysian_grove,
        "arboreal_grazer" => cast_arboreal_grazer,
        "summer_bloom" => cast_summer_bloom,
        "explore" => cast_explore,
        "ancient_stirrings" => cast_ancient_stirrings,
        "once_upon_a_time" => cast_once_upon_a_time,
        "summoners_pact" => cast_summoners_pact,
        "through_the_breach" => cast_through_the_breach,
        "search_for_tomorrow" => cast_search_for_tomorrow,
        _ => return None,
    };
    Some(handler)
}

pub fn cycle_handler(slug: &str) -> Option<Handler> {
    let handler: Handler = match slug {
        "once_upon_a_time" => cast_once_upon_a_time,
        "tolaria_west" => cycle_tolaria_west,
        "search_for_tomorrow" => cycle_search_for_tomorrow,
        "tranquil_thicket" => cycle_tranquil_thicket,
        _ => return None,
    };
    Some(handler)
}

pub fn play_handler(slug: &str) -> Option<Handler> {
    let handler: Handler = match slug {
        "simic_growth_chamber" | "gruul_turf" | "golgari_rot_farm" | "selesnya_sanctuary"
        | "boros_garrison" => play_bounce_land,
        "crumbling_vestige" => play_crumbling_vestige,
        "zhalfirin_void" => play_zhalfirin_void,
        _ => return None,
    };
    Some(handler)
}

pub fn sacrifice_handler(slug: &str) -> Option<Handler> {
    let handler: Handler = match slug {
        "castle_garenbrig" => sacrifice_castle_garenbrig,
        "expedition_map" => sacrifice_expedition_map,
        _ => return None,
    };
    Some(handler)
}

pub fn enters_tapped_check(slug: &str) -> Option<fn(&GameState) -> bool> {
    match slug {
        "castle_garenbrig" => Some(check_castle_garenbrig),
        _ => None,
    }
}

/// Gates cycling verbs that are only open in a window. Once Upon a Time's
/// free modality is spent the moment any spell has been cast, even for a
/// copy drawn later.
pub(crate) fn cycle_available(state: &GameState, card: Card) -> bool {
    match card.slug() {
        "once_upon_a_time" => state.spells_cast() == 0,
        _ => true,
    }
}

/// Safe dispatch for lands arriving on the battlefield.
pub(crate) fn dispatch_play(states: StateSet, card: Card) -> Result<StateSet, GameError> {
    match play_handler(card.slug()) {
        Some(handler) => states.try_apply(|state| handler(state, card)),
        None => Ok(states),
    }
}

/// Safe dispatch for the cycling verb.
pub(crate) fn dispatch_cycle(states: StateSet, card: Card) -> Result<StateSet, GameError> {
    match cycle_handler(card.slug()) {
        Some(handler) => states.try_apply(|state| handler(state, card)),
        None => Ok(states),
    }
}

// ---- cast ------------------------------------------------------------

fn cast_permanent(state: &GameState, card: Card) -> Result<StateSet, GameError> {
    Ok(StateSet::from(state.to_battlefield(card)))
}

fn cast_primeval_titan(state: &GameState, card: Card) -> Result<StateSet, GameError> {
    Ok(StateSet::from(state.to_battlefield(card).win()))
}

fn cast_azusa_lost_but_seeking(state: &GameState, card: Card) -> Result<StateSet, GameError> {
    Ok(StateSet::from(state.to_battlefield(card).add_land_drops(2)))
}

fn cast_dryad_of_the_ilysian_grove(state: &GameState, card: Card) -> Result<StateSet, GameError> {
    Ok(StateSet::from(state.to_battlefield(card).add_land_drops(1)))
}

/// Put a land from hand onto the battlefield tapped, without using a drop.
fn cast_arboreal_grazer(state: &GameState, card: Card) -> Result<StateSet, GameError> {
    let entered = state.to_battlefield(card);
    let lands = entered.hand().lands(false);
    if lands.is_empty() {
        return Ok(StateSet::from(entered));
    }
    let mut out = StateSet::new();
    for land in lands.unique() {
        if let Some(next) = entered.without_hand(land) {
            out.extend(
                next.note(&format!("put {land} in tapped"))
                    .play_tapped(land)?,
            );
        }
    }
    Ok(out)
}

fn cast_summer_bloom(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    Ok(StateSet::from(state.add_land_drops(3)))
}

fn cast_explore(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    Ok(StateSet::from(state.add_land_drops(1).draw_noted(1)))
}

/// Look at the top five, take a colorless card if there is one.
fn cast_ancient_stirrings(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    let seen: Cards = state.top(5).iter().copied().collect();
    let options = seen.colorless(false);
    if options.is_empty() {
        return Ok(StateSet::from(state.note("whiff on Ancient Stirrings")));
    }
    Ok(state.grabs(&options))
}

/// Look at the top five, take a creature or a land. Shared by the paid cast
/// and the free first-spell modality.
fn cast_once_upon_a_time(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    let seen: Cards = state.top(5).iter().copied().collect();
    let options = seen.creatures_lands(false);
    if options.is_empty() {
        return Ok(StateSet::from(state.note("whiff on Once Upon a Time")));
    }
    Ok(state.grabs(&options))
}

/// Fetch any green creature now, owe 2GG at the next upkeep.
fn cast_summoners_pact(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    let owed = state.add_mana_debt(Mana::parse("2GG"));
    let options = owed.remaining().green_creatures(false);
    if options.is_empty() {
        return Ok(StateSet::from(owed.note("no green creature left")));
    }
    Ok(owed.grabs(&options))
}

/// Only worth resolving with a titan in hand; anything else is a dead branch.
fn cast_through_the_breach(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    let titan = Card::named("Primeval Titan");
    match state.without_hand(titan) {
        Some(next) => Ok(StateSet::from(
            next.note("put Primeval Titan in play").win(),
        )),
        None => Ok(StateSet::new()),
    }
}

fn cast_search_for_tomorrow(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    let forest = Card::named("Forest");
    let fetched = state.fetch_land(forest, false)?;
    if fetched.is_empty() {
        return Ok(StateSet::from(state.note("no forest left to fetch")));
    }
    Ok(fetched)
}

// ---- cycle -----------------------------------------------------------

/// Transmute for a zero-cost card, by convention the pact.
fn cycle_tolaria_west(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    let options = state.remaining().zeros(true);
    if options.is_empty() {
        return Ok(StateSet::from(state.note("nothing to transmute for")));
    }
    Ok(state.grabs(&options))
}

fn cycle_search_for_tomorrow(state: &GameState, card: Card) -> Result<StateSet, GameError> {
    Ok(StateSet::from(state.suspend(card, 2)))
}

fn cycle_tranquil_thicket(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    Ok(StateSet::from(state.draw_noted(1)))
}

// ---- play ------------------------------------------------------------

fn play_bounce_land(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    Ok(state.bounce_land())
}

/// Enters with one mana of any color.
fn play_crumbling_vestige(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    let mut out = StateSet::new();
    for letter in ["W", "U", "B", "R", "G"] {
        out.insert(state.add_mana(Mana::parse(letter)));
    }
    Ok(out)
}

fn play_zhalfirin_void(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    state.scry(1)
}

// ---- sacrifice -------------------------------------------------------

/// The activation is modeled as a sacrifice: pay 2GG, add six green. Since
/// everything taps every turn anyway, giving the ability up for the rest of
/// the game costs nothing the search cares about.
fn sacrifice_castle_garenbrig(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    Ok(StateSet::from(state.add_mana(Mana::parse("GGGGGG"))))
}

fn sacrifice_expedition_map(state: &GameState, _card: Card) -> Result<StateSet, GameError> {
    let options = state.remaining().lands(true);
    if options.is_empty() {
        return Ok(StateSet::from(state.note("no land left to fetch")));
    }
    Ok(state.grabs(&options))
}

// ---- enters-tapped checks --------------------------------------------

/// Untapped with a forest in play, or with a Dryad making everything one.
fn check_castle_garenbrig(state: &GameState) -> bool {
    let dryad = Card::named("Dryad of the Ilysian Grove");
    let forests = state.battlefield().forests(false);
    forests.is_empty() && !state.battlefield().contains(dryad)
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::state::GameState;

    fn cards(names: &[&str]) -> Cards {
        names.iter().map(|name| Card::named(name)).collect()
    }

    fn state_with(hand: &[&str], battlefield: &[&str], deck: &[&str]) -> GameState {
        let deck: Vec<Card> = deck.iter().map(|name| Card::named(name)).collect();
        let state = GameState::new(deck, true, true);
        let mut state = state.add_mana(Mana::parse("4WWUUBBRRGG"));
        state.hand = cards(hand);
        state.battlefield = cards(battlefield);
        state.turn = 2;
        state.land_drops = 1;
        state
    }

    #[test]
    fn it_has_a_cast_handler_for_every_castable_card() {
        for name in [
            "Primeval Titan", "Amulet of Vigor", "Azusa, Lost but Seeking",
            "Dryad of the Ilysian Grove", "Sakura-Tribe Scout", "Arboreal Grazer",
            "Devoted Druid", "Expedition Map", "Summer Bloom", "Explore",
            "Ancient Stirrings", "Once Upon a Time", "Summoner's Pact",
            "Through the Breach", "Search for Tomorrow",
        ] {
            let card = Card::named(name);
            assert_eq!(true, card.cost().is_some(), "{name} should have a cost");
            assert_eq!(true, cast_handler(card.slug()).is_some(), "{name} needs a cast handler");
        }
        for name in ["Castle Garenbrig", "Expedition Map"] {
            let card = Card::named(name);
            assert_eq!(true, card.sacrifice_cost().is_some());
            assert_eq!(true, sacrifice_handler(card.slug()).is_some(), "{name} needs a sacrifice handler");
        }
        assert_eq!(true, enters_tapped_check(Card::named("Castle Garenbrig").slug()).is_some());
        assert_eq!(None, cast_handler("forest"));
    }

    #[test]
    fn it_wins_on_a_resolved_titan() {
        let state = state_with(&["Primeval Titan"], &["Forest"], &[]);
        let titan = Card::named("Primeval Titan");
        let resolved = state.cast(titan).unwrap();
        assert_eq!(false, resolved.is_empty());
        for successor in resolved {
            assert_eq!(true, successor.done());
            assert_eq!(true, successor.battlefield().contains(titan));
        }
    }

    #[test]
    fn it_fetches_with_summoners_pact_and_owes_mana() {
        let state = state_with(
            &["Summoner's Pact"],
            &["Forest"],
            &["Primeval Titan", "Azusa, Lost but Seeking", "Forest"],
        );
        let resolved = state.cast(Card::named("Summoner's Pact")).unwrap();
        // one branch per distinct green creature in the deck
        assert_eq!(2, resolved.len());
        for successor in resolved {
            assert_eq!(Mana::parse("2GG"), successor.mana_debt());
            assert_eq!(1, successor.hand().creatures(false).len());
        }
    }

    #[test]
    fn it_breaches_only_with_a_titan_in_hand() {
        let breach = Card::named("Through the Breach");

        let armed = state_with(&["Through the Breach", "Primeval Titan"], &["Forest"], &[]);
        let resolved = armed.cast(breach).unwrap();
        assert_eq!(false, resolved.is_empty());
        for successor in resolved {
            assert_eq!(true, successor.done());
            assert_eq!(false, successor.hand().contains(Card::named("Primeval Titan")));
        }

        let unarmed = state_with(&["Through the Breach"], &["Forest"], &[]);
        assert_eq!(true, unarmed.cast(breach).unwrap().is_empty());
    }

    #[test]
    fn it_grabs_colorless_cards_with_ancient_stirrings() {
        let state = state_with(
            &["Ancient Stirrings"],
            &["Forest"],
            &["Simic Growth Chamber", "Primeval Titan", "Amulet of Vigor",
              "Summer Bloom", "Explore", "Forest"],
        );
        let resolved = state.cast(Card::named("Ancient Stirrings")).unwrap();
        // chamber and amulet are colorless within the top five; the forest
        // is sixth and out of reach, the titan is green
        assert_eq!(2, resolved.len());

        let whiff = state_with(&["Ancient Stirrings"], &["Forest"], &["Primeval Titan"]);
        let resolved = whiff.cast(Card::named("Ancient Stirrings")).unwrap();
        assert_eq!(1, resolved.len());
        for successor in resolved {
            assert_eq!(true, successor.notes().contains("whiff"));
        }
    }

    #[test]
    fn it_puts_a_land_in_tapped_with_arboreal_grazer() {
        let state = state_with(
            &["Arboreal Grazer", "Simic Growth Chamber", "Explore"],
            &["Amulet of Vigor"],
            &[],
        );
        let before = state.mana_pool().total();
        let resolved = state.cast(Card::named("Arboreal Grazer")).unwrap();
        assert_eq!(false, resolved.is_empty());
        for successor in resolved {
            // one green paid for the grazer, two back when the amulet untaps
            // the chamber, and the land drop is untouched
            assert_eq!(1, successor.land_drops());
            assert_eq!(before + 1, successor.mana_pool().total());
        }
    }

    #[test]
    fn it_suspends_search_for_tomorrow() {
        let state = state_with(&["Search for Tomorrow"], &["Forest"], &["Forest"]);
        let card = Card::named("Search for Tomorrow");
        let resolved = state.cycle(card).unwrap();
        assert_eq!(1, resolved.len());
        for successor in resolved {
            assert_eq!(&[(card, 2)], successor.suspended());
            assert_eq!(true, successor.notes().contains("suspend Search for Tomorrow"));
        }
    }

    #[test]
    fn it_transmutes_tolaria_west_for_the_pact() {
        let mut state = state_with(
            &["Tolaria West"],
            &["Forest"],
            &["Summoner's Pact", "Forest", "Primeval Titan"],
        );
        state.mana_pool = Mana::parse("1UU");
        let resolved = state.cycle(Card::named("Tolaria West")).unwrap();
        assert_eq!(1, resolved.len());
        for successor in resolved {
            assert_eq!(true, successor.hand().contains(Card::named("Summoner's Pact")));
        }
    }

    #[test]
    fn it_activates_castle_garenbrig_as_a_sacrifice() {
        let mut state = state_with(&[], &["Castle Garenbrig"], &[]);
        state.mana_pool = Mana::parse("GG2");
        let resolved = state.sacrifice(Card::named("Castle Garenbrig")).unwrap();
        assert_eq!(1, resolved.len());
        for successor in resolved {
            assert_eq!(Mana::parse("GGGGGG"), successor.mana_pool());
            assert_eq!(false, successor.battlefield().contains(Card::named("Castle Garenbrig")));
        }
    }

    #[test]
    fn it_fetches_the_best_land_with_expedition_map() {
        let mut state = state_with(
            &[],
            &["Expedition Map", "Forest"],
            &["Forest", "Simic Growth Chamber", "Bojuka Bog"],
        );
        state.mana_pool = Mana::parse("2");
        let resolved = state.sacrifice(Card::named("Expedition Map")).unwrap();
        // pruned to the single oracle-preferred land
        assert_eq!(1, resolved.len());
        for successor in resolved {
            assert_eq!(true, successor.hand().contains(Card::named("Simic Growth Chamber")));
        }
    }

    #[test]
    fn it_checks_castle_garenbrig_against_the_board() {
        let castle = Card::named("Castle Garenbrig");

        let bare = state_with(&["Castle Garenbrig"], &["Bojuka Bog"], &[]);
        let before = bare.mana_pool().total();
        for successor in bare.play(castle).unwrap() {
            // entered tapped: no mana beyond what the state started with
            assert_eq!(before, successor.mana_pool().total());
        }

        let forested = state_with(&["Castle Garenbrig"], &["Forest"], &[]);
        for successor in forested.play(castle).unwrap() {
            // entered untapped and produced its green right away
            assert_eq!(before + 1, successor.mana_pool().total());
        }

        let dryad = state_with(&["Castle Garenbrig"], &["Dryad of the Ilysian Grove"], &[]);
        assert_eq!(false, check_castle_garenbrig(&dryad));
    }

    #[test]
    fn it_scries_off_zhalfirin_void() {
        let state = state_with(&["Zhalfirin Void"], &["Forest"], &["Explore", "Forest"]);
        let resolved = state.play(Card::named("Zhalfirin Void")).unwrap();
        assert_eq!(2, resolved.len());
    }

    #[test]
    fn it_picks_a_color_for_crumbling_vestige() {
        let state = state_with(&["Crumbling Vestige"], &["Forest"], &[]);
        let resolved = state.play(Card::named("Crumbling Vestige")).unwrap();
        // one branch per color; all five are tracked by default
        assert_eq!(5, resolved.len());
    }
}
