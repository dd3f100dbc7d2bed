//! Decklist files: `<count> <card name>` lines, `#` comments, blank lines
//! ignored, and `key: value` lines carrying search options.

use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::{Card, UnknownCard};
use crate::mana;

#[derive(Debug, Error, PartialEq)]
pub enum ParseDeckError {
    #[error("malformed deck line: {0:?}")]
    BadLine(String),
    #[error(transparent)]
    UnknownCard(#[from] UnknownCard),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Decklist {
    pub entries: Vec<(String, usize)>,
    /// The `colors:` option; colors outside it collapse to generic mana.
    pub colors: Option<String>,
}

impl FromStr for Decklist {
    type Err = ParseDeckError;

    fn from_str(input: &str) -> Result<Decklist, ParseDeckError> {
        let mut decklist = Decklist::default();
        for raw in input.lines() {
            let line = match raw.find('#') {
                Some(position) => &raw[..position],
                None => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (head, rest) = match line.split_once(char::is_whitespace) {
                Some(pair) => pair,
                None => return Err(ParseDeckError::BadLine(line.to_string())),
            };
            if let Ok(count) = head.parse::<usize>() {
                let name = rest.trim();
                Card::get(name)?;
                decklist.entries.push((name.to_string(), count));
                continue;
            }
            match head.strip_suffix(':') {
                Some("colors") => decklist.colors = Some(rest.trim().to_string()),
                Some(option) => warn!("ignoring unknown deck option {option:?}"),
                None => return Err(ParseDeckError::BadLine(line.to_string())),
            }
        }
        Ok(decklist)
    }
}

impl Decklist {
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Applies the deck's options to the process-wide search configuration.
    /// Called once per run, before any card attribute is parsed.
    pub fn apply_options(&self) {
        if let Some(colors) = &self.colors {
            mana::set_tracked_colors(colors);
        }
    }

    /// Expands to one `Card` per copy. Warns when the list isn't the usual
    /// sixty.
    pub fn cards(&self) -> Result<Vec<Card>, UnknownCard> {
        if self.total() != 60 {
            warn!("decklist has {} cards", self.total());
        }
        let mut cards = Vec::with_capacity(self.total());
        for (name, count) in self.entries.iter() {
            let card = Card::get(name)?;
            for _ in 0..*count {
                cards.push(card);
            }
        }
        Ok(cards)
    }
}

/// The stock Amulet Titan list the simulator was built around.
pub fn default_decklist() -> Decklist {
    let entries = [
        ("Primeval Titan", 4),
        ("Amulet of Vigor", 4),
        ("Summoner's Pact", 4),
        ("Sakura-Tribe Scout", 4),
        ("Arboreal Grazer", 2),
        ("Azusa, Lost but Seeking", 2),
        ("Dryad of the Ilysian Grove", 2),
        ("Summer Bloom", 2),
        ("Once Upon a Time", 4),
        ("Ancient Stirrings", 2),
        ("Explore", 2),
        ("Through the Breach", 2),
        ("Search for Tomorrow", 2),
        ("Simic Growth Chamber", 4),
        ("Gruul Turf", 2),
        ("Golgari Rot Farm", 1),
        ("Selesnya Sanctuary", 1),
        ("Boros Garrison", 1),
        ("Forest", 5),
        ("Castle Garenbrig", 2),
        ("Gemstone Mine", 2),
        ("Gemstone Caverns", 1),
        ("Tolaria West", 2),
        ("Khalni Garden", 1),
        ("Bojuka Bog", 1),
        ("Crumbling Vestige", 1),
    ];
    Decklist {
        entries: entries
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect(),
        colors: Some("GUR".to_string()),
    }
}
