use std::collections::HashSet;
use std::fmt;
use std::ops::Add;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

pub const WHITE: u8 = 1 << 0;
pub const BLUE: u8 = 1 << 1;
pub const BLACK: u8 = 1 << 2;
pub const RED: u8 = 1 << 3;
pub const GREEN: u8 = 1 << 4;
pub const ALL_COLORS: u8 = WHITE | BLUE | BLACK | RED | GREEN;

static TRACKED_COLORS: AtomicU8 = AtomicU8::new(ALL_COLORS);

/// Restricts which colors are represented distinctly. Symbols of untracked
/// colors collapse to generic when parsed, so a deck that never casts white
/// spells doesn't pay for white pips in every state hash.
pub fn set_tracked_colors(letters: &str) {
    TRACKED_COLORS.store(color_mask(letters), Ordering::Relaxed);
}

pub fn tracked_colors() -> u8 {
    TRACKED_COLORS.load(Ordering::Relaxed)
}

pub fn color_mask(letters: &str) -> u8 {
    let mut mask = 0;
    for symbol in letters.chars() {
        match symbol.to_ascii_uppercase() {
            'W' => mask |= WHITE,
            'U' => mask |= BLUE,
            'B' => mask |= BLACK,
            'R' => mask |= RED,
            'G' => mask |= GREEN,
            _ => {}
        }
    }
    mask
}

/// An immutable mana value: a count per color plus a generic count. Used for
/// costs and for the pool itself.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Mana {
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub generic: u8,
}

impl Mana {
    /// Parses a cost string like `"2GG"` against the process-wide tracked
    /// colors. Parsing is total: digits accumulate into generic, untracked
    /// color symbols and `C` count as generic, anything else is skipped.
    pub fn parse(text: &str) -> Mana {
        Mana::parse_with(tracked_colors(), text)
    }

    pub fn parse_with(mask: u8, text: &str) -> Mana {
        let mut mana = Mana::default();
        let mut number: u16 = 0;
        for symbol in text.trim().chars() {
            if let Some(digit) = symbol.to_digit(10) {
                number = number * 10 + digit as u16;
                continue;
            }
            mana.generic += number as u8;
            number = 0;
            match symbol.to_ascii_uppercase() {
                'W' if mask & WHITE != 0 => mana.white += 1,
                'U' if mask & BLUE != 0 => mana.blue += 1,
                'B' if mask & BLACK != 0 => mana.black += 1,
                'R' if mask & RED != 0 => mana.red += 1,
                'G' if mask & GREEN != 0 => mana.green += 1,
                'W' | 'U' | 'B' | 'R' | 'G' | 'C' => mana.generic += 1,
                _ => {}
            }
        }
        mana.generic += number as u8;
        mana
    }

    pub fn total(&self) -> u32 {
        self.pips().iter().map(|n| *n as u32).sum::<u32>() + self.generic as u32
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    /// True when this pool can pay the cost: it dominates in every color and
    /// the leftover pips plus its own generic absorb the generic part.
    pub fn can_pay(&self, cost: Mana) -> bool {
        let pips = self.pips();
        let cost_pips = cost.pips();
        let mut slack = self.generic as u32;
        for i in 0..5 {
            if pips[i] < cost_pips[i] {
                return false;
            }
            slack += (pips[i] - cost_pips[i]) as u32;
        }
        slack >= cost.generic as u32
    }

    /// Every pool that can remain after legally paying `cost`. The generic
    /// part may be paid by any color, so the result is a set: subtracting a
    /// generic 1 from `RG` leaves either `G` or `R`. Empty exactly when the
    /// cost cannot be paid.
    pub fn minus(&self, cost: Mana) -> Vec<Mana> {
        let mut pips = self.pips();
        let cost_pips = cost.pips();
        for i in 0..5 {
            if pips[i] < cost_pips[i] {
                return Vec::new();
            }
            pips[i] -= cost_pips[i];
        }
        let slots = [
            self.generic, pips[0], pips[1], pips[2], pips[3], pips[4],
        ];
        let mut residues = HashSet::new();
        spend(slots, 0, cost.generic, &mut residues);
        let mut residues: Vec<Mana> = residues
            .into_iter()
            .map(|[generic, white, blue, black, red, green]| Mana {
                white,
                blue,
                black,
                red,
                green,
                generic,
            })
            .collect();
        residues.sort();
        residues
    }

    fn pips(&self) -> [u8; 5] {
        [self.white, self.blue, self.black, self.red, self.green]
    }
}

/// Distributes `need` generic payment over the remaining slots, recording
/// every distinct leftover. Slot 0 is the pool's own generic mana.
fn spend(slots: [u8; 6], index: usize, need: u8, residues: &mut HashSet<[u8; 6]>) {
    if need == 0 {
        residues.insert(slots);
        return;
    }
    if index >= slots.len() {
        return;
    }
    for take in 0..=slots[index].min(need) {
        let mut next = slots;
        next[index] -= take;
        spend(next, index + 1, need - take, residues);
    }
}

impl Add for Mana {
    type Output = Mana;

    fn add(self, other: Mana) -> Mana {
        Mana {
            white: self.white + other.white,
            blue: self.blue + other.blue,
            black: self.black + other.black,
            red: self.red + other.red,
            green: self.green + other.green,
            generic: self.generic + other.generic,
        }
    }
}

impl fmt::Display for Mana {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        if self.generic > 0 {
            write!(f, "{}", self.generic)?;
        }
        for (symbol, count) in [
            ('W', self.white),
            ('U', self.blue),
            ('B', self.black),
            ('R', self.red),
            ('G', self.green),
        ] {
            for _ in 0..count {
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}
