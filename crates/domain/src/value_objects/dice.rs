//! Dice expressions and rolling
//!
//! Supports the closed grammar the host formula evaluator understands for
//! corruption costs: plain integers ("3") and dice with an optional flat
//! modifier ("1d4", "1d4 + 2", "2d6-1"). Whitespace is insignificant.
//!
//! Randomness is injected by the caller so the domain stays deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected K, XdY or XdY+Z
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
    /// The rolled total does not fit in an i32
    #[error("Dice total out of range: {0}")]
    Overflow(String),
}

/// A parsed dice formula like "1d4 + 2", or a flat amount like "3".
///
/// A flat formula has `dice_count == 0` and `die_size == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    /// Number of dice to roll (X in XdY)
    pub dice_count: u8,
    /// Size of each die (Y in XdY)
    pub die_size: u8,
    /// Modifier to add/subtract after rolling (+Z or -Z), or the flat amount
    pub modifier: i32,
}

impl DiceFormula {
    /// Create a dice formula
    pub fn new(dice_count: u8, die_size: u8, modifier: i32) -> Result<Self, DiceParseError> {
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if die_size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        Ok(Self {
            dice_count,
            die_size,
            modifier,
        })
    }

    /// A formula that always yields `amount`
    pub fn flat(amount: i32) -> Self {
        Self {
            dice_count: 0,
            die_size: 0,
            modifier: amount,
        }
    }

    /// Parse a formula string like "3", "1d4 + 2", "2d6-1", "d20"
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if compact.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let Some(d_pos) = compact.find('d') else {
            let amount: i32 = compact.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Not a number or dice: '{}'", compact))
            })?;
            return Ok(Self::flat(amount));
        };

        let dice_count_str = &compact[..d_pos];
        let dice_count: u8 = if dice_count_str.is_empty() {
            1 // "d20" means "1d20"
        } else {
            dice_count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", dice_count_str))
            })?
        };

        let after_d = &compact[d_pos + 1..];
        let (die_size_str, modifier) = if let Some(plus_pos) = after_d.find('+') {
            let mod_str = &after_d[plus_pos + 1..];
            let modifier: i32 = mod_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid modifier: '+{}'", mod_str))
            })?;
            (&after_d[..plus_pos], modifier)
        } else if let Some(minus_pos) = after_d.find('-') {
            let mod_str = &after_d[minus_pos + 1..];
            let modifier: i32 = mod_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid modifier: '-{}'", mod_str))
            })?;
            (&after_d[..minus_pos], -modifier)
        } else {
            (after_d, 0)
        };

        let die_size: u8 = die_size_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", die_size_str))
        })?;

        Self::new(dice_count, die_size, modifier)
    }

    /// Whether this formula involves no dice at all
    pub fn is_flat(&self) -> bool {
        self.dice_count == 0
    }

    /// Roll the formula using `gen_range(min, max)` (inclusive) for each die.
    ///
    /// Fails with [`DiceParseError::Overflow`] when the total leaves `i32`.
    pub fn roll_with<F>(&self, mut gen_range: F) -> Result<DiceRollResult, DiceParseError>
    where
        F: FnMut(i32, i32) -> i32,
    {
        let individual_rolls: Vec<i32> = (0..self.dice_count)
            .map(|_| gen_range(1, self.die_size as i32))
            .collect();
        let dice_total = individual_rolls
            .iter()
            .try_fold(0i32, |acc, r| acc.checked_add(*r))
            .ok_or_else(|| self.overflow())?;
        let total = dice_total
            .checked_add(self.modifier)
            .ok_or_else(|| self.overflow())?;

        Ok(DiceRollResult {
            formula: *self,
            individual_rolls,
            dice_total,
            total,
        })
    }

    /// Get the minimum possible roll, `None` if it leaves `i32`
    pub fn min_roll(&self) -> Option<i32> {
        (self.dice_count as i32).checked_add(self.modifier)
    }

    /// Get the maximum possible roll, `None` if it leaves `i32`
    pub fn max_roll(&self) -> Option<i32> {
        (self.dice_count as i32)
            .checked_mul(self.die_size as i32)?
            .checked_add(self.modifier)
    }

    fn overflow(&self) -> DiceParseError {
        DiceParseError::Overflow(self.to_string())
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_flat() {
            return write!(f, "{}", self.modifier);
        }
        match self.modifier {
            0 => write!(f, "{}d{}", self.dice_count, self.die_size),
            m if m > 0 => write!(f, "{}d{} + {}", self.dice_count, self.die_size, m),
            m => write!(f, "{}d{} - {}", self.dice_count, self.die_size, -m),
        }
    }
}

impl std::str::FromStr for DiceFormula {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Result of rolling dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollResult {
    /// The formula that was rolled
    pub formula: DiceFormula,
    /// Individual die results
    pub individual_rolls: Vec<i32>,
    /// Sum of dice before modifier
    pub dice_total: i32,
    /// Final total (dice_total + modifier)
    pub total: i32,
}

impl DiceRollResult {
    /// Format as a breakdown string (e.g., "1d4[3] + 2 = 5" or "2 = 2")
    pub fn breakdown(&self) -> String {
        if self.formula.is_flat() {
            return format!("{} = {}", self.formula.modifier, self.total);
        }
        let rolls: Vec<String> = self.individual_rolls.iter().map(|r| r.to_string()).collect();
        let dice = format!(
            "{}d{}[{}]",
            self.formula.dice_count,
            self.formula.die_size,
            rolls.join(", ")
        );
        match self.formula.modifier {
            0 => format!("{} = {}", dice, self.total),
            m if m > 0 => format!("{} + {} = {}", dice, m, self.total),
            m => format!("{} - {} = {}", dice, -m, self.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_amount() {
        let formula = DiceFormula::parse("3").unwrap();
        assert!(formula.is_flat());
        assert_eq!(formula.modifier, 3);
        assert_eq!(DiceFormula::parse(" 0 ").unwrap(), DiceFormula::flat(0));
    }

    #[test]
    fn test_parse_spaced_modifier() {
        let formula = DiceFormula::parse("1d4 + 2").unwrap();
        assert_eq!(formula.dice_count, 1);
        assert_eq!(formula.die_size, 4);
        assert_eq!(formula.modifier, 2);
    }

    #[test]
    fn test_parse_negative_modifier() {
        let formula = DiceFormula::parse("2d6-1").unwrap();
        assert_eq!(formula.dice_count, 2);
        assert_eq!(formula.die_size, 6);
        assert_eq!(formula.modifier, -1);
    }

    #[test]
    fn test_parse_shorthand_and_case() {
        let formula = DiceFormula::parse("D20").unwrap();
        assert_eq!(formula.dice_count, 1);
        assert_eq!(formula.die_size, 20);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(DiceFormula::parse("   "), Err(DiceParseError::Empty)));
        assert!(matches!(
            DiceFormula::parse("1d4 + NaN"),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            DiceFormula::parse("0d4"),
            Err(DiceParseError::InvalidDiceCount)
        ));
        assert!(matches!(
            DiceFormula::parse("1d1"),
            Err(DiceParseError::InvalidDieSize)
        ));
        assert!(matches!(
            DiceFormula::parse("undefined"),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_roll_with_injected_rng() {
        let formula = DiceFormula::parse("1d4 + 1").unwrap();
        let result = formula.roll_with(|_, _| 2).unwrap();
        assert_eq!(result.individual_rolls, vec![2]);
        assert_eq!(result.total, 3);
    }

    #[test]
    fn test_roll_passes_die_bounds() {
        let formula = DiceFormula::parse("2d4").unwrap();
        let mut seen = Vec::new();
        formula
            .roll_with(|min, max| {
                seen.push((min, max));
                max
            })
            .unwrap();
        assert_eq!(seen, vec![(1, 4), (1, 4)]);
    }

    #[test]
    fn test_flat_roll_never_calls_rng() {
        let result = DiceFormula::flat(3)
            .roll_with(|_, _| panic!("flat formulas roll no dice"))
            .unwrap();
        assert_eq!(result.total, 3);
        assert!(result.individual_rolls.is_empty());
    }

    #[test]
    fn test_min_max() {
        let formula = DiceFormula::parse("1d4 + 3").unwrap();
        assert_eq!(formula.min_roll(), Some(4));
        assert_eq!(formula.max_roll(), Some(7));
    }

    #[test]
    fn test_modifier_at_i32_max_overflows_instead_of_panicking() {
        let formula = DiceFormula::parse("1d4+2147483647").unwrap();
        assert!(matches!(
            formula.roll_with(|_, max| max),
            Err(DiceParseError::Overflow(_))
        ));
        assert_eq!(formula.min_roll(), None);
        assert_eq!(formula.max_roll(), None);

        let low = DiceFormula::parse("1d4-2147483648");
        // "-2147483648" is parsed as the negation of a value that does not fit
        assert!(matches!(low, Err(DiceParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_die_results_that_sum_past_i32_overflow() {
        let formula = DiceFormula::new(2, 20, 0).unwrap();
        assert!(matches!(
            formula.roll_with(|_, _| i32::MAX),
            Err(DiceParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceFormula::new(1, 4, 0).unwrap().to_string(), "1d4");
        assert_eq!(DiceFormula::new(1, 4, 2).unwrap().to_string(), "1d4 + 2");
        assert_eq!(DiceFormula::new(2, 6, -1).unwrap().to_string(), "2d6 - 1");
        assert_eq!(DiceFormula::flat(5).to_string(), "5");
    }

    #[test]
    fn test_breakdown() {
        let result = DiceFormula::new(1, 4, 2)
            .unwrap()
            .roll_with(|_, _| 3)
            .unwrap();
        assert_eq!(result.breakdown(), "1d4[3] + 2 = 5");
        let flat = DiceFormula::flat(2).roll_with(|_, _| 0).unwrap();
        assert_eq!(flat.breakdown(), "2 = 2");
    }
}
