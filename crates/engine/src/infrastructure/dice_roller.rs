//! Formula evaluator backed by the domain dice parser.
//!
//! Stands in for the host's roller when running outside the host (sandbox
//! binary, end-to-end tests).

use std::sync::Arc;

use async_trait::async_trait;
use syb5e_domain::{DiceFormula, DiceParseError};

use crate::infrastructure::ports::{FormulaRoller, RandomPort, RollError};

pub struct DiceRoller {
    random: Arc<dyn RandomPort>,
}

impl DiceRoller {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }
}

#[async_trait]
impl FormulaRoller for DiceRoller {
    async fn roll(&self, formula: &str) -> Result<i64, RollError> {
        let invalid = |e: DiceParseError| RollError::InvalidFormula {
            formula: formula.to_string(),
            message: e.to_string(),
        };
        let dice = DiceFormula::parse(formula).map_err(invalid)?;
        let result = dice
            .roll_with(|min, max| self.random.gen_range(min, max))
            .map_err(invalid)?;
        tracing::trace!(formula = %formula, breakdown = %result.breakdown(), "Rolled formula");
        Ok(i64::from(result.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use crate::infrastructure::ports::MockRandomPort;

    #[tokio::test]
    async fn rolls_dice_plus_level() {
        let roller = DiceRoller::new(Arc::new(FixedRandom(3)));
        assert_eq!(roller.roll("1d4 + 2").await, Ok(5));
    }

    #[tokio::test]
    async fn plain_integers_do_not_touch_rng() {
        let mut random = MockRandomPort::new();
        random.expect_gen_range().never();
        let roller = DiceRoller::new(Arc::new(random));

        assert_eq!(roller.roll("0").await, Ok(0));
        assert_eq!(roller.roll("3").await, Ok(3));
    }

    #[tokio::test]
    async fn each_die_asks_for_one_to_die_size() {
        let mut random = MockRandomPort::new();
        random
            .expect_gen_range()
            .withf(|min, max| *min == 1 && *max == 4)
            .times(1)
            .returning(|_, _| 4);
        let roller = DiceRoller::new(Arc::new(random));

        assert_eq!(roller.roll("1d4 + 9").await, Ok(13));
    }

    #[tokio::test]
    async fn garbage_is_invalid_formula() {
        let roller = DiceRoller::new(Arc::new(FixedRandom(1)));
        let err = roller.roll("one d four").await.unwrap_err();
        assert!(matches!(err, RollError::InvalidFormula { .. }));
    }

    #[tokio::test]
    async fn modifier_past_i32_is_invalid_formula_not_a_panic() {
        let roller = DiceRoller::new(Arc::new(FixedRandom(4)));
        let err = roller.roll("1d4+2147483647").await.unwrap_err();
        assert!(matches!(err, RollError::InvalidFormula { .. }));
    }
}
