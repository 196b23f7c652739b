//! Outcome resolution for a single attack instance.
//!
//! A roll category decides which bands exist. The table lays the bands out in
//! fixed priority order (miss, dodge, parry, crit, hit) on `[0, 1)`, each band
//! clamped to whatever probability mass is left, so overlapping chances never
//! push the total past one. A single uniform draw then picks the band.

use crate::stats::{AttackerStats, DefenderStats};

/// Which outcome bands an attack can land in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollCategory {
    /// Yellow melee special: miss, dodge, parry (if the defender can), hit.
    MeleeSpecialHit,
    /// As [`Self::MeleeSpecialHit`] plus a crit band.
    MeleeSpecialHitAndCrit,
    /// Spell that can be resisted but never crits.
    MagicHit,
    MagicHitAndCrit,
    /// Periodic tick; always lands.
    Tick,
    /// Wrapper spells whose children roll on their own.
    AlwaysHit,
}

impl RollCategory {
    pub const fn can_miss(self) -> bool {
        !matches!(self, Self::Tick | Self::AlwaysHit)
    }

    pub const fn can_dodge(self) -> bool {
        matches!(self, Self::MeleeSpecialHit | Self::MeleeSpecialHitAndCrit)
    }

    pub const fn can_crit(self) -> bool {
        matches!(self, Self::MeleeSpecialHitAndCrit | Self::MagicHitAndCrit)
    }

    pub const fn is_magic(self) -> bool {
        matches!(self, Self::MagicHit | Self::MagicHitAndCrit)
    }

    /// Categories with a single band resolve without consuming a draw.
    pub const fn needs_roll(self) -> bool {
        self.can_miss() || self.can_crit()
    }
}

/// Result of resolving one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Miss,
    Dodge,
    Parry,
    Hit,
    Crit,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::Miss,
        Outcome::Dodge,
        Outcome::Parry,
        Outcome::Hit,
        Outcome::Crit,
    ];

    /// True for every outcome except a full miss, dodge or parry.
    pub const fn landed(self) -> bool {
        matches!(self, Self::Hit | Self::Crit)
    }

    pub const fn is_crit(self) -> bool {
        matches!(self, Self::Crit)
    }
}

/// Probability of each band for one attacker/defender/category combination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutcomeTable {
    pub miss: f64,
    pub dodge: f64,
    pub parry: f64,
    pub crit: f64,
}

impl OutcomeTable {
    /// Table that always lands as a normal hit.
    pub const ALWAYS_HIT: Self = Self {
        miss: 0.0,
        dodge: 0.0,
        parry: 0.0,
        crit: 0.0,
    };

    /// Builds the table for one attack.
    ///
    /// `bonus_crit` is the spell's own crit chance on top of the attacker's.
    pub fn build(
        category: RollCategory,
        attacker: &AttackerStats,
        defender: &DefenderStats,
        bonus_crit: f64,
    ) -> Self {
        let mut remaining = 1.0;
        let mut take = |chance: f64| {
            let band = chance.clamp(0.0, remaining);
            remaining -= band;
            band
        };

        let miss = if !category.can_miss() {
            0.0
        } else if category.is_magic() {
            take(defender.spell_miss - attacker.spell_hit)
        } else {
            take(defender.melee_miss - attacker.melee_hit)
        };

        let dodge = if category.can_dodge() {
            take(defender.dodge - attacker.expertise)
        } else {
            0.0
        };

        let parry = if category.can_dodge() && defender.can_parry {
            take(defender.parry - attacker.expertise)
        } else {
            0.0
        };

        let crit = if category.can_crit() {
            let base = if category.is_magic() {
                attacker.spell_crit
            } else {
                attacker.melee_crit
            };
            take(base + bonus_crit - defender.crit_suppression)
        } else {
            0.0
        };

        Self {
            miss,
            dodge,
            parry,
            crit,
        }
    }

    /// Probability of a normal hit: whatever the other bands leave.
    pub fn hit(&self) -> f64 {
        (1.0 - self.miss - self.dodge - self.parry - self.crit).max(0.0)
    }

    pub fn probability(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Miss => self.miss,
            Outcome::Dodge => self.dodge,
            Outcome::Parry => self.parry,
            Outcome::Hit => self.hit(),
            Outcome::Crit => self.crit,
        }
    }

    /// Picks the band containing `draw`, a uniform value in `[0, 1)`.
    pub fn select(&self, draw: f64) -> Outcome {
        let mut threshold = self.miss;
        if draw < threshold {
            return Outcome::Miss;
        }
        threshold += self.dodge;
        if draw < threshold {
            return Outcome::Dodge;
        }
        threshold += self.parry;
        if draw < threshold {
            return Outcome::Parry;
        }
        threshold += self.crit;
        if draw < threshold {
            return Outcome::Crit;
        }
        Outcome::Hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rogue() -> AttackerStats {
        AttackerStats {
            melee_hit: 0.05,
            melee_crit: 0.30,
            expertise: 0.02,
            ..AttackerStats::with_attack_power(2_000.0)
        }
    }

    #[test]
    fn bands_follow_priority_order() {
        let table = OutcomeTable {
            miss: 0.1,
            dodge: 0.1,
            parry: 0.1,
            crit: 0.2,
        };
        assert_eq!(table.select(0.05), Outcome::Miss);
        assert_eq!(table.select(0.15), Outcome::Dodge);
        assert_eq!(table.select(0.25), Outcome::Parry);
        assert_eq!(table.select(0.35), Outcome::Crit);
        assert_eq!(table.select(0.55), Outcome::Hit);
    }

    #[test]
    fn melee_special_hit_has_no_crit_band() {
        let table = OutcomeTable::build(
            RollCategory::MeleeSpecialHit,
            &rogue(),
            &DefenderStats::boss(),
            0.0,
        );
        assert_eq!(table.crit, 0.0);
        assert!((table.miss - 0.03).abs() < 1e-12);
        assert!((table.dodge - 0.045).abs() < 1e-12);
        assert_eq!(table.parry, 0.0);
    }

    #[test]
    fn parry_only_when_defender_can_parry() {
        let defender = DefenderStats {
            can_parry: true,
            ..DefenderStats::boss()
        };
        let table = OutcomeTable::build(RollCategory::MeleeSpecialHit, &rogue(), &defender, 0.0);
        assert!((table.parry - 0.12).abs() < 1e-12);
    }

    #[test]
    fn overlapping_chances_are_clamped() {
        let attacker = AttackerStats {
            spell_crit: 0.9,
            ..AttackerStats::default()
        };
        let defender = DefenderStats {
            spell_miss: 0.5,
            ..DefenderStats::default()
        };
        let table = OutcomeTable::build(RollCategory::MagicHitAndCrit, &attacker, &defender, 0.2);
        assert_eq!(table.miss, 0.5);
        assert_eq!(table.crit, 0.5);
        assert_eq!(table.hit(), 0.0);
    }

    #[test]
    fn tick_category_always_hits() {
        let table = OutcomeTable::build(
            RollCategory::Tick,
            &rogue(),
            &DefenderStats::boss(),
            0.5,
        );
        assert_eq!(table, OutcomeTable::ALWAYS_HIT);
        assert!(!RollCategory::Tick.needs_roll());
        assert_eq!(table.select(0.999), Outcome::Hit);
    }

    #[test]
    fn landed_excludes_avoidance() {
        assert!(Outcome::Hit.landed());
        assert!(Outcome::Crit.landed());
        assert!(!Outcome::Miss.landed());
        assert!(!Outcome::Dodge.landed());
        assert!(!Outcome::Parry.landed());
    }

    fn chance() -> impl Strategy<Value = f64> {
        -0.2f64..1.2
    }

    fn category() -> impl Strategy<Value = RollCategory> {
        prop_oneof![
            Just(RollCategory::MeleeSpecialHit),
            Just(RollCategory::MeleeSpecialHitAndCrit),
            Just(RollCategory::MagicHit),
            Just(RollCategory::MagicHitAndCrit),
            Just(RollCategory::Tick),
            Just(RollCategory::AlwaysHit),
        ]
    }

    proptest! {
        #[test]
        fn probabilities_sum_to_one(
            category in category(),
            hit in chance(),
            crit in chance(),
            miss in chance(),
            dodge in chance(),
            parry in chance(),
            can_parry in any::<bool>(),
            bonus in chance(),
        ) {
            let attacker = AttackerStats {
                melee_hit: hit,
                spell_hit: hit,
                melee_crit: crit,
                spell_crit: crit,
                ..AttackerStats::default()
            };
            let defender = DefenderStats {
                melee_miss: miss,
                spell_miss: miss,
                dodge,
                parry,
                can_parry,
                crit_suppression: 0.0,
            };
            let table = OutcomeTable::build(category, &attacker, &defender, bonus);
            let total: f64 = Outcome::ALL.iter().map(|o| table.probability(*o)).sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            for outcome in Outcome::ALL {
                prop_assert!(table.probability(outcome) >= 0.0);
            }
        }

        #[test]
        fn selection_is_a_pure_function_of_the_draw(draw in 0.0f64..1.0) {
            let table = OutcomeTable::build(
                RollCategory::MeleeSpecialHitAndCrit,
                &rogue(),
                &DefenderStats::boss(),
                0.05,
            );
            prop_assert_eq!(table.select(draw), table.select(draw));
        }
    }
}
