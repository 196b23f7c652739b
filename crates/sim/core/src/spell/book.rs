use std::collections::BTreeMap;
use std::sync::Arc;

use crate::spell::{ConfigError, SpellConfig};
use crate::state::ActionId;

/// Spells registered for one simulation run.
///
/// Each engine owns its own book; nothing is registered process-wide.
#[derive(Clone, Debug, Default)]
pub struct Spellbook {
    spells: BTreeMap<ActionId, Arc<SpellConfig>>,
}

impl Spellbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spell: SpellConfig) -> Result<(), ConfigError> {
        if self.spells.contains_key(&spell.id) {
            return Err(ConfigError::DuplicateSpell(spell.id));
        }
        self.spells.insert(spell.id, Arc::new(spell));
        Ok(())
    }

    pub fn get(&self, id: ActionId) -> Option<Arc<SpellConfig>> {
        self.spells.get(&id).cloned()
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.spells.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellConfig> {
        self.spells.values().map(Arc::as_ref)
    }

    /// Checks that every spell cast by a wrapper effect is registered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for spell in self.spells.values() {
            for missing in spell.effect.referenced_spells() {
                if !self.spells.contains_key(&missing) {
                    return Err(ConfigError::UnknownReference {
                        spell: spell.id,
                        missing,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::spell::{BaseDamage, EffectKind, TargetScope};
    use crate::stats::Loadout;

    fn spell(id: u32, effect: EffectKind) -> SpellConfig {
        SpellConfig::builder(ActionId(id), format!("spell {id}"))
            .effect(effect)
            .build(&Loadout::new(), &SimConfig::default())
            .unwrap()
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut book = Spellbook::new();
        let strike = EffectKind::DirectDamage {
            base: BaseDamage::Fixed(1.0),
        };
        book.register(spell(1, strike.clone())).unwrap();
        assert_eq!(
            book.register(spell(1, strike)),
            Err(ConfigError::DuplicateSpell(ActionId(1)))
        );
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn validate_reports_missing_child_spell() {
        let mut book = Spellbook::new();
        book.register(spell(
            2,
            EffectKind::CastOnTargets {
                spell: ActionId(3),
                scope: TargetScope::AllEnemies,
            },
        ))
        .unwrap();

        assert_eq!(
            book.validate(),
            Err(ConfigError::UnknownReference {
                spell: ActionId(2),
                missing: ActionId(3),
            })
        );
    }
}
