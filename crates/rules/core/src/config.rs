/// Rules configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Skill used by weapons that link neither a skill nor a specialization.
    pub default_weapon_skill: String,
    /// Skill used by spells that link neither a skill nor a specialization.
    pub default_spell_skill: String,
    /// Skill rolled to defend against melee attacks when the attack declares
    /// no usable defense skill.
    pub contact_combat_skill: String,
    /// Skill rolled to defend against ranged attacks when the attack declares
    /// no usable defense skill.
    pub default_defense_skill: String,
    /// Skill used for a counter-attack when no melee-capable weapon is carried.
    pub unarmed_skill: String,
    /// Damage expression of an unarmed counter-attack (e.g. `STR`).
    pub unarmed_damage: String,
    /// Light wound boxes before trait bonuses.
    pub base_light_boxes: usize,
    /// Severe wound boxes before trait bonuses.
    pub base_severe_boxes: usize,
}

impl RulesConfig {
    // ===== fixed rules constants =====
    /// Maximum risk reduction applied to a single roll.
    pub const RISK_REDUCTION_CAP: u32 = 3;
    /// Rating added on top of the parent skill for a specialization.
    pub const SPECIALIZATION_BONUS: u32 = 2;
    /// Faces on every die in the pool.
    pub const DIE_SIDES: u8 = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WEAPON_SKILL: &'static str = "Close Combat";
    pub const DEFAULT_SPELL_SKILL: &'static str = "Sorcery";
    pub const DEFAULT_CONTACT_COMBAT_SKILL: &'static str = "Close Combat";
    pub const DEFAULT_DEFENSE_SKILL: &'static str = "Athletics";
    pub const DEFAULT_UNARMED_SKILL: &'static str = "Close Combat";
    pub const DEFAULT_UNARMED_DAMAGE: &'static str = "STR";
    pub const DEFAULT_LIGHT_BOXES: usize = 2;
    pub const DEFAULT_SEVERE_BOXES: usize = 1;

    pub fn new() -> Self {
        Self {
            default_weapon_skill: Self::DEFAULT_WEAPON_SKILL.to_string(),
            default_spell_skill: Self::DEFAULT_SPELL_SKILL.to_string(),
            contact_combat_skill: Self::DEFAULT_CONTACT_COMBAT_SKILL.to_string(),
            default_defense_skill: Self::DEFAULT_DEFENSE_SKILL.to_string(),
            unarmed_skill: Self::DEFAULT_UNARMED_SKILL.to_string(),
            unarmed_damage: Self::DEFAULT_UNARMED_DAMAGE.to_string(),
            base_light_boxes: Self::DEFAULT_LIGHT_BOXES,
            base_severe_boxes: Self::DEFAULT_SEVERE_BOXES,
        }
    }

    #[must_use]
    pub fn with_contact_combat_skill(mut self, skill: impl Into<String>) -> Self {
        self.contact_combat_skill = skill.into();
        self
    }

    #[must_use]
    pub fn with_unarmed_skill(mut self, skill: impl Into<String>) -> Self {
        self.unarmed_skill = skill.into();
        self
    }

    #[must_use]
    pub fn with_unarmed_damage(mut self, damage: impl Into<String>) -> Self {
        self.unarmed_damage = damage.into();
        self
    }

    #[must_use]
    pub fn with_base_boxes(mut self, light: usize, severe: usize) -> Self {
        self.base_light_boxes = light;
        self.base_severe_boxes = severe;
        self
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
