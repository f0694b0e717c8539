use crate::dynamics::EntityHandle;
use smallvec::SmallVec;

/// How a pair of collidables interacts.
///
/// Variants are ordered from the most to the least permissive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum CollisionRule {
    /// Let the next level of rules decide.
    #[default]
    Defer,
    /// Contacts are generated and solved.
    Normal,
    /// Contacts are generated but not solved.
    NoSolver,
    /// Bounding boxes overlap but no contacts are generated.
    NoNarrowPhase,
    /// The pair is never considered.
    NoBroadPhase,
}

/// A group of collidables sharing a collision rule among themselves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CollisionGroup {
    /// The identifier of this group.
    pub id: u32,
    /// The rule applied to pairs where both collidables belong to this group.
    pub rule: CollisionRule,
}

/// The rules deciding how a collidable interacts with others.
///
/// Rules are resolved per pair: specific rules first, then group rules, then the most
/// restrictive personal rule.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CollisionRules {
    /// The rule applied to every pair involving this collidable.
    pub personal: CollisionRule,
    /// The group of this collidable.
    pub group: Option<CollisionGroup>,
    specific: SmallVec<[(EntityHandle, CollisionRule); 4]>,
}

impl CollisionRules {
    /// Rules with only a personal rule.
    pub fn with_personal(personal: CollisionRule) -> Self {
        Self {
            personal,
            ..Default::default()
        }
    }

    /// Sets the rule used against the given entity.
    pub fn set_specific(&mut self, other: EntityHandle, rule: CollisionRule) {
        if let Some(entry) = self.specific.iter_mut().find(|(e, _)| *e == other) {
            entry.1 = rule;
        } else {
            self.specific.push((other, rule));
        }
    }

    /// Removes the rule used against the given entity.
    pub fn remove_specific(&mut self, other: EntityHandle) {
        self.specific.retain(|(e, _)| *e != other);
    }

    /// The rule used against the given entity, if any.
    pub fn specific(&self, other: EntityHandle) -> CollisionRule {
        self.specific
            .iter()
            .find(|(e, _)| *e == other)
            .map(|(_, rule)| *rule)
            .unwrap_or_default()
    }

    /// Resolves the rule applied between two collidables.
    pub fn rule_between(
        a: &CollisionRules,
        a_entity: Option<EntityHandle>,
        b: &CollisionRules,
        b_entity: Option<EntityHandle>,
    ) -> CollisionRule {
        let specific = b_entity
            .map(|e| a.specific(e))
            .unwrap_or_default()
            .max(a_entity.map(|e| b.specific(e)).unwrap_or_default());
        if specific != CollisionRule::Defer {
            return specific;
        }

        if let (Some(ga), Some(gb)) = (a.group, b.group) {
            if ga.id == gb.id && ga.rule != CollisionRule::Defer {
                return ga.rule;
            }
        }

        match a.personal.max(b.personal) {
            CollisionRule::Defer => CollisionRule::Normal,
            rule => rule,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{CollisionGroup, CollisionRule, CollisionRules};
    use crate::dynamics::EntityHandle;

    #[test]
    fn rules_resolution_order() {
        let (ea, eb) = (Some(EntityHandle(0)), Some(EntityHandle(1)));
        let mut a = CollisionRules::default();
        let mut b = CollisionRules::default();
        assert_eq!(CollisionRules::rule_between(&a, ea, &b, eb), CollisionRule::Normal);

        b.personal = CollisionRule::NoSolver;
        assert_eq!(CollisionRules::rule_between(&a, ea, &b, eb), CollisionRule::NoSolver);

        let group = Some(CollisionGroup {
            id: 3,
            rule: CollisionRule::NoBroadPhase,
        });
        a.group = group;
        b.group = group;
        assert_eq!(CollisionRules::rule_between(&a, ea, &b, eb), CollisionRule::NoBroadPhase);

        a.set_specific(EntityHandle(1), CollisionRule::Normal);
        assert_eq!(CollisionRules::rule_between(&a, ea, &b, eb), CollisionRule::Normal);
        a.remove_specific(EntityHandle(1));
        assert_eq!(a.specific(EntityHandle(1)), CollisionRule::Defer);
    }
}
