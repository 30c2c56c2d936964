//! Multiclass prerequisites, secondary-class gains and advisory warnings.

use crate::abilities::{Ability, AbilityScores, Skill};
use crate::catalog::{normalize_key, CasterType, Catalog, MulticlassPrerequisite, PrerequisiteRule};
use crate::config::RulesOptions;
use crate::diagnostics::{Notice, NoticeLog, Resolved};
use serde::{Deserialize, Serialize};

/// One requirement line and whether the character meets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementStatus {
    pub ability: Ability,
    pub minimum: u8,
    pub score: u8,
    pub met: bool,
}

/// Whether a class can be taken as an additional class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEligibility {
    pub class_id: String,
    pub class_name: String,
    pub rule: PrerequisiteRule,
    pub eligible: bool,
    pub requirements: Vec<RequirementStatus>,
}

/// Evaluate a prerequisite against current scores.
///
/// Each line reports its own state. An empty requirement list is always met.
pub fn evaluate_prerequisite(
    prerequisite: &MulticlassPrerequisite,
    scores: &AbilityScores,
) -> (bool, Vec<RequirementStatus>) {
    let requirements: Vec<RequirementStatus> = prerequisite
        .requirements
        .iter()
        .map(|req| {
            let score = scores.get(req.ability);
            RequirementStatus {
                ability: req.ability,
                minimum: req.minimum,
                score,
                met: score >= req.minimum,
            }
        })
        .collect();
    let eligible = requirements.is_empty()
        || match prerequisite.rule {
            PrerequisiteRule::All => requirements.iter().all(|r| r.met),
            PrerequisiteRule::Any => requirements.iter().any(|r| r.met),
        };
    (eligible, requirements)
}

/// Every class not already held, in class id order, with its eligibility.
///
/// Held ids missing from the catalog are reported as notices.
pub fn eligible_classes<S: AsRef<str>>(
    catalog: &Catalog,
    scores: &AbilityScores,
    current_class_ids: &[S],
) -> Resolved<Vec<ClassEligibility>> {
    let mut log = NoticeLog::new();
    let held: Vec<String> = current_class_ids
        .iter()
        .map(|id| normalize_key(id.as_ref()))
        .collect();
    for id in current_class_ids {
        if catalog.class(id.as_ref()).is_none() {
            log.push(Notice::UnknownClass {
                id: id.as_ref().to_string(),
            });
        }
    }

    let candidates = catalog
        .classes()
        .filter(|class| !held.contains(&normalize_key(&class.id)))
        .map(|class| {
            let (eligible, requirements) = evaluate_prerequisite(&class.prerequisite, scores);
            ClassEligibility {
                class_id: class.id.clone(),
                class_name: class.name.clone(),
                rule: class.prerequisite.rule,
                eligible,
                requirements,
            }
        })
        .collect();
    log.finish(candidates)
}

/// What a character gains by taking a class as a secondary class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGains {
    pub class_id: String,
    pub class_name: String,
    pub hit_die: u8,
    pub armor: Vec<String>,
    pub weapons: Vec<String>,
    pub tools: Vec<String>,
    pub skill_choices: u8,
    pub skill_options: Vec<Skill>,
    /// Weight for combined caster level; slot tables are merged by the caller.
    pub caster_type: CasterType,
}

/// Reduced proficiency set for multiclassing into `class_id`.
///
/// An unknown class yields only the fallback hit die.
pub fn multiclass_gains(
    catalog: &Catalog,
    class_id: &str,
    options: &RulesOptions,
) -> Resolved<ClassGains> {
    let mut log = NoticeLog::new();
    let gains = match catalog.class(class_id) {
        Some(class) => ClassGains {
            class_id: class.id.clone(),
            class_name: class.name.clone(),
            hit_die: class.hit_die,
            armor: class.multiclass.armor.clone(),
            weapons: class.multiclass.weapons.clone(),
            tools: class.multiclass.tools.clone(),
            skill_choices: class.multiclass.skill_choices,
            skill_options: class.multiclass.skill_options.clone(),
            caster_type: class.caster_type(),
        },
        None => {
            log.push(Notice::UnknownClass {
                id: class_id.to_string(),
            });
            ClassGains {
                class_id: class_id.to_string(),
                class_name: class_id.to_string(),
                hit_die: options.fallback_hit_die,
                armor: Vec::new(),
                weapons: Vec::new(),
                tools: Vec::new(),
                skill_choices: 0,
                skill_options: Vec::new(),
                caster_type: CasterType::None,
            }
        }
    };
    log.finish(gains)
}

/// Advisory texts for known problematic class combinations. Never blocking.
pub fn multiclass_warnings<S: AsRef<str>>(catalog: &Catalog, class_ids: &[S]) -> Vec<String> {
    let held: Vec<String> = class_ids.iter().map(|id| id.as_ref().to_string()).collect();
    let mut messages: Vec<String> = Vec::new();
    for warning in catalog.warnings() {
        if warning.applies_to(&held) && !messages.contains(&warning.message) {
            messages.push(warning.message.clone());
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AbilityRequirement;
    use crate::srd::srd;

    fn find<'a>(list: &'a [ClassEligibility], id: &str) -> &'a ClassEligibility {
        list.iter().find(|c| c.class_id == id).unwrap()
    }

    #[test]
    fn test_any_of_rule() {
        // Fighter needs STR 13 or DEX 13
        let scores = AbilityScores::new(8, 14, 10, 10, 10, 10);
        let list = eligible_classes(srd(), &scores, &["wizard"]).value;
        let fighter = find(&list, "fighter");
        assert_eq!(fighter.rule, PrerequisiteRule::Any);
        assert!(fighter.eligible);
        assert!(!fighter.requirements[0].met);
        assert!(fighter.requirements[1].met);
    }

    #[test]
    fn test_all_of_rule_with_one_miss() {
        // Paladin needs STR 13 and CHA 13
        let scores = AbilityScores::new(15, 10, 10, 10, 10, 12);
        let list = eligible_classes(srd(), &scores, &["fighter"]).value;
        let paladin = find(&list, "paladin");
        assert!(!paladin.eligible);
        assert_eq!(
            paladin.requirements,
            vec![
                RequirementStatus {
                    ability: Ability::Strength,
                    minimum: 13,
                    score: 15,
                    met: true
                },
                RequirementStatus {
                    ability: Ability::Charisma,
                    minimum: 13,
                    score: 12,
                    met: false
                },
            ]
        );
    }

    #[test]
    fn test_held_classes_excluded_and_ordered() {
        let scores = AbilityScores::default();
        let held = vec!["Rogue".to_string(), "mystic".to_string()];
        let resolved = eligible_classes(srd(), &scores, &held);
        assert_eq!(
            resolved.notices,
            vec![Notice::UnknownClass {
                id: "mystic".into()
            }]
        );
        let ids: Vec<&str> = resolved.value.iter().map(|c| c.class_id.as_str()).collect();
        assert_eq!(ids.len(), 11);
        assert!(!ids.contains(&"rogue"));
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        // All SRD thresholds are 13, so default scores of 10 qualify for nothing
        assert!(resolved.value.iter().all(|c| !c.eligible));
    }

    #[test]
    fn test_empty_requirements_are_met() {
        let prerequisite = MulticlassPrerequisite::default();
        let scores = AbilityScores::new(3, 3, 3, 3, 3, 3);
        let (eligible, lines) = evaluate_prerequisite(&prerequisite, &scores);
        assert!(eligible);
        assert!(lines.is_empty());

        let any = MulticlassPrerequisite {
            rule: PrerequisiteRule::Any,
            requirements: vec![AbilityRequirement::new(Ability::Wisdom, 13)],
        };
        let (eligible, _) = evaluate_prerequisite(&any, &AbilityScores::default());
        assert!(!eligible);
    }

    #[test]
    fn test_gains() {
        let options = RulesOptions::default();
        let rogue = multiclass_gains(srd(), "rogue", &options);
        assert!(rogue.is_clean());
        assert_eq!(rogue.value.hit_die, 8);
        assert_eq!(rogue.value.armor, vec!["Light armor".to_string()]);
        assert_eq!(rogue.value.tools, vec!["Thieves' Tools".to_string()]);
        assert_eq!(rogue.value.skill_choices, 1);

        let paladin = multiclass_gains(srd(), "paladin", &options).value;
        assert_eq!(paladin.caster_type, CasterType::Half);
        assert!(paladin.weapons.contains(&"Martial weapons".to_string()));

        let unknown = multiclass_gains(srd(), "blood_hunter", &options);
        assert_eq!(unknown.value.hit_die, 8);
        assert_eq!(unknown.notices.len(), 1);
    }

    #[test]
    fn test_warnings() {
        let warnings = multiclass_warnings(srd(), &["Barbarian", "Wizard", "Sorcerer"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Rage"));

        let warnings = multiclass_warnings(srd(), &["warlock", "sorcerer", "monk"]);
        assert_eq!(warnings.len(), 1);

        assert!(multiclass_warnings(srd(), &["fighter", "rogue"]).is_empty());
    }
}
