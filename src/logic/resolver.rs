use super::engine::RuleOutcome;
use crate::models::{Action, Priority};
use std::collections::HashSet;

/// Merge candidate actions by code: first-occurrence order, reasons
/// concatenated in evaluation order. One action per distinct code.
fn merge_by_code(actions: Vec<Action>) -> Vec<Action> {
    let mut merged: Vec<Action> = Vec::new();
    for action in actions {
        match merged.iter_mut().find(|a| a.code == action.code) {
            Some(existing) => existing.reasons.extend(action.reasons),
            None => merged.push(action),
        }
    }
    merged
}

/// Conflict resolution and priority assignment.
///
/// A disallow always wins over a recommendation for the same code,
/// regardless of evaluation order. Disallowed actions pass through
/// unchanged; surviving recommendations get a tier from `rank` and are
/// stable-sorted by descending tier, so equal-tier entries keep their
/// rule-declaration order.
pub fn resolve<F>(outcome: RuleOutcome, rank: F) -> (Vec<(Action, Priority)>, Vec<Action>)
where
    F: Fn(&str) -> Priority,
{
    let (recommended, disallowed) = outcome.into_parts();
    let recommended = merge_by_code(recommended);
    let disallowed = merge_by_code(disallowed);

    let blocked: HashSet<&str> = disallowed.iter().map(|a| a.code.as_str()).collect();

    let mut recommendations: Vec<(Action, Priority)> = recommended
        .into_iter()
        .filter(|a| !blocked.contains(a.code.as_str()))
        .map(|a| {
            let priority = rank(&a.code);
            (a, priority)
        })
        .collect();

    // Vec::sort_by is stable; descending tier.
    recommendations.sort_by(|a, b| b.1.cmp(&a.1));

    (recommendations, disallowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reason;

    fn rank_table(code: &str) -> Priority {
        match code {
            "URGENT_A" | "URGENT_B" => Priority::High,
            "ADVISORY" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    #[test]
    fn disallow_wins_over_recommendation() {
        let mut outcome = RuleOutcome::new();
        outcome.recommend("IRRIGATE_TODAY", vec![Reason::new("soil_moisture_low")]);
        outcome.forbid("IRRIGATE_TODAY", vec![Reason::new("wet_conditions")]);
        outcome.recommend("SCOUT_APHIDS", vec![Reason::new("aphids_observed")]);

        let (recs, not_recs) = resolve(outcome, rank_table);

        assert!(recs.iter().all(|(a, _)| a.code != "IRRIGATE_TODAY"));
        assert_eq!(recs.len(), 1);
        assert_eq!(not_recs.len(), 1);
        assert_eq!(not_recs[0].code, "IRRIGATE_TODAY");
        assert_eq!(not_recs[0].reasons[0].key, "wet_conditions");
    }

    #[test]
    fn repeated_codes_merge_with_concatenated_reasons() {
        let mut outcome = RuleOutcome::new();
        outcome.recommend("CHECK", vec![Reason::new("first")]);
        outcome.recommend("CHECK", vec![Reason::new("second")]);
        outcome.forbid("SPRAY", vec![Reason::new("wind")]);
        outcome.forbid("SPRAY", vec![Reason::new("heat")]);

        let (recs, not_recs) = resolve(outcome, rank_table);

        assert_eq!(recs.len(), 1);
        let keys: Vec<&str> = recs[0].0.reasons.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["first", "second"]);

        assert_eq!(not_recs.len(), 1);
        let keys: Vec<&str> = not_recs[0].reasons.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["wind", "heat"]);
    }

    #[test]
    fn sorted_by_descending_tier_stable_within_tier() {
        let mut outcome = RuleOutcome::new();
        outcome.recommend("ADVISORY", vec![]);
        outcome.recommend("PLAIN_ONE", vec![]);
        outcome.recommend("URGENT_A", vec![]);
        outcome.recommend("PLAIN_TWO", vec![]);
        outcome.recommend("URGENT_B", vec![]);

        let (recs, _) = resolve(outcome, rank_table);
        let order: Vec<&str> = recs.iter().map(|(a, _)| a.code.as_str()).collect();
        assert_eq!(
            order,
            ["URGENT_A", "URGENT_B", "PLAIN_ONE", "PLAIN_TWO", "ADVISORY"]
        );
    }

    #[test]
    fn disallowed_order_is_preserved() {
        let mut outcome = RuleOutcome::new();
        outcome.forbid("B", vec![]);
        outcome.forbid("A", vec![]);

        let (_, not_recs) = resolve(outcome, rank_table);
        let order: Vec<&str> = not_recs.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(order, ["B", "A"]);
    }
}
