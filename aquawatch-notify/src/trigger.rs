//! Hysteresis trigger over risk-level transitions.
//!
//! The decision is a pure function of (previous, current) so arbitrary
//! transition sequences can be replayed deterministically; the stateful
//! wrapper threads the remembered previous level for the live loop.

use aquawatch_engine::RiskLevel;

/// Title and message for a qualifying transition, before the store assigns
/// an id and timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub risk_level: RiskLevel,
    pub previous_risk_level: RiskLevel,
}

/// Whether a (previous, current) transition warrants a notification.
///
/// Rules, in order: no change → no; entering critical → yes; leaving
/// critical → yes; restored to stable → yes; anything else → no.
pub fn should_notify(previous: RiskLevel, current: RiskLevel) -> bool {
    if previous == current {
        return false;
    }
    if current == RiskLevel::Critical {
        return true;
    }
    if previous == RiskLevel::Critical {
        return true;
    }
    if current == RiskLevel::Stable {
        return true;
    }
    false
}

/// Fixed wording keyed only by the two level values. Four cases: entering
/// critical, recovering from critical, restored to stable, generic change.
pub fn compose(previous: RiskLevel, current: RiskLevel) -> NotificationDraft {
    let (title, message) = if current == RiskLevel::Critical {
        (
            "CRITICAL ALERT: Water Quality Emergency".to_string(),
            "Water quality has reached CRITICAL levels. DO NOT use water for drinking, cooking, or bathing. Seek alternative water sources immediately and follow guidance from local authorities.".to_string(),
        )
    } else if previous == RiskLevel::Critical {
        (
            "Water Quality Update: Conditions Improving".to_string(),
            format!(
                "Water quality has improved from CRITICAL to {level}. While conditions are improving, please continue to follow safety guidelines. Current status: {level}.",
                level = current.as_str().to_uppercase()
            ),
        )
    } else if current == RiskLevel::Stable {
        (
            "Water Quality Restored".to_string(),
            "Water quality has returned to STABLE levels. Water is safe for all uses including drinking, cooking, and bathing. Continue normal usage.".to_string(),
        )
    } else {
        (
            "Water Quality Status Change".to_string(),
            format!(
                "Water quality status has changed from {} to {}. Please review current safety guidelines.",
                previous.as_str().to_uppercase(),
                current.as_str().to_uppercase()
            ),
        )
    };

    NotificationDraft { title, message, risk_level: current, previous_risk_level: previous }
}

/// Stateful wrapper remembering the previous level between checks.
#[derive(Debug)]
pub struct RiskTransitionTrigger {
    previous: RiskLevel,
}

impl RiskTransitionTrigger {
    pub fn new() -> Self {
        Self { previous: RiskLevel::Stable }
    }

    pub fn previous(&self) -> RiskLevel {
        self.previous
    }

    /// Observe the current level: emit a draft on a qualifying transition and
    /// remember the level for the next call either way.
    pub fn observe(&mut self, current: RiskLevel) -> Option<NotificationDraft> {
        let previous = self.previous;
        self.previous = current;
        if should_notify(previous, current) {
            Some(compose(previous, current))
        } else {
            None
        }
    }
}

impl Default for RiskTransitionTrigger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RiskLevel::*;

    #[test]
    fn test_no_change_is_silent() {
        assert!(!should_notify(Stable, Stable));
        assert!(!should_notify(Critical, Critical));
    }

    #[test]
    fn test_critical_entry_and_exit_notify() {
        assert!(should_notify(High, Critical));
        assert!(should_notify(Stable, Critical));
        assert!(should_notify(Critical, Moderate));
        assert!(should_notify(Critical, Stable));
    }

    #[test]
    fn test_stable_restoration_notifies() {
        assert!(should_notify(Moderate, Stable));
        assert!(should_notify(Low, Stable));
    }

    #[test]
    fn test_lateral_moves_are_silent() {
        assert!(!should_notify(Stable, High));
        assert!(!should_notify(Low, Moderate));
        assert!(!should_notify(Moderate, Low));
        assert!(!should_notify(High, Moderate));
    }

    #[test]
    fn test_spec_sequence() {
        let mut trigger = RiskTransitionTrigger::new();
        // stable→stable, stable→high: silent
        assert!(trigger.observe(Stable).is_none());
        assert!(trigger.observe(High).is_none());
        // high→critical: entry
        let entry = trigger.observe(Critical).unwrap();
        assert_eq!(entry.title, "CRITICAL ALERT: Water Quality Emergency");
        // critical→moderate: recovery
        let recovery = trigger.observe(Moderate).unwrap();
        assert!(recovery.message.contains("improved from CRITICAL to MODERATE"));
        // moderate→stable: restored
        let restored = trigger.observe(Stable).unwrap();
        assert_eq!(restored.title, "Water Quality Restored");
        // low→moderate→low: zero notifications
        assert!(trigger.observe(Low).is_none());
        assert!(trigger.observe(Moderate).is_none());
        assert!(trigger.observe(Low).is_none());
    }

    #[test]
    fn test_previous_level_updates_even_when_silent() {
        let mut trigger = RiskTransitionTrigger::new();
        assert!(trigger.observe(High).is_none());
        assert_eq!(trigger.previous(), High);
    }
}
