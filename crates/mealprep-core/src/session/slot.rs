use std::fmt;

use chrono::{DateTime, Utc};

/// A value produced by a generation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated<T> {
    pub value: T,
    pub generated_at: DateTime<Utc>,
}

/// A named unit of session state.
///
/// ```text
/// Empty     -> Populated   (first successful generation)
/// Populated -> Populated   (a newer generation overwrites)
/// ```
///
/// There is no way back to `Empty`: a failed action leaves the slot alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    Empty,
    Populated(Generated<T>),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> Slot<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Empty => None,
            Self::Populated(generated) => Some(&generated.value),
        }
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Empty => None,
            Self::Populated(generated) => Some(generated.generated_at),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn populate(&mut self, value: T) {
        *self = Self::Populated(Generated {
            value,
            generated_at: Utc::now(),
        });
    }
}

/// Where a slot's most recent generation action stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionStatus {
    #[default]
    Idle,
    Pending,
    Done,
    Failed,
}

impl ActionStatus {
    /// Check whether `from -> to` is an edge of the action graph:
    ///
    /// ```text
    /// idle    -> pending
    /// done    -> pending   (regenerate)
    /// failed  -> pending   (manual retry)
    /// pending -> done
    /// pending -> failed
    /// pending -> idle      (cancelled)
    /// ```
    pub fn is_valid_transition(from: ActionStatus, to: ActionStatus) -> bool {
        matches!(
            (from, to),
            (ActionStatus::Idle, ActionStatus::Pending)
                | (ActionStatus::Done, ActionStatus::Pending)
                | (ActionStatus::Failed, ActionStatus::Pending)
                | (ActionStatus::Pending, ActionStatus::Done)
                | (ActionStatus::Pending, ActionStatus::Failed)
                | (ActionStatus::Pending, ActionStatus::Idle)
        )
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Status of the latest action on one slot, with the failure message if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRecord {
    pub status: ActionStatus,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ActionStatus; 4] = [
        ActionStatus::Idle,
        ActionStatus::Pending,
        ActionStatus::Done,
        ActionStatus::Failed,
    ];

    #[test]
    fn valid_transitions() {
        assert!(ActionStatus::is_valid_transition(ActionStatus::Idle, ActionStatus::Pending));
        assert!(ActionStatus::is_valid_transition(ActionStatus::Done, ActionStatus::Pending));
        assert!(ActionStatus::is_valid_transition(ActionStatus::Failed, ActionStatus::Pending));
        assert!(ActionStatus::is_valid_transition(ActionStatus::Pending, ActionStatus::Done));
        assert!(ActionStatus::is_valid_transition(ActionStatus::Pending, ActionStatus::Failed));
        assert!(ActionStatus::is_valid_transition(ActionStatus::Pending, ActionStatus::Idle));
    }

    #[test]
    fn pending_is_the_only_way_in_or_out() {
        for from in ALL {
            for to in ALL {
                let touches_pending =
                    from == ActionStatus::Pending || to == ActionStatus::Pending;
                if !touches_pending || from == to {
                    assert!(
                        !ActionStatus::is_valid_transition(from, to),
                        "{from} -> {to} should be invalid"
                    );
                }
            }
        }
    }

    #[test]
    fn slot_starts_empty_and_overwrites() {
        let mut slot: Slot<&str> = Slot::default();
        assert!(slot.is_empty());
        assert_eq!(slot.get(), None);
        assert!(slot.generated_at().is_none());

        slot.populate("first");
        assert_eq!(slot.get(), Some(&"first"));
        let first_at = slot.generated_at().unwrap();

        slot.populate("second");
        assert_eq!(slot.get(), Some(&"second"));
        assert!(slot.generated_at().unwrap() >= first_at);
    }
}
