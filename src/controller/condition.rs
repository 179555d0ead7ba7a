/// Mutually exclusive condition checkboxes
///
/// Checking one of the three flags clears the other two, so at most one
/// is ever checked. With none checked the condition is `Unspecified`.

use crate::state::data::Condition;

/// One of the three selectable condition checkboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFlag {
    Good,
    Damaged,
    Average,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionSelector {
    good: bool,
    damaged: bool,
    average: bool,
}

impl ConditionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A click on the checkbox: flip it, and clear the others if it is now checked
    pub fn toggle(&mut self, flag: ConditionFlag) {
        let checked = !self.is_checked(flag);
        self.set(flag, checked);
    }

    /// Set a checkbox directly; checking it clears the others
    pub fn set(&mut self, flag: ConditionFlag, checked: bool) {
        if checked {
            *self = Self::default();
        }
        match flag {
            ConditionFlag::Good => self.good = checked,
            ConditionFlag::Damaged => self.damaged = checked,
            ConditionFlag::Average => self.average = checked,
        }
    }

    pub fn is_checked(&self, flag: ConditionFlag) -> bool {
        match flag {
            ConditionFlag::Good => self.good,
            ConditionFlag::Damaged => self.damaged,
            ConditionFlag::Average => self.average,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn resolve(&self) -> Condition {
        if self.good {
            Condition::GoodCondition
        } else if self.damaged {
            Condition::Damaged
        } else if self.average {
            Condition::Average
        } else {
            Condition::Unspecified
        }
    }
}
