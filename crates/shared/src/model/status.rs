/// Soft-delete state shared by categories and products, persisted as the `active` column.
///
/// `Active -> Inactive` is a soft delete; `Inactive -> Active` is an activation.
/// Both transitions are idempotent, and rows are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationState {
    Active,
    Inactive,
}

impl ActivationState {
    pub fn is_active(self) -> bool {
        matches!(self, ActivationState::Active)
    }

    pub fn as_flag(self) -> bool {
        self.is_active()
    }
}

impl From<bool> for ActivationState {
    fn from(active: bool) -> Self {
        if active {
            ActivationState::Active
        } else {
            ActivationState::Inactive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_round_trips() {
        assert_eq!(ActivationState::from(true), ActivationState::Active);
        assert_eq!(ActivationState::from(false), ActivationState::Inactive);
        assert!(ActivationState::Active.as_flag());
        assert!(!ActivationState::Inactive.as_flag());
    }
}
