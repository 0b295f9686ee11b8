use std::collections::HashSet;

use serde::Serialize;

use crate::error::DataIntegrityError;
use crate::ui::{Icon, Route};

/// What activating a control asks for. The destination behavior itself lives
/// outside the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ActionIntent {
    Navigate(Route),
    /// No behavior is attached yet; activating it does nothing.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub name: String,
    pub icon: Icon,
    pub intent: ActionIntent,
}

impl QuickAction {
    pub fn new(name: &str, icon: Icon, intent: ActionIntent) -> Self {
        Self {
            name: name.to_string(),
            icon,
            intent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionRegistry {
    actions: Vec<QuickAction>,
}

impl ActionRegistry {
    pub fn new(actions: Vec<QuickAction>) -> Result<Self, DataIntegrityError> {
        let mut seen = HashSet::new();
        for action in &actions {
            if !seen.insert(action.name.as_str()) {
                return Err(DataIntegrityError::DuplicateAction(action.name.clone()));
            }
        }
        Ok(Self { actions })
    }

    /// Shortcuts shown in the dashboard's quick-actions panel.
    pub fn dashboard() -> Result<Self, DataIntegrityError> {
        Self::new(vec![
            QuickAction::new("Schedule Interview", Icon::Calendar, ActionIntent::Placeholder),
            QuickAction::new(
                "View Analytics",
                Icon::TrendingUp,
                ActionIntent::Navigate(Route::Analytics),
            ),
            QuickAction::new("Manage Team", Icon::Users, ActionIntent::Placeholder),
            QuickAction::new("Settings", Icon::Clock, ActionIntent::Placeholder),
        ])
    }

    pub fn actions(&self) -> &[QuickAction] {
        &self.actions
    }

    /// Returns the intent of the named action, or `None` when no action has that name.
    pub fn activate(&self, name: &str) -> Option<ActionIntent> {
        let wanted = name.trim();
        self.actions
            .iter()
            .find(|action| action.name.eq_ignore_ascii_case(wanted))
            .map(|action| {
                tracing::debug!(
                    action = %action.name,
                    intent = ?action.intent,
                    "quick action activated"
                );
                action.intent
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected() {
        let result = ActionRegistry::new(vec![
            QuickAction::new("Settings", Icon::Clock, ActionIntent::Placeholder),
            QuickAction::new("Settings", Icon::Users, ActionIntent::Placeholder),
        ]);
        assert_eq!(result, Err(DataIntegrityError::DuplicateAction("Settings".to_string())));
    }

    #[test]
    fn dashboard_registry_is_valid_and_ordered() {
        let registry = ActionRegistry::dashboard().unwrap();
        let names: Vec<&str> = registry.actions().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Schedule Interview", "View Analytics", "Manage Team", "Settings"]
        );
    }

    #[test]
    fn activation_returns_the_declared_intent() {
        let registry = ActionRegistry::dashboard().unwrap();
        assert_eq!(
            registry.activate("view analytics"),
            Some(ActionIntent::Navigate(Route::Analytics))
        );
        assert_eq!(registry.activate("Manage Team"), Some(ActionIntent::Placeholder));
        assert_eq!(registry.activate("Launch Rocket"), None);
    }
}
