use serde::{Deserialize, Serialize};

use crate::entities::RoutePlan;

/// The inputs a plan was computed for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSelection {
    pub origin: String,
    pub customers: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteState {
    Idle,
    Ready,
}

/// Holds the latest plan of one session so re-renders do not call the
/// routing services again.
#[derive(Clone, Debug, Default)]
pub struct RouteCache {
    slot: Option<(RouteSelection, RoutePlan)>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RouteState {
        match self.slot {
            Some(_) => RouteState::Ready,
            None => RouteState::Idle,
        }
    }

    pub fn plan(&self) -> Option<&RoutePlan> {
        self.slot.as_ref().map(|(_, plan)| plan)
    }

    pub fn selection(&self) -> Option<&RouteSelection> {
        self.slot.as_ref().map(|(selection, _)| selection)
    }

    pub fn store(&mut self, selection: RouteSelection, plan: RoutePlan) -> &RoutePlan {
        let (_, plan) = self.slot.insert((selection, plan));
        plan
    }

    /// Records the customers currently selected. An empty or different
    /// selection drops the cached plan; returns whether it was dropped.
    /// Names are compared without surrounding whitespace.
    pub fn select(&mut self, customers: &[String]) -> bool {
        let stale = match self.selection() {
            Some(selection) => {
                customers.is_empty()
                    || selection.customers.len() != customers.len()
                    || selection
                        .customers
                        .iter()
                        .zip(customers)
                        .any(|(kept, given)| kept != given.trim())
            }
            None => false,
        };

        if stale {
            self.clear();
        }

        stale
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
