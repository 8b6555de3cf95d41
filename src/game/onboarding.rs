//! First-run tutorial progress

use serde::{Deserialize, Serialize};

/// Screens that show a tutorial on first visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Missions,
    Habits,
    Reflection,
    Shop,
}

impl View {
    pub const ALL: [View; 4] = [View::Missions, View::Habits, View::Reflection, View::Shop];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitedViews {
    pub missions: bool,
    pub habits: bool,
    pub reflection: bool,
    pub shop: bool,
}

impl VisitedViews {
    pub fn flag(&self, view: View) -> bool {
        match view {
            View::Missions => self.missions,
            View::Habits => self.habits,
            View::Reflection => self.reflection,
            View::Shop => self.shop,
        }
    }

    fn flag_mut(&mut self, view: View) -> &mut bool {
        match view {
            View::Missions => &mut self.missions,
            View::Habits => &mut self.habits,
            View::Reflection => &mut self.reflection,
            View::Shop => &mut self.shop,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Onboarding {
    pub completed: bool,
    pub visited_views: VisitedViews,
    pub skipped_tutorials: bool,
}

impl Onboarding {
    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn mark_visited(&mut self, view: View) {
        *self.visited_views.flag_mut(view) = true;
    }

    pub fn has_visited(&self, view: View) -> bool {
        self.visited_views.flag(view)
    }

    /// Skip every tutorial, marking all views visited
    pub fn skip_all(&mut self) {
        self.skipped_tutorials = true;
        for view in View::ALL {
            self.mark_visited(view);
        }
    }
}
