//! Tab visibility state machine
//!
//! The widget holds at most two document groups. `ViewState` tracks which one is
//! showing and every transition yields a `ViewPlan` describing the DOM effects,
//! so the transition logic can be tested without a browser.

use crate::error::SwitcherError;

/// One of the two document groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabGroup {
    Tab1,
    Tab2,
}

impl TabGroup {
    /// The opposite group
    pub fn other(self) -> Self {
        match self {
            TabGroup::Tab1 => TabGroup::Tab2,
            TabGroup::Tab2 => TabGroup::Tab1,
        }
    }

    /// 1-based tab number as used by the JS API
    pub fn number(self) -> u8 {
        match self {
            TabGroup::Tab1 => 1,
            TabGroup::Tab2 => 2,
        }
    }

    /// Parse a 1-based tab number
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(TabGroup::Tab1),
            2 => Some(TabGroup::Tab2),
            _ => None,
        }
    }
}

/// Number of document overlays discovered for each group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupCounts {
    pub tab1: usize,
    pub tab2: usize,
}

impl GroupCounts {
    pub fn new(tab1: usize, tab2: usize) -> Self {
        Self { tab1, tab2 }
    }

    /// Overlay count for a group
    pub fn get(&self, group: TabGroup) -> usize {
        match group {
            TabGroup::Tab1 => self.tab1,
            TabGroup::Tab2 => self.tab2,
        }
    }
}

/// Which group is currently visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    None,
    OnlyTab1,
    OnlyTab2,
    BothPresent { active: TabGroup },
}

/// Desired overlay presentation for a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayVisibility {
    /// Visible, full opacity, top of the stack, in layout
    Shown,
    /// Invisible, zero opacity, lower stack, out of layout
    Hidden,
    Untouched,
}

/// Desired button presentation for a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Active,
    Inactive,
    /// Removed from layout entirely (single document, nothing to toggle)
    Removed,
    Untouched,
}

/// Presentation of one group's buttons and overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPresentation {
    pub overlays: OverlayVisibility,
    pub buttons: ButtonState,
}

/// DOM effects required by a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPlan {
    pub tab1: GroupPresentation,
    pub tab2: GroupPresentation,
    /// Group whose embedded documents must be reloaded after styling
    pub reload: Option<TabGroup>,
}

impl ViewPlan {
    /// Presentation for a single group
    pub fn group(&self, group: TabGroup) -> GroupPresentation {
        match group {
            TabGroup::Tab1 => self.tab1,
            TabGroup::Tab2 => self.tab2,
        }
    }

    fn with_groups(
        target: TabGroup,
        target_pres: GroupPresentation,
        other_pres: GroupPresentation,
        reload: Option<TabGroup>,
    ) -> Self {
        match target {
            TabGroup::Tab1 => Self {
                tab1: target_pres,
                tab2: other_pres,
                reload,
            },
            TabGroup::Tab2 => Self {
                tab1: other_pres,
                tab2: target_pres,
                reload,
            },
        }
    }

    /// Only `group` has documents: show them and drop both button sets
    fn single(group: TabGroup) -> Self {
        Self::with_groups(
            group,
            GroupPresentation {
                overlays: OverlayVisibility::Shown,
                buttons: ButtonState::Removed,
            },
            GroupPresentation {
                overlays: OverlayVisibility::Untouched,
                buttons: ButtonState::Removed,
            },
            None,
        )
    }

    /// Both groups present, `active` in front
    fn activate(active: TabGroup, reload: bool) -> Self {
        Self::with_groups(
            active,
            GroupPresentation {
                overlays: OverlayVisibility::Shown,
                buttons: ButtonState::Active,
            },
            GroupPresentation {
                overlays: OverlayVisibility::Hidden,
                buttons: ButtonState::Inactive,
            },
            reload.then_some(active),
        )
    }
}

impl ViewState {
    /// Compute the initial view from discovered overlay counts
    ///
    /// # Errors
    /// Returns `SwitcherError::NoDocuments` when neither group has overlays.
    /// The caller is expected to log it and leave the widget empty.
    pub fn initial(counts: GroupCounts) -> Result<(ViewState, ViewPlan), SwitcherError> {
        match (counts.tab1 > 0, counts.tab2 > 0) {
            (true, false) => Ok((ViewState::OnlyTab1, ViewPlan::single(TabGroup::Tab1))),
            (false, true) => Ok((ViewState::OnlyTab2, ViewPlan::single(TabGroup::Tab2))),
            (true, true) => Ok((
                ViewState::BothPresent {
                    active: TabGroup::Tab1,
                },
                ViewPlan::activate(TabGroup::Tab1, false),
            )),
            (false, false) => Err(SwitcherError::NoDocuments),
        }
    }

    /// Select a group in response to a tab click
    ///
    /// Returns `None` when the group has no documents. Re-selecting the active
    /// group still produces a plan with a reload.
    pub fn select(&mut self, group: TabGroup) -> Option<ViewPlan> {
        let next = match (*self, group) {
            (ViewState::BothPresent { .. }, _) => ViewState::BothPresent { active: group },
            (ViewState::OnlyTab1, TabGroup::Tab1) => ViewState::OnlyTab1,
            (ViewState::OnlyTab2, TabGroup::Tab2) => ViewState::OnlyTab2,
            _ => return None,
        };
        *self = next;
        Some(ViewPlan::activate(group, true))
    }

    /// The group currently in front, if any
    pub fn active(&self) -> Option<TabGroup> {
        match self {
            ViewState::None => None,
            ViewState::OnlyTab1 => Some(TabGroup::Tab1),
            ViewState::OnlyTab2 => Some(TabGroup::Tab2),
            ViewState::BothPresent { active } => Some(*active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_only_tab1_shows_overlays_and_removes_buttons() {
        let (state, plan) = ViewState::initial(GroupCounts::new(1, 0)).unwrap();
        assert_eq!(state, ViewState::OnlyTab1);
        assert_eq!(plan.tab1.overlays, OverlayVisibility::Shown);
        assert_eq!(plan.tab1.buttons, ButtonState::Removed);
        assert_eq!(plan.tab2.buttons, ButtonState::Removed);
        assert_eq!(plan.reload, None);
    }

    #[test]
    fn test_only_tab2_is_symmetric() {
        let (state, plan) = ViewState::initial(GroupCounts::new(0, 3)).unwrap();
        assert_eq!(state, ViewState::OnlyTab2);
        assert_eq!(plan.tab2.overlays, OverlayVisibility::Shown);
        assert_eq!(plan.tab1.overlays, OverlayVisibility::Untouched);
        assert_eq!(plan.tab1.buttons, ButtonState::Removed);
        assert_eq!(plan.tab2.buttons, ButtonState::Removed);
    }

    #[test]
    fn test_both_present_defaults_to_tab1() {
        let (state, plan) = ViewState::initial(GroupCounts::new(2, 2)).unwrap();
        assert_eq!(
            state,
            ViewState::BothPresent {
                active: TabGroup::Tab1
            }
        );
        assert_eq!(
            plan.tab1,
            GroupPresentation {
                overlays: OverlayVisibility::Shown,
                buttons: ButtonState::Active,
            }
        );
        assert_eq!(
            plan.tab2,
            GroupPresentation {
                overlays: OverlayVisibility::Hidden,
                buttons: ButtonState::Inactive,
            }
        );
        assert_eq!(plan.reload, None);
    }

    #[test]
    fn test_no_documents_is_error() {
        let result = ViewState::initial(GroupCounts::default());
        assert_eq!(result.unwrap_err(), SwitcherError::NoDocuments);
    }

    #[test]
    fn test_select_swaps_and_reloads() {
        let (mut state, _) = ViewState::initial(GroupCounts::new(1, 1)).unwrap();
        let plan = state.select(TabGroup::Tab2).unwrap();
        assert_eq!(state.active(), Some(TabGroup::Tab2));
        assert_eq!(plan.tab2.overlays, OverlayVisibility::Shown);
        assert_eq!(plan.tab1.overlays, OverlayVisibility::Hidden);
        assert_eq!(plan.tab2.buttons, ButtonState::Active);
        assert_eq!(plan.tab1.buttons, ButtonState::Inactive);
        assert_eq!(plan.reload, Some(TabGroup::Tab2));
    }

    #[test]
    fn test_reselect_active_still_reloads() {
        let (mut state, _) = ViewState::initial(GroupCounts::new(1, 1)).unwrap();
        let first = state.select(TabGroup::Tab1).unwrap();
        let second = state.select(TabGroup::Tab1).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.reload, Some(TabGroup::Tab1));
    }

    #[test]
    fn test_select_missing_group_is_ignored() {
        let (mut state, _) = ViewState::initial(GroupCounts::new(1, 0)).unwrap();
        assert!(state.select(TabGroup::Tab2).is_none());
        assert_eq!(state, ViewState::OnlyTab1);

        let mut empty = ViewState::default();
        assert!(empty.select(TabGroup::Tab1).is_none());
        assert_eq!(empty.active(), None);
    }

    #[test]
    fn test_tab_numbers() {
        assert_eq!(TabGroup::from_number(1), Some(TabGroup::Tab1));
        assert_eq!(TabGroup::from_number(2), Some(TabGroup::Tab2));
        assert_eq!(TabGroup::from_number(3), None);
        assert_eq!(TabGroup::Tab2.number(), 2);
        assert_eq!(TabGroup::Tab1.other(), TabGroup::Tab2);
    }
}
