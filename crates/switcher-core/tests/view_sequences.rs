//! Property-based tests for tab state sequences
//!
//! Drives the view state machine through random click sequences and checks the
//! lock-step and reload rules hold after every step.

use proptest::prelude::*;
use switcher_core::{
    ButtonState, GroupCounts, OverlayVisibility, SwitcherError, TabGroup, ViewState,
};

fn group() -> impl Strategy<Value = TabGroup> {
    prop_oneof![Just(TabGroup::Tab1), Just(TabGroup::Tab2)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn both_present_clicks_track_last_selection(clicks in prop::collection::vec(group(), 1..30)) {
        let (mut state, _) = ViewState::initial(GroupCounts::new(1, 1)).unwrap();

        for &clicked in &clicks {
            let plan = state.select(clicked).expect("both groups present");

            // Target group in front, buttons and overlays agree
            let target = plan.group(clicked);
            prop_assert_eq!(target.overlays, OverlayVisibility::Shown);
            prop_assert_eq!(target.buttons, ButtonState::Active);

            let other = plan.group(clicked.other());
            prop_assert_eq!(other.overlays, OverlayVisibility::Hidden);
            prop_assert_eq!(other.buttons, ButtonState::Inactive);

            // Every click reloads, including repeats
            prop_assert_eq!(plan.reload, Some(clicked));
        }

        prop_assert_eq!(state.active(), clicks.last().copied());
    }

    #[test]
    fn single_group_ignores_missing_tab(
        tab1 in 0usize..4,
        tab2 in 0usize..4,
        clicks in prop::collection::vec(group(), 0..10),
    ) {
        let counts = GroupCounts::new(tab1, tab2);
        match ViewState::initial(counts) {
            Err(e) => {
                prop_assert_eq!(tab1 + tab2, 0);
                prop_assert_eq!(e, SwitcherError::NoDocuments);
            }
            Ok((mut state, initial)) => {
                prop_assert_eq!(initial.reload, None);
                let start = state.active();
                for clicked in clicks {
                    let plan = state.select(clicked);
                    prop_assert_eq!(plan.is_some(), counts.get(clicked) > 0);
                }
                if tab1 == 0 || tab2 == 0 {
                    prop_assert_eq!(state.active(), start);
                }
            }
        }
    }
}
