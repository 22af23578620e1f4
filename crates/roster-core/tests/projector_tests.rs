use proptest::prelude::*;
use roster_core::projector::{project, project_categories};
use roster_core::{
    ActivityMap, Catalog, Category, Filter, RosterBody, RosterSnapshot, RosterState, RosterView,
};
use roster_test_utils::activity;
use std::sync::Arc;

fn roster() -> impl Strategy<Value = ActivityMap> {
    let entry = (
        "[A-Z][a-z]{2,8}( Club| Team)?",
        prop_oneof![Just("Sports"), Just("Arts"), Just("Games")],
        1u32..40,
        prop::collection::vec("[a-z]{3,6}@school\\.edu", 0..5),
        prop_oneof![Just(1.0f64), Just(1.5), Just(2.0)],
    );
    prop::collection::vec(entry, 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(name, category, max, participants, hours)| {
                let refs: Vec<&str> = participants.iter().map(String::as_str).collect();
                (name, activity(category, max, &refs, hours))
            })
            .collect()
    })
}

fn view_of(activities: ActivityMap) -> RosterView {
    let mut catalog = Catalog::new();
    catalog.extend_activities(activities.keys());
    catalog.extend_categories(activities.values().map(|a| a.category.clone()));
    RosterView {
        state: RosterState::Loaded(Arc::new(RosterSnapshot {
            filter: Filter::All,
            activities,
        })),
        catalog,
    }
}

proptest! {
    #[test]
    fn projection_is_a_pure_function_of_the_view(activities in roster()) {
        let view = view_of(activities);
        prop_assert_eq!(project(&view), project(&view));
    }

    #[test]
    fn one_card_per_activity_in_response_order(activities in roster()) {
        let names: Vec<String> = activities.keys().cloned().collect();
        let RosterBody::Cards(cards) = project(&view_of(activities.clone())).body else {
            panic!("loaded view projects to cards");
        };
        let card_names: Vec<String> = cards.iter().map(|c| c.name.clone()).collect();
        prop_assert_eq!(card_names, names);
        for card in &cards {
            let source = &activities[&card.name];
            prop_assert_eq!(card.participants.len(), source.participants.len());
            prop_assert_eq!(card.spots_left, source.spots_left());
            prop_assert_eq!(card.participants_placeholder().is_some(), source.participants.is_empty());
        }
    }

    #[test]
    fn category_options_start_with_sentinel(tags in prop::collection::vec("Z[a-z]{2,6}", 0..6)) {
        let mut catalog = Catalog::new();
        catalog.extend_categories(tags.iter().map(|t| Category::new(t.as_str())));
        let options = project_categories(&catalog, &Filter::All);
        prop_assert_eq!(options[0].value.as_str(), Filter::ALL_LABEL);
        prop_assert_eq!(options.len(), catalog.category_count() + 1);
        prop_assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }
}
