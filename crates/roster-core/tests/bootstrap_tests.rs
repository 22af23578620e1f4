use pretty_assertions::assert_eq;
use roster_core::projector::{LOADING_TEXT, NO_PARTICIPANTS_TEXT};
use roster_core::{Filter, LoadOutcome, RosterBody, ServiceError, SyncController};
use roster_test_utils::{setup_controller, Endpoint, FakeRosterService, RecordingSurface};
use std::sync::Arc;

fn labels(options: &[roster_core::SelectOption]) -> Vec<&str> {
    options.iter().map(|o| o.value.as_str()).collect()
}

#[tokio::test]
async fn bootstrap_renders_categories_then_unfiltered_roster() {
    let service = Arc::new(FakeRosterService::seeded());
    let (controller, surface) = setup_controller(service.clone());

    let outcome = controller.bootstrap().await;

    assert_eq!(outcome.categories, Ok(4));
    assert!(outcome.roster.is_applied());

    let renders = surface.category_renders();
    assert_eq!(renders.len(), 1);
    assert_eq!(
        labels(&renders[0]),
        ["All", "Academic", "Arts", "Games", "Sports"]
    );
    assert!(renders[0][0].selected);

    let Some(RosterBody::Cards(cards)) = surface.last_roster().map(|p| p.body) else {
        panic!("expected cards");
    };
    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        ["Chess Club", "Programming Class", "Gym Class", "Soccer Team", "Art Club"]
    );

    let calls: Vec<Endpoint> = service.calls().iter().map(|c| c.endpoint).collect();
    assert_eq!(calls, [Endpoint::Categories, Endpoint::ListActivities]);
}

#[tokio::test]
async fn category_failure_still_loads_roster() {
    let service = Arc::new(FakeRosterService::seeded());
    service.fail_next(Endpoint::Categories, ServiceError::transport("refused"));
    let (controller, surface) = setup_controller(service.clone());

    let outcome = controller.bootstrap().await;

    assert!(outcome.categories.is_err());
    assert!(outcome.roster.is_applied());
    let renders = surface.category_renders();
    assert_eq!(renders.len(), 1);
    assert_eq!(labels(&renders[0]), ["All"]);
}

#[tokio::test]
async fn filter_changes_never_rederive_categories() {
    let service = Arc::new(FakeRosterService::seeded());
    let (controller, surface) = setup_controller(service.clone());
    controller.bootstrap().await;

    for selection in ["Sports", "Arts", "All", "Games"] {
        controller
            .select_filter(Filter::from_selection(selection))
            .await;
    }

    assert_eq!(surface.category_renders().len(), 1);
    assert_eq!(service.calls_to(Endpoint::Categories).len(), 1);
}

#[tokio::test]
async fn empty_participant_list_uses_placeholder() {
    let service = Arc::new(FakeRosterService::seeded());
    let (controller, _surface) = setup_controller(service);
    controller.bootstrap().await;

    let RosterBody::Cards(cards) = controller.presentation().body else {
        panic!("expected cards");
    };
    let art = cards.iter().find(|c| c.name == "Art Club").unwrap();
    assert_eq!(art.participants_placeholder(), Some(NO_PARTICIPANTS_TEXT));
    assert_eq!(art.availability_label, "15 spots left");
    assert_eq!(art.duration_label, "1.5 hours");

    let chess = cards.iter().find(|c| c.name == "Chess Club").unwrap();
    assert_eq!(chess.participants_placeholder(), None);
    assert_eq!(chess.spots_left, 10);
}

#[tokio::test]
async fn presentation_shows_loading_before_first_load() {
    let service = Arc::new(FakeRosterService::seeded());
    let controller = SyncController::new(
        roster_core::ClientConfig::new(),
        service,
        Arc::new(RecordingSurface::new()),
    );

    assert_eq!(
        controller.presentation().body,
        RosterBody::Placeholder(LOADING_TEXT.to_string())
    );
    assert_eq!(controller.current_filter(), Filter::All);
}

#[tokio::test]
async fn unknown_category_yields_empty_roster() {
    let service = Arc::new(FakeRosterService::seeded());
    let (controller, _surface) = setup_controller(service);
    controller.bootstrap().await;

    let outcome = controller
        .select_filter(Filter::from_selection("Music"))
        .await
        .unwrap();

    let LoadOutcome::Applied(snapshot) = outcome else {
        panic!("expected applied load");
    };
    assert!(snapshot.activities.is_empty());
    assert_eq!(controller.presentation().body, RosterBody::Cards(Vec::new()));
}

#[tokio::test]
async fn refresh_reloads_current_filter_without_categories() {
    let service = Arc::new(FakeRosterService::seeded());
    let (controller, surface) = setup_controller(service.clone());
    controller
        .select_filter(Filter::from_selection("Arts"))
        .await;
    service.insert_activity(
        "Pottery",
        roster_test_utils::activity("Arts", 8, &[], 2.0),
    );

    let (filter, outcome) = controller.refresh().await;

    assert_eq!(filter.as_str(), "Arts");
    let LoadOutcome::Applied(snapshot) = outcome else {
        panic!("expected applied load");
    };
    assert!(snapshot.activities.contains_key("Pottery"));
    assert!(surface.category_renders().is_empty());
    assert_eq!(surface.roster_renders(), 2);
}

#[tokio::test]
async fn shutdown_hides_visible_notifications() {
    let service = Arc::new(FakeRosterService::seeded());
    let (controller, _surface) = setup_controller(service);
    controller.bootstrap().await;
    controller
        .submit(roster_core::Action::signup("Art Club", "a@x.com"))
        .await;
    assert!(controller
        .notifications()
        .is_visible(roster_core::Surface::Signup));

    controller.shutdown();

    assert!(!controller
        .notifications()
        .is_visible(roster_core::Surface::Signup));
}
