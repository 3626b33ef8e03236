use super::*;
use shared::domain::Channel;

#[test]
fn dispatch_applies_event_to_state() {
    let store = Store::default();
    store.dispatch(Event::ChangeChannel {
        channel: Channel::Nightly,
    });
    assert_eq!(store.snapshot().configuration.channel, Channel::Nightly);
    assert_eq!(store.read(|state| state.configuration.channel), Channel::Nightly);
}

#[tokio::test]
async fn subscribers_see_events_in_dispatch_order() {
    let store = Store::default();
    let mut rx = store.subscribe();

    store.dispatch(Event::navigate_to_index());
    store.dispatch(Event::edit_code("fn main() {}"));

    assert_eq!(rx.recv().await.expect("event"), Event::navigate_to_index());
    assert_eq!(
        rx.recv().await.expect("event"),
        Event::edit_code("fn main() {}")
    );
}

#[test]
fn dispatch_without_subscribers_still_updates_state() {
    let store = Store::new(AppState::default());
    store.dispatch(Event::edit_code("fn lonely() {}"));
    assert_eq!(store.snapshot().code, "fn lonely() {}");
}
