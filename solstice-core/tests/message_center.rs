//! Message center stacking, expiry and disposal tests

use std::time::Duration;

use solstice_core::{
    GalleryError, MessageCenter, MessageConfig, MessageKind, MessageOptions,
};

fn center() -> MessageCenter {
    MessageCenter::new(MessageConfig::default()).expect("inside runtime")
}

fn tops(center: &MessageCenter) -> Vec<u32> {
    center.messages().iter().map(|m| m.top).collect()
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn messages_stack_from_the_top() {
    let center = center();
    let first = center.success("Uploaded", None).expect("shown");
    let second = center.warning("Slow network", None).expect("shown");
    let third = center.glass("Copied link", None).expect("shown");

    assert_eq!(first.id().get(), 1);
    assert_eq!(second.id().get(), 2);
    assert_eq!(third.id().get(), 3);
    assert_eq!(tops(&center), vec![32, 102, 172]);

    let kinds: Vec<_> = center.messages().iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![MessageKind::Success, MessageKind::Warning, MessageKind::Glass]
    );
}

#[tokio::test(start_paused = true)]
async fn closing_reflows_the_rest() {
    let center = center();
    let first = center.info("one", None).expect("shown");
    center.info("two", None).expect("shown");
    center.info("three", None).expect("shown");

    assert!(first.close());
    assert!(!first.close());
    assert_eq!(tops(&center), vec![32, 102]);

    let texts: Vec<_> =
        center.messages().iter().map(|m| m.text.clone()).collect();
    assert_eq!(texts, vec!["two", "three"]);
}

#[tokio::test(start_paused = true)]
async fn messages_expire_after_their_duration() {
    let center = center();
    center
        .error("Upload failed", Some(Duration::from_millis(500)))
        .expect("shown");
    center.info("Default lifetime", None).expect("shown");

    advance(510).await;
    let remaining = center.messages();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].text, "Default lifetime");
    assert_eq!(remaining[0].top, 32);

    advance(2_500).await;
    assert!(center.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn closed_message_timer_does_not_fire() {
    let center = center();
    let early = center
        .show(MessageOptions::new("gone", MessageKind::Info))
        .expect("shown");
    center.close(early.id());
    let later = center.info("stays", Some(Duration::from_secs(10))).expect("shown");

    advance(3_500).await;
    let messages = center.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, later.id());
}

#[tokio::test(start_paused = true)]
async fn close_all_empties_the_stack() {
    let center = center();
    for i in 0..4 {
        center.show(format!("note {i}")).expect("shown");
    }
    let mut rx = center.watch();
    center.close_all();

    assert!(rx.has_changed().expect("sender alive"));
    assert!(rx.borrow_and_update().is_empty());

    advance(5_000).await;
    assert!(center.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn disposed_center_rejects_messages() {
    let center = center();
    let handle = center.info("bye", None).expect("shown");
    center.dispose();
    center.dispose();

    assert!(center.messages().is_empty());
    assert!(!handle.close());
    assert!(matches!(
        center.info("too late", None),
        Err(GalleryError::Disposed(_))
    ));
}
