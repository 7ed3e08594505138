//! Repository tests against a real MongoDB (requires Docker).

use chrono::NaiveDate;
use domain_events::{Attachments, Event, EventFilter, EventRepository, MongoEventRepository};
use test_utils::{TestDataBuilder, TestMongo, assertions::assert_same_ids};
use uuid::Uuid;

fn event(builder: &TestDataBuilder, label: &str, calendar_id: Uuid, day: u32, minutes: i32) -> Event {
    Event {
        id: builder.id(label),
        calendar_id,
        title: builder.name("event", label),
        starts_at: NaiveDate::from_ymd_opt(2025, 8, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
        duration_minutes: minutes,
        location: "Teatro Cervantes".into(),
        organizer: "Cultura".into(),
        organizer_email: None,
        attachments: Attachments::default(),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_list_by_calendars_and_filters() {
    let mongo = TestMongo::new().await;
    let repo = MongoEventRepository::new(mongo.database());
    let builder = TestDataBuilder::from_test_name("test_list_by_calendars_and_filters");

    let a = builder.id("calendar-a");
    let b = builder.id("calendar-b");
    let c = builder.id("calendar-c");
    let e1 = event(&builder, "e1", a, 1, 30);
    let e2 = event(&builder, "e2", b, 10, 90);
    let e3 = event(&builder, "e3", c, 20, 240);
    for e in [&e1, &e2, &e3] {
        repo.insert(e.clone()).await.unwrap();
    }

    let found = repo.list_by_calendars(vec![a, b]).await.unwrap();
    let found_ids: Vec<_> = found.iter().map(|e| e.id).collect();
    assert_same_ids(&found_ids, &[e1.id, e2.id], "hierarchy ids");

    let ranged = repo
        .list(EventFilter {
            fecha_inicio: Some(e2.starts_at),
            duration_maxima: Some(240),
            lugar: Some("cervantes".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let ranged_ids: Vec<_> = ranged.iter().map(|e| e.id).collect();
    assert_same_ids(&ranged_ids, &[e2.id, e3.id], "range filter");

    assert_eq!(repo.get_by_id(e1.id).await.unwrap(), Some(e1));
}
