use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use duelist_core::{
    parse_due_date, SortMode, StoreEvent, Task, TaskDraft, TaskStore, TaskStoreError, TaskUpdate,
    TaskValidationError, Urgency,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use uuid::Uuid;

fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()
}

fn draft(title: &str, due_date: DateTime<Utc>) -> TaskDraft {
    TaskDraft {
        image: None,
        title: title.to_string(),
        description: String::new(),
        due_date,
    }
}

fn edit(title: &str, due_date: DateTime<Utc>) -> TaskUpdate {
    TaskUpdate {
        title: title.to_string(),
        description: String::new(),
        due_date,
        image: None,
    }
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title.as_str()).collect()
}

#[test]
fn create_yields_incomplete_task_with_unique_id() {
    let mut store = TaskStore::in_memory();
    let mut ids = HashSet::new();

    for index in 0..20 {
        let created = store
            .create(draft(&format!("task {index}"), day(3)))
            .unwrap();
        assert!(!created.completed);
        assert!(ids.insert(created.id));
    }

    let view = store.view();
    assert_eq!(view.len(), 20);
    assert!(view.iter().all(|task| ids.contains(&task.id)));
}

#[test]
fn create_with_blank_title_is_rejected_without_mutation() {
    let mut store = TaskStore::in_memory();
    store.create(draft("keep", day(2))).unwrap();
    let before = store.view();

    let err = store.create(draft("  \t ", day(1))).unwrap_err();
    assert_eq!(
        err,
        TaskStoreError::Validation(TaskValidationError::EmptyTitle)
    );
    assert_eq!(store.view(), before);
}

#[test]
fn create_trims_title_and_normalizes_blank_image() {
    let mut store = TaskStore::in_memory();
    let created = store
        .create(TaskDraft {
            image: Some(String::new()),
            title: "  Buy milk  ".to_string(),
            description: "2%".to_string(),
            due_date: day(10),
        })
        .unwrap();

    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.description, "2%");
    assert_eq!(created.image, None);
}

#[test]
fn update_unknown_id_returns_not_found_without_side_effects() {
    let mut store = TaskStore::in_memory();
    store.create(draft("a", day(1))).unwrap();
    let before = store.view();

    let missing = Uuid::new_v4();
    let err = store.update(missing, edit("b", day(2))).unwrap_err();
    assert_eq!(err, TaskStoreError::TaskNotFound(missing));
    assert_eq!(store.view(), before);
}

#[test]
fn update_with_blank_title_keeps_previous_values() {
    let mut store = TaskStore::in_memory();
    let created = store.create(draft("original", day(4))).unwrap();

    let err = store.update(created.id, edit("   ", day(9))).unwrap_err();
    assert_eq!(
        err,
        TaskStoreError::Validation(TaskValidationError::EmptyTitle)
    );

    let current = store.get(created.id).unwrap();
    assert_eq!(current, created);
}

#[test]
fn update_preserves_image_unless_replaced_and_keeps_completion() {
    let mut store = TaskStore::in_memory();
    let created = store
        .create(TaskDraft {
            image: Some("content://photo/1".to_string()),
            title: "walk dog".to_string(),
            description: String::new(),
            due_date: day(5),
        })
        .unwrap();
    store.toggle_complete(created.id).unwrap();

    let updated = store
        .update(created.id, edit("walk the dog", day(6)))
        .unwrap();
    assert_eq!(updated.title, "walk the dog");
    assert_eq!(updated.due_date, day(6));
    assert_eq!(updated.image.as_deref(), Some("content://photo/1"));
    assert!(updated.completed);

    let mut replace = edit("walk the dog", day(6));
    replace.image = Some("content://photo/2".to_string());
    let replaced = store.update(created.id, replace).unwrap();
    assert_eq!(replaced.image.as_deref(), Some("content://photo/2"));

    let mut clear = edit("walk the dog", day(6));
    clear.image = Some(String::new());
    let cleared = store.update(created.id, clear).unwrap();
    assert_eq!(cleared.image, None);
}

#[test]
fn delete_removes_exactly_one_and_second_delete_is_not_found() {
    let mut store = TaskStore::in_memory();
    let a = store.create(draft("a", day(1))).unwrap();
    let b = store.create(draft("b", day(2))).unwrap();
    let c = store.create(draft("c", day(3))).unwrap();

    let removed = store.delete(b.id).unwrap();
    assert_eq!(removed.id, b.id);
    assert_eq!(titles(&store.view()), vec!["a", "c"]);

    let err = store.delete(b.id).unwrap_err();
    assert_eq!(err, TaskStoreError::TaskNotFound(b.id));
    assert_eq!(
        store.view().iter().map(|task| task.id).collect::<Vec<_>>(),
        vec![a.id, c.id]
    );
}

#[test]
fn toggle_complete_flips_flag_and_keeps_position() {
    let mut store = TaskStore::in_memory();
    store.create(draft("a", day(1))).unwrap();
    let b = store.create(draft("b", day(2))).unwrap();
    store.create(draft("c", day(3))).unwrap();

    assert!(store.toggle_complete(b.id).unwrap().completed);
    assert_eq!(titles(&store.view()), vec!["a", "b", "c"]);
    assert!(store.view()[1].completed);

    assert!(!store.toggle_complete(b.id).unwrap().completed);

    let missing = Uuid::new_v4();
    assert_eq!(
        store.toggle_complete(missing).unwrap_err(),
        TaskStoreError::TaskNotFound(missing)
    );
}

#[test]
fn toggle_complete_while_sorted_keeps_due_date_order() {
    let mut store = TaskStore::in_memory();
    let late = store.create(draft("late", day(9))).unwrap();
    let early = store.create(draft("early", day(2))).unwrap();
    store.set_sort_mode(true);

    store.toggle_complete(early.id).unwrap();
    let view = store.view();
    assert_eq!(titles(&view), vec!["early", "late"]);
    assert!(view[0].completed);
    assert!(!view[1].completed);

    store.toggle_complete(late.id).unwrap();
    assert_eq!(titles(&store.view()), vec!["early", "late"]);
    assert!(store.view().iter().all(|task| task.completed));
    assert!(store.is_sorted());
}

#[test]
fn sort_round_trip_restores_insertion_order() {
    let mut store = TaskStore::in_memory();
    for (title, due) in [("w", 9), ("x", 2), ("y", 7), ("z", 1)] {
        store.create(draft(title, day(due))).unwrap();
    }
    let original: Vec<_> = store.view().iter().map(|task| task.id).collect();

    let sorted = store.set_sort_mode(true);
    assert_eq!(titles(&sorted), vec!["z", "x", "y", "w"]);
    assert_eq!(store.sort_mode(), SortMode::DueDate);

    let restored = store.set_sort_mode(false);
    assert_eq!(
        restored.iter().map(|task| task.id).collect::<Vec<_>>(),
        original
    );
    assert!(!store.is_sorted());
}

#[test]
fn equal_due_dates_keep_insertion_order_when_sorted() {
    let mut store = TaskStore::in_memory();
    for title in ["first", "second", "third", "fourth"] {
        store.create(draft(title, day(5))).unwrap();
    }
    store.create(draft("early", day(1))).unwrap();

    let sorted = store.set_sort_mode(true);
    assert_eq!(
        titles(&sorted),
        vec!["early", "first", "second", "third", "fourth"]
    );
}

#[test]
fn update_while_sorted_rederives_order() {
    let mut store = TaskStore::in_memory();
    let a = store.create(draft("A", day(5))).unwrap();
    store.create(draft("B", day(1))).unwrap();

    assert_eq!(titles(&store.set_sort_mode(true)), vec!["B", "A"]);

    let day_zero = day(1) - Duration::days(1);
    store.update(a.id, edit("A", day_zero)).unwrap();
    assert_eq!(titles(&store.view()), vec!["A", "B"]);

    // Canonical order is untouched by the edit.
    assert_eq!(titles(&store.set_sort_mode(false)), vec!["A", "B"]);
}

#[test]
fn create_and_delete_while_sorted_reach_both_orderings() {
    let mut store = TaskStore::in_memory();
    store.create(draft("late", day(20))).unwrap();
    let mid = store.create(draft("mid", day(10))).unwrap();
    store.set_sort_mode(true);

    store.create(draft("early", day(2))).unwrap();
    assert_eq!(titles(&store.view()), vec!["early", "mid", "late"]);

    store.delete(mid.id).unwrap();
    assert_eq!(titles(&store.view()), vec!["early", "late"]);

    assert_eq!(titles(&store.set_sort_mode(false)), vec!["late", "early"]);
}

#[test]
fn toggle_sort_mode_flips_between_orderings() {
    let mut store = TaskStore::in_memory();
    store.create(draft("b", day(2))).unwrap();
    store.create(draft("a", day(1))).unwrap();

    assert_eq!(titles(&store.toggle_sort_mode()), vec!["a", "b"]);
    assert!(store.is_sorted());
    assert_eq!(titles(&store.toggle_sort_mode()), vec!["b", "a"]);
    assert!(!store.is_sorted());
}

#[test]
fn store_can_start_in_due_date_mode() {
    let mut store = TaskStore::with_sort_mode(
        duelist_core::InMemoryTaskRepository::new(),
        SortMode::DueDate,
    );
    store.create(draft("later", day(9))).unwrap();
    store.create(draft("sooner", day(3))).unwrap();

    assert_eq!(titles(&store.view()), vec!["sooner", "later"]);
}

#[test]
fn empty_state_and_lookup() {
    let mut store = TaskStore::in_memory();
    assert!(store.is_empty());
    assert!(store.view().is_empty());

    let created = store.create(draft("one", day(1))).unwrap();
    assert!(!store.is_empty());
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(created.id), Some(created.clone()));

    store.delete(created.id).unwrap();
    assert_eq!(store.get(created.id), None);
    assert!(store.is_empty());
}

#[test]
fn subscribers_see_successful_changes_only() {
    let mut store = TaskStore::in_memory();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let subscription = store.subscribe(move |event| sink.borrow_mut().push(*event));

    let task = store.create(draft("watched", day(3))).unwrap();
    assert!(store.create(draft(" ", day(3))).is_err());
    store.update(task.id, edit("watched!", day(4))).unwrap();
    store.toggle_complete(task.id).unwrap();
    store.set_sort_mode(true);
    store.set_sort_mode(true);
    store.delete(task.id).unwrap();
    assert!(store.delete(task.id).is_err());

    assert_eq!(
        *events.borrow(),
        vec![
            StoreEvent::Created(task.id),
            StoreEvent::Updated(task.id),
            StoreEvent::CompletionToggled {
                id: task.id,
                completed: true
            },
            StoreEvent::SortModeChanged(SortMode::DueDate),
            StoreEvent::Deleted(task.id),
        ]
    );

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store.create(draft("unwatched", day(1))).unwrap();
    assert_eq!(events.borrow().len(), 5);
}

#[test]
fn cards_follow_view_order_and_classify_against_now() {
    let mut store = TaskStore::in_memory();
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    store
        .create(draft("far", now + Duration::days(30)))
        .unwrap();
    store
        .create(draft("soon", now + Duration::days(3)))
        .unwrap();
    store
        .create(draft("urgent", now + Duration::hours(12)))
        .unwrap();
    store.set_sort_mode(true);

    let cards = store.cards(now, &Utc);
    let summary: Vec<_> = cards
        .iter()
        .map(|card| (card.title.as_str(), card.urgency))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("urgent", Urgency::Critical),
            ("soon", Urgency::Soon),
            ("far", Urgency::Normal),
        ]
    );
    assert_eq!(cards[0].due_label, "1st January");
    assert_eq!(cards[2].due_label, "31st January");
}

#[test]
fn end_to_end_buy_milk_and_pay_rent() {
    let mut store = TaskStore::in_memory();

    let milk = store
        .create(TaskDraft {
            image: Some(String::new()),
            title: "Buy milk".to_string(),
            description: "2%".to_string(),
            due_date: parse_due_date("2025-01-10").unwrap(),
        })
        .unwrap();
    assert_eq!(milk.title, "Buy milk");

    store
        .create(TaskDraft {
            image: None,
            title: "Pay rent".to_string(),
            description: String::new(),
            due_date: parse_due_date("2025-01-01").unwrap(),
        })
        .unwrap();

    assert_eq!(titles(&store.view()), vec!["Buy milk", "Pay rent"]);
    assert_eq!(
        titles(&store.set_sort_mode(true)),
        vec!["Pay rent", "Buy milk"]
    );
}

#[test]
fn cards_label_due_dates_in_the_display_zone() {
    let mut store = TaskStore::in_memory();
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    store
        .create(draft("rent", parse_due_date("2025-01-10T09:00:00+10:00").unwrap()))
        .unwrap();

    let sydney = FixedOffset::east_opt(10 * 3600).unwrap();
    assert_eq!(store.cards(now, &sydney)[0].due_label, "10th January");
    assert_eq!(store.cards(now, &Utc)[0].due_label, "9th January");
}
