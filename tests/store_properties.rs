use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use site_portal::CollectionStore;
use site_portal::model::attendance::AttendanceRecord;
use site_portal::model::instruction::Instruction;
use site_portal::model::role::Role;
use site_portal::model::salary::SalaryRecord;
use site_portal::model::task::{Task, TaskField, TaskPatch, TaskStatus};
use site_portal::model::user::{User, UserField, UserPatch};
use site_portal::store::latency::NoLatency;
use site_portal::store::slot::MemorySlot;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn user(id: &str, role: Role) -> User {
    User {
        id: id.into(),
        name: format!("Name {id}"),
        email: format!("{id}@vjgote.com"),
        role,
        avatar: None,
    }
}

fn task(id: &str, assigned_to: &str) -> Task {
    Task {
        id: id.into(),
        title: format!("Task {id}"),
        description: "".into(),
        assigned_to: assigned_to.into(),
        assigned_to_name: format!("Name {assigned_to}"),
        status: TaskStatus::Pending,
        site_location: "Sector 45".into(),
        created_at: day(),
    }
}

fn counting(store: &CollectionStore) -> (Arc<AtomicUsize>, site_portal::Subscription) {
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&hits);
    let sub = store.subscribe(move || {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    (hits, sub)
}

#[tokio::test]
async fn test_read_after_replace_returns_same_sequence() {
    let store = CollectionStore::in_memory();
    let tasks = vec![task("a", "1"), task("b", "2"), task("c", "1")];

    store.replace(tasks.clone()).await;

    assert_eq!(store.read::<Task>().await, tasks);
}

#[tokio::test]
async fn test_read_of_untouched_collection_is_empty() {
    let store = CollectionStore::in_memory();
    assert!(store.read::<Instruction>().await.is_empty());
    assert!(store.read::<AttendanceRecord>().await.is_empty());
}

#[tokio::test]
async fn test_insert_front_puts_record_first() {
    let store = CollectionStore::in_memory();
    store.replace(vec![task("a", "1"), task("b", "2")]).await;

    let inserted = store.insert_front(task("new", "3")).await;

    assert_eq!(inserted, task("new", "3"));
    assert_eq!(
        store.read::<Task>().await,
        vec![task("new", "3"), task("a", "1"), task("b", "2")]
    );
}

#[tokio::test]
async fn test_remove_by_drops_exactly_matching_records() {
    let store = CollectionStore::in_memory();
    store
        .replace(vec![task("a", "1"), task("b", "2"), task("c", "1"), task("d", "3")])
        .await;

    store.remove_by::<Task>("1", TaskField::AssignedTo).await;
    assert_eq!(store.read::<Task>().await, vec![task("b", "2"), task("d", "3")]);

    store.remove::<Task>("d").await;
    assert_eq!(store.read::<Task>().await, vec![task("b", "2")]);

    // no match is a no-op
    store.remove::<Task>("zzz").await;
    assert_eq!(store.read::<Task>().await, vec![task("b", "2")]);
}

#[tokio::test]
async fn test_patch_by_changes_only_patched_fields_of_matches() {
    let store = CollectionStore::in_memory();
    store
        .replace(vec![task("a", "1"), task("b", "2"), task("c", "1")])
        .await;

    store
        .patch_by::<Task>("1", TaskPatch::status(TaskStatus::InProgress), TaskField::AssignedTo)
        .await;

    let mut expected_a = task("a", "1");
    expected_a.status = TaskStatus::InProgress;
    let mut expected_c = task("c", "1");
    expected_c.status = TaskStatus::InProgress;
    assert_eq!(
        store.read::<Task>().await,
        vec![expected_a, task("b", "2"), expected_c]
    );
}

#[tokio::test]
async fn test_patch_user_by_email() {
    let store = CollectionStore::in_memory();
    store.replace(vec![user("1", Role::Owner), user("2", Role::Hr)]).await;

    store
        .patch_by::<User>(
            "2@vjgote.com",
            UserPatch {
                name: Some("Priya".into()),
                ..Default::default()
            },
            UserField::Email,
        )
        .await;

    let users = store.read::<User>().await;
    assert_eq!(users[0], user("1", Role::Owner));
    assert_eq!(users[1].name, "Priya");
    assert_eq!(users[1].role, Role::Hr);
}

#[tokio::test]
async fn test_every_mutation_notifies_each_subscriber_once() {
    let store = CollectionStore::in_memory();
    let (first, _first_sub) = counting(&store);
    let (second, second_sub) = counting(&store);
    assert_eq!(store.listener_count(), 2);

    store.replace(vec![task("a", "1")]).await;
    store.insert_front(task("b", "1")).await;
    store.patch::<Task>("a", TaskPatch::status(TaskStatus::Completed)).await;
    store.remove::<Task>("b").await;
    assert_eq!(first.load(Ordering::SeqCst), 4);
    assert_eq!(second.load(Ordering::SeqCst), 4);

    // reads do not notify
    store.read::<Task>().await;
    assert_eq!(first.load(Ordering::SeqCst), 4);

    assert!(second_sub.unsubscribe());
    assert!(!second_sub.unsubscribe());
    store.remove::<Task>("a").await;

    assert_eq!(first.load(Ordering::SeqCst), 5);
    assert_eq!(second.load(Ordering::SeqCst), 4);
    assert_eq!(store.listener_count(), 1);
}

#[tokio::test]
async fn test_failing_subscriber_does_not_break_mutation() {
    let store = CollectionStore::in_memory();
    let _bad = store.subscribe(|| anyhow::bail!("view crashed"));
    let _worse = store.subscribe(|| panic!("view panicked"));
    let (hits, _sub) = counting(&store);

    store.insert_front(task("a", "1")).await;

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(store.read::<Task>().await, vec![task("a", "1")]);
}

#[tokio::test]
async fn test_corrupt_slot_loads_as_empty() {
    for payload in ["{{{", "null", "42", "\"users\"", r#"{"users": {"id": "1"}}"#] {
        let slot = Arc::new(MemorySlot::with_payload("db", payload));
        let store = CollectionStore::with_latency(slot, Arc::new(NoLatency));

        assert!(store.read::<User>().await.is_empty(), "payload {payload}");
        assert!(store.read::<Task>().await.is_empty());
        assert!(store.read::<Instruction>().await.is_empty());
        assert!(store.read::<AttendanceRecord>().await.is_empty());
        assert!(store.read::<SalaryRecord>().await.is_empty());
    }
}

#[tokio::test]
async fn test_end_to_end_task_lifecycle() {
    let store = CollectionStore::in_memory();

    store.replace(vec![user("1", Role::Owner)]).await;
    store.insert_front(task("t1", "1")).await;
    store
        .patch::<Task>("t1", TaskPatch::status(TaskStatus::Completed))
        .await;

    let mut expected = task("t1", "1");
    expected.status = TaskStatus::Completed;
    assert_eq!(store.read::<Task>().await, vec![expected]);
}

#[tokio::test]
async fn test_cascade_removal_of_user_and_salary() {
    let store = CollectionStore::in_memory();
    store.insert_front(user("u1", Role::Employee)).await;
    store.insert_front(user("u9", Role::Employee)).await;
    store
        .insert_front(SalaryRecord::new("u1", 300.0, 0.0, 0.0, day()))
        .await;
    store
        .insert_front(SalaryRecord::new("u9", 500.0, 0.0, 0.0, day()))
        .await;

    store.remove::<User>("u9").await;
    store.remove::<SalaryRecord>("u9").await;

    let users = store.read::<User>().await;
    let salaries = store.read::<SalaryRecord>().await;
    assert!(users.iter().all(|u| u.id != "u9"));
    assert!(salaries.iter().all(|s| s.employee_id != "u9"));
    assert_eq!(users.len(), 1);
    assert_eq!(salaries.len(), 1);
}

#[tokio::test]
async fn test_store_clones_share_state() {
    let store = CollectionStore::in_memory();
    let other = store.clone();
    let (hits, _sub) = counting(&store);

    other.insert_front(user("1", Role::Owner)).await;

    assert_eq!(store.read::<User>().await.len(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_mutations_all_land() {
    let store = CollectionStore::in_memory();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.insert_front(task(&format!("t{i}"), "1")).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.read::<Task>().await.len(), 20);
}
