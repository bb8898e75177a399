use super::*;

fn new_item(text: &str, list: &str, condition: Condition) -> NewItem {
    NewItem {
        text: text.to_string(),
        list_name: ListName::from_input(list),
        date: None,
        condition,
    }
}

#[tokio::test]
async fn creates_and_finds_items() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let created = storage
        .create_item(NewItem {
            date: Some("2024-05-01".to_string()),
            ..new_item("buy milk", "Groceries List", Condition::ToDo)
        })
        .await
        .expect("create");

    let found = storage
        .find_item(created.id)
        .await
        .expect("find")
        .expect("item exists");
    assert_eq!(found, created);
    assert_eq!(found.list_name.as_key(), "Groceries_List");
    assert_eq!(found.date.as_deref(), Some("2024-05-01"));
    assert_eq!(found.condition, Condition::ToDo);
}

#[tokio::test]
async fn stamps_time_with_two_decimals() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let item = storage
        .create_item(new_item("stamp", "Work", Condition::Doing))
        .await
        .expect("create");

    let (seconds, fraction) = item.time.split_once('.').expect("decimal point");
    assert_eq!(fraction.len(), 2);
    assert!(seconds.parse::<i64>().expect("seconds") > 0);
}

#[tokio::test]
async fn missing_item_is_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert!(storage.find_item(ItemId(42)).await.expect("find").is_none());
    assert!(!storage
        .update_condition(ItemId(42), Condition::Done)
        .await
        .expect("update"));
    assert!(!storage.delete_item(ItemId(42)).await.expect("delete"));
}

#[tokio::test]
async fn updates_condition_in_place() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let item = storage
        .create_item(new_item("ship it", "Work", Condition::ToDo))
        .await
        .expect("create");

    assert!(storage
        .update_condition(item.id, Condition::Doing)
        .await
        .expect("update"));
    let reloaded = storage.find_item(item.id).await.expect("find").expect("item");
    assert_eq!(reloaded.condition, Condition::Doing);
    assert_eq!(reloaded.time, item.time);
}

#[tokio::test]
async fn create_then_delete_restores_count() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .create_item(new_item("keep", "Work", Condition::ToDo))
        .await
        .expect("create");
    let before = storage.count_items().await.expect("count");

    let item = storage
        .create_item(new_item("drop", "Work", Condition::ToDo))
        .await
        .expect("create");
    assert_eq!(storage.count_items().await.expect("count"), before + 1);
    assert!(storage.delete_item(item.id).await.expect("delete"));
    assert_eq!(storage.count_items().await.expect("count"), before);
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first = storage
        .create_item(new_item("first", "Work", Condition::ToDo))
        .await
        .expect("create");
    storage.delete_item(first.id).await.expect("delete");

    let second = storage
        .create_item(new_item("second", "Work", Condition::ToDo))
        .await
        .expect("create");
    assert!(second.id.0 > first.id.0);
}

#[tokio::test]
async fn delete_list_only_touches_matching_items() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    for text in ["a", "b", "c"] {
        storage
            .create_item(new_item(text, "Home Chores", Condition::ToDo))
            .await
            .expect("create");
    }
    let kept = storage
        .create_item(new_item("report", "Work", Condition::Done))
        .await
        .expect("create");

    let removed = storage
        .delete_items_in_list(&ListName::from_input("Home Chores"))
        .await
        .expect("delete list");
    assert_eq!(removed, 3);

    let remaining = storage.list_items().await.expect("list");
    assert_eq!(remaining, vec![kept]);
    assert_eq!(
        storage
            .delete_items_in_list(&ListName::from_input("Home Chores"))
            .await
            .expect("second delete"),
        0
    );
}

#[tokio::test]
async fn distinct_list_names_follow_first_appearance() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    for (text, list) in [("x", "Work"), ("y", "Groceries List"), ("z", "Work")] {
        storage
            .create_item(new_item(text, list, Condition::ToDo))
            .await
            .expect("create");
    }

    let names = storage.distinct_list_names().await.expect("names");
    assert_eq!(
        names,
        vec![
            ListName::from_stored("Work"),
            ListName::from_stored("Groceries_List"),
        ]
    );
}

#[tokio::test]
async fn list_items_keeps_insertion_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    for text in ["one", "two", "three"] {
        storage
            .create_item(new_item(text, "Work", Condition::ToDo))
            .await
            .expect("create");
    }
    let texts: Vec<String> = storage
        .list_items()
        .await
        .expect("list")
        .into_iter()
        .map(|item| item.text)
        .collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("items.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage
        .create_item(new_item("persisted", "Work", Condition::ToDo))
        .await
        .expect("create");
    storage.pool().close().await;
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = Storage::new(&database_url).await.expect("reopen");
    assert_eq!(reopened.count_items().await.expect("count"), 1);
}

#[test]
fn memory_urls_have_no_path() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert!(sqlite_path("postgres://localhost/db").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/items.db?mode=rwc"),
        Some(PathBuf::from("./data/items.db"))
    );
}
