use std::sync::Arc;

use shared::domain::{Condition, Direction, ListName, NewItem};
use storage::{ItemStore, Storage};

#[tokio::test]
async fn list_exists_only_while_items_reference_it() {
    let store: Arc<dyn ItemStore> = Arc::new(Storage::new("sqlite::memory:").await.expect("db"));
    let work = ListName::from_input("Work");

    let placeholder = store
        .create_item(NewItem::placeholder(work.clone()))
        .await
        .expect("placeholder");
    assert_eq!(placeholder.condition, Condition::ToDo);
    assert_eq!(
        store.distinct_list_names().await.expect("names"),
        vec![work.clone()]
    );

    let email = store
        .create_item(NewItem {
            text: "Email Bob".to_string(),
            list_name: work.clone(),
            date: None,
            condition: Condition::ToDo,
        })
        .await
        .expect("item");

    let mut condition = email.condition;
    for _ in 0..3 {
        if let Some(next) = condition.step(Direction::Up) {
            assert!(store
                .update_condition(email.id, next)
                .await
                .expect("update"));
            condition = next;
        }
    }
    let reloaded = store.find_item(email.id).await.expect("find").expect("item");
    assert_eq!(reloaded.condition, Condition::Done);

    store.delete_item(placeholder.id).await.expect("delete");
    store.delete_item(email.id).await.expect("delete");
    assert!(store.distinct_list_names().await.expect("names").is_empty());
}
