//! Integration tests for `SqliteStore` against an in-memory database.

use marquee_core::{store::UserStore, user::UserFields};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ann_lee() -> UserFields {
  UserFields {
    email: Some("a@x.com".to_string()),
    name:  "Ann Lee".to_string(),
    image: "http://img/a.png".to_string(),
  }
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_and_get() {
  let s = store().await;

  let record = s.upsert_user("u1", ann_lee()).await.unwrap();
  assert_eq!(record.user_id, "u1");
  assert_eq!(record.email.as_deref(), Some("a@x.com"));
  assert_eq!(record.name, "Ann Lee");
  assert_eq!(record.image, "http://img/a.png");

  let fetched = s.get_user("u1").await.unwrap().unwrap();
  assert_eq!(fetched, record);
}

#[tokio::test]
async fn upsert_twice_leaves_one_record() {
  let s = store().await;
  s.upsert_user("u1", ann_lee()).await.unwrap();
  s.upsert_user("u1", ann_lee()).await.unwrap();

  let all = s.list_users().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].name, "Ann Lee");
}

#[tokio::test]
async fn upsert_preserves_created_at_and_bumps_updated_at() {
  let s = store().await;
  let first = s.upsert_user("u1", ann_lee()).await.unwrap();

  tokio::time::sleep(std::time::Duration::from_millis(5)).await;

  let mut renamed = ann_lee();
  renamed.name = "Anne Lee".to_string();
  let second = s.upsert_user("u1", renamed).await.unwrap();

  assert_eq!(second.created_at, first.created_at);
  assert!(second.updated_at > first.updated_at);
  assert_eq!(second.name, "Anne Lee");
}

#[tokio::test]
async fn upsert_accepts_null_email() {
  let s = store().await;
  let fields = UserFields {
    email: None,
    name:  "Unknown User".to_string(),
    image: String::new(),
  };
  let record = s.upsert_user("u2", fields).await.unwrap();
  assert_eq!(record.email, None);

  let fetched = s.get_user("u2").await.unwrap().unwrap();
  assert_eq!(fetched.email, None);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_existing_returns_new_state() {
  let s = store().await;
  s.upsert_user("u1", ann_lee()).await.unwrap();

  let updated = s
    .update_user(
      "u1",
      UserFields {
        email: Some("anne@x.com".to_string()),
        name:  "Anne Lee".to_string(),
        image: String::new(),
      },
    )
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.email.as_deref(), Some("anne@x.com"));
  assert_eq!(updated.name, "Anne Lee");
  assert_eq!(updated.image, "");
}

#[tokio::test]
async fn update_missing_returns_none_and_writes_nothing() {
  let s = store().await;
  let result = s.update_user("ghost", ann_lee()).await.unwrap();
  assert!(result.is_none());
  assert!(s.list_users().await.unwrap().is_empty());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_existing_returns_true() {
  let s = store().await;
  s.upsert_user("u1", ann_lee()).await.unwrap();

  assert!(s.delete_user("u1").await.unwrap());
  assert!(s.get_user("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_returns_false() {
  let s = store().await;
  assert!(!s.delete_user("ghost").await.unwrap());
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_all_records() {
  let s = store().await;
  s.upsert_user("u1", ann_lee()).await.unwrap();
  s.upsert_user(
    "u2",
    UserFields {
      email: None,
      name:  "Bob".to_string(),
      image: String::new(),
    },
  )
  .await
  .unwrap();

  let all = s.list_users().await.unwrap();
  assert_eq!(all.len(), 2);
  let ids: Vec<&str> = all.iter().map(|u| u.user_id.as_str()).collect();
  assert!(ids.contains(&"u1"));
  assert!(ids.contains(&"u2"));
}
