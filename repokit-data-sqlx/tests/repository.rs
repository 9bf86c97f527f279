#![cfg(feature = "sqlite")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use futures_util::FutureExt;
use repokit_data::prelude::*;
use repokit_data_sqlx::{DataConfig, SqlxStore};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

#[derive(Debug, Clone, Default, PartialEq, Record, Entity, sqlx::FromRow)]
#[orm(table = "users")]
pub struct User {
    #[orm(embedded)]
    #[sqlx(flatten)]
    pub model: Model,
    pub username: String,
    pub email: String,
    pub age: i32,
    pub birthday: Option<Timestamp>,
}

type Repo = UltimateRepository<User, i64, SqlxStore<User, Sqlite>>;

const SCHEMA: &str = "CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    age INTEGER NOT NULL,
    birthday TEXT
)";

fn birthday(month: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2000, month, 1, 0, 0, 0).unwrap()
}

fn mid(month: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2000, month, 15, 0, 0, 0).unwrap()
}

async fn pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query(SCHEMA).execute(&pool).await.unwrap();
    pool
}

/// Ten users; users 1, 3, 6, 8 and 10 are 20, the others `20 + i`.
/// User `i` is born on the first of month `i` of 2000.
async fn seeded(store: SqlxStore<User, Sqlite>) -> Repo {
    let repo = Repo::new(store);
    let cancel = CancellationToken::new();
    for i in 1..=10 {
        let mut user = User {
            username: format!("user{i}"),
            email: format!("user{i}@example.com"),
            age: if [1, 3, 6, 8, 10].contains(&i) { 20 } else { 20 + i },
            birthday: Some(birthday(i as u32)),
            ..Default::default()
        };
        repo.create(&cancel, &mut user).await.unwrap();
    }
    repo
}

async fn setup() -> (Repo, CancellationToken) {
    let repo = seeded(SqlxStore::new(pool().await)).await;
    (repo, CancellationToken::new())
}

fn ids(users: &[User]) -> Vec<i64> {
    users.iter().map(|u| u.model.id).collect()
}

fn with_age(age: i32) -> User {
    User {
        age,
        ..Default::default()
    }
}

fn with_birthday() -> User {
    User {
        birthday: Some(mark::target_time()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_reads_back_generated_columns() {
    let (repo, cancel) = setup().await;
    let mut user = User {
        username: "fresh".into(),
        email: "fresh@example.com".into(),
        age: 40,
        ..Default::default()
    };
    repo.create(&cancel, &mut user).await.unwrap();
    assert_eq!(user.model.id, 11);
    assert_ne!(user.model.created_at, Timestamp::UNIX_EPOCH);
    assert_eq!(user.model.created_at, user.model.updated_at);
    assert!(!user.model.deleted_at.is_deleted());
    assert_eq!(user.birthday, None);

    let stored = repo.get_by_id(&cancel, 11).await.unwrap();
    assert_eq!(stored, user);
}

#[tokio::test]
async fn test_get_by_and_get_by_id() {
    let (repo, cancel) = setup().await;
    let user = repo.get_by_id(&cancel, 3).await.unwrap();
    assert_eq!(user.username, "user3");
    assert_eq!(user.birthday, Some(birthday(3)));

    let user = repo
        .get_by(
            &cancel,
            &User {
                username: "user4".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(user.model.id, 4);

    let err = repo.get_by_id(&cancel, 99).await.unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn test_find_by_respects_limit() {
    let (repo, cancel) = setup().await;
    let all = repo.find_by(&cancel, &with_age(20), -1).await.unwrap();
    assert_eq!(ids(&all), vec![1, 3, 6, 8, 10]);

    let first = repo.find_by(&cancel, &with_age(20), 1).await.unwrap();
    assert_eq!(ids(&first), vec![1]);

    assert_eq!(repo.find_all(&cancel, -1).await.unwrap().len(), 10);
    assert_eq!(repo.find_all(&cancel, 4).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_dynamic_condition() {
    let (repo, cancel) = setup().await;
    let cond = DynamicRecord::from_json(&serde_json::json!({ "Age": 20 })).unwrap();
    // JSON numbers are i64 while the column is i32; equality still matches.
    let users = repo.find_by(&cancel, &cond, -1).await.unwrap();
    assert_eq!(users.len(), 5);
}

#[tokio::test]
async fn test_like() {
    let (repo, cancel) = setup().await;
    let cond = User {
        username: "%user%".into(),
        ..Default::default()
    };
    assert_eq!(repo.like(&cancel, &cond, -1).await.unwrap().len(), 10);

    let cond = User {
        username: "user1%".into(),
        ..Default::default()
    };
    assert_eq!(ids(&repo.like(&cancel, &cond, -1).await.unwrap()), vec![1, 10]);
}

#[tokio::test]
async fn test_find_compare() {
    let (repo, cancel) = setup().await;
    let users = repo
        .find_compare(&cancel, &with_age(1), 23i32, Operator::Lte, -1)
        .await
        .unwrap();
    assert_eq!(ids(&users), vec![1, 2, 3, 6, 8, 10]);

    let users = repo
        .find_compare(&cancel, &with_age(1), 25i32, Operator::Gt, -1)
        .await
        .unwrap();
    assert_eq!(ids(&users), vec![7, 9]);

    let users = repo
        .find_compare(&cancel, &with_age(1), 20i32, Operator::Eq, 2)
        .await
        .unwrap();
    assert_eq!(ids(&users), vec![1, 3]);
}

#[tokio::test]
async fn test_time_ranges() {
    let (repo, cancel) = setup().await;
    let before = repo
        .find_before(&cancel, &with_birthday(), mid(4), -1)
        .await
        .unwrap();
    assert_eq!(ids(&before), vec![1, 2, 3, 4]);

    let after = repo
        .find_after(&cancel, &with_birthday(), mid(6), -1)
        .await
        .unwrap();
    assert_eq!(ids(&after), vec![7, 8, 9, 10]);

    let between = repo
        .find_between(&cancel, &with_birthday(), mid(2), mid(5), -1)
        .await
        .unwrap();
    assert_eq!(ids(&between), vec![3, 4, 5]);

    // Both bounds are exclusive.
    let exact = repo
        .find_between(&cancel, &with_birthday(), birthday(3), birthday(5), -1)
        .await
        .unwrap();
    assert_eq!(ids(&exact), vec![4]);
}

#[tokio::test]
async fn test_target_field_errors_do_not_reach_the_database() {
    let (repo, cancel) = setup().await;

    let err = repo
        .find_before(&cancel, &User::default(), mid(1), -1)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NoTargetField { expected: None }));

    let err = repo
        .find_compare(&cancel, &with_birthday(), 3i32, Operator::Lt, -1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DataError::NoTargetField {
            expected: Some(ValueKind::I32)
        }
    ));

    // i64 is not i32.
    let err = repo
        .find_compare(&cancel, &with_age(1), 3i64, Operator::Lt, -1)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NoTargetField { .. }));

    let ambiguous = User {
        model: Model {
            created_at: mark::target_time(),
            ..Default::default()
        },
        birthday: Some(mark::target_time()),
        ..Default::default()
    };
    let err = repo
        .find_after(&cancel, &ambiguous, mid(1), -1)
        .await
        .unwrap_err();
    match err {
        DataError::AmbiguousTargetField { kind, fields } => {
            assert_eq!(kind, ValueKind::Timestamp);
            assert_eq!(fields, vec!["created_at", "birthday"]);
        }
        other => panic!("expected ambiguity, got {other}"),
    }
}

#[tokio::test]
async fn test_update_writes_non_default_fields() {
    let (repo, cancel) = setup().await;
    let mut user = repo.get_by_id(&cancel, 2).await.unwrap();
    let before = user.model.updated_at;
    user.age = 30;
    assert_eq!(repo.update(&cancel, &mut user).await.unwrap(), 1);
    assert_eq!(user.age, 30);
    assert!(user.model.updated_at >= before);

    let stored = repo.get_by_id(&cancel, 2).await.unwrap();
    assert_eq!(stored.age, 30);
    assert_eq!(stored.username, "user2");

    // A sparse update leaves unset columns alone.
    let mut sparse = User {
        model: Model {
            id: 2,
            ..Default::default()
        },
        email: "two@example.com".into(),
        ..Default::default()
    };
    repo.update(&cancel, &mut sparse).await.unwrap();
    assert_eq!(sparse.age, 30);
    assert_eq!(sparse.email, "two@example.com");
}

#[tokio::test]
async fn test_update_without_id_creates() {
    let (repo, cancel) = setup().await;
    let mut user = User {
        username: "upsert".into(),
        email: "upsert@example.com".into(),
        age: 50,
        ..Default::default()
    };
    assert_eq!(repo.update(&cancel, &mut user).await.unwrap(), 1);
    assert_eq!(user.model.id, 11);
}

#[tokio::test]
async fn test_soft_delete_hides_rows() {
    let (repo, cancel) = setup().await;
    let user = repo.get_by_id(&cancel, 5).await.unwrap();
    assert_eq!(repo.delete(&cancel, &user).await.unwrap(), 1);
    assert!(repo.get_by_id(&cancel, 5).await.unwrap_err().is_not_found());
    assert_eq!(repo.find_all(&cancel, -1).await.unwrap().len(), 9);

    // Deleting again touches nothing; the row itself is still there.
    assert_eq!(repo.delete(&cancel, &user).await.unwrap(), 0);
    let raw: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(repo.basic().store().pool())
        .await
        .unwrap();
    assert_eq!(raw, 10);

    assert_eq!(repo.delete_by_id(&cancel, 7).await.unwrap(), 1);
    let page = repo.p_find_all(&cancel, Pageable::new(1, 20)).await.unwrap();
    assert_eq!(page.total_count, 8);

    // Updating a deleted row finds nothing to update.
    let mut gone = user.clone();
    gone.age = 99;
    assert!(repo.update(&cancel, &mut gone).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_requires_primary_key() {
    let (repo, cancel) = setup().await;
    let err = repo.delete(&cancel, &User::default()).await.unwrap_err();
    assert!(matches!(err, DataError::MissingPrimaryKey { table } if table == "users"));
    let err = repo.delete_by_id(&cancel, 0).await.unwrap_err();
    assert!(matches!(err, DataError::MissingPrimaryKey { .. }));
}

#[tokio::test]
async fn test_pagination() {
    let (repo, cancel) = setup().await;
    let page = repo.p_find_all(&cancel, Pageable::new(2, 3)).await.unwrap();
    assert_eq!(ids(&page.results), vec![4, 5, 6]);
    assert_eq!(page.page, 2);
    assert_eq!(page.page_size, 3);
    assert_eq!(page.total_count, 10);
    assert_eq!(page.total_page, 3);
    assert!(page.has_next());

    let page = repo
        .p_find_by(&cancel, &with_age(20), Pageable::new(1, 2))
        .await
        .unwrap();
    assert_eq!(ids(&page.results), vec![1, 3]);
    // Totals count every live row, not only the filtered ones.
    assert_eq!(page.total_count, 10);
    assert_eq!(page.total_page, 5);
    assert!(page.has_next());

    let page = repo
        .p_find_compare(&cancel, &with_age(1), 22i32, Operator::Gte, Pageable::new(2, 2))
        .await
        .unwrap();
    assert_eq!(ids(&page.results), vec![5, 7]);
    assert_eq!(page.total_count, 10);

    let page = repo
        .p_find_between(
            &cancel,
            &with_birthday(),
            mid(1),
            mid(9),
            Pageable::new(3, 3),
        )
        .await
        .unwrap();
    assert_eq!(ids(&page.results), vec![8, 9]);
    assert_eq!(page.total_count, 10);
    assert_eq!(page.total_page, 3);
    assert!(!page.has_next());

    let cond = User {
        username: "user%".into(),
        ..Default::default()
    };
    let page = repo.p_like(&cancel, &cond, Pageable::new(4, 3)).await.unwrap();
    assert_eq!(ids(&page.results), vec![10]);

    let page = repo
        .p_find_before(&cancel, &with_birthday(), mid(2), Pageable::new(1, 10))
        .await
        .unwrap();
    assert_eq!(ids(&page.results), vec![1, 2]);
    assert_eq!(page.total_count, 10);
    let page = repo
        .p_find_after(&cancel, &with_birthday(), mid(2), Pageable::new(5, 10))
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_count, 10);
}

#[tokio::test]
async fn test_cancelled_scope() {
    let (repo, cancel) = setup().await;
    cancel.cancel();
    let err = repo.get_by_id(&cancel, 1).await.unwrap_err();
    assert!(matches!(err, DataError::Cancelled));

    let mut user = User {
        username: "never".into(),
        ..Default::default()
    };
    let err = repo.create(&cancel, &mut user).await.unwrap_err();
    assert!(matches!(err, DataError::Cancelled));

    let live = CancellationToken::new();
    assert_eq!(repo.find_all(&live, -1).await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_failed_mutation_rolls_back() {
    let (repo, cancel) = setup().await;
    let store = repo.basic().store();
    let stmt = Statement::new(
        "UPDATE users SET age = ? WHERE id = ? AND no_such_column = 1",
        vec![Value::I32(1), Value::I64(1)],
    );
    let err = store.execute(&cancel, stmt).await.unwrap_err();
    assert!(matches!(err, DataError::Database(_)));
    assert_eq!(repo.get_by_id(&cancel, 1).await.unwrap().age, 20);

    let stmt = Statement::new("UPDATE users SET age = age + 1", vec![]);
    assert_eq!(store.execute(&cancel, stmt).await.unwrap(), 10);
}

#[tokio::test]
async fn test_eager_repository_preloads() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let store = SqlxStore::<User, Sqlite>::new(pool().await).with_preloader(move |_pool, rows| {
        seen.fetch_add(rows.len(), Ordering::SeqCst);
        async { Ok::<_, sqlx::Error>(()) }.boxed()
    });
    seeded(store.clone()).await;
    let cancel = CancellationToken::new();

    let config = DataConfig {
        eager: true,
        ..Default::default()
    };
    let eager: Repo = config.repository(store.clone());
    eager.find_all(&cancel, -1).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 10);
    eager.get_by_id(&cancel, 1).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 11);

    let lazy = Repo::new(store);
    lazy.find_all(&cancel, -1).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 11);
}

#[tokio::test]
async fn test_table_name_from_derive() {
    assert_eq!(User::table_name(), "users");
    let columns: Vec<_> = repokit_data::record::describe::<User>()
        .iter()
        .map(|d| d.column_name())
        .collect();
    assert_eq!(
        columns,
        vec![
            "id",
            "created_at",
            "updated_at",
            "deleted_at",
            "username",
            "email",
            "age",
            "birthday"
        ]
    );
}

#[derive(Debug, Clone, Default, PartialEq, Record, Entity, sqlx::FromRow)]
#[orm(table = "items")]
pub struct Item {
    #[orm(primary_key)]
    pub id: i64,
    pub order: i32,
    pub label: String,
}

#[tokio::test]
async fn test_keyword_column_names() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            \"order\" INTEGER NOT NULL,
            label TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    let repo = UltimateRepository::<Item, i64, _>::new(SqlxStore::<Item, Sqlite>::new(pool));
    let cancel = CancellationToken::new();

    for (order, label) in [(3, "third"), (1, "first"), (3, "again")] {
        let mut item = Item {
            order,
            label: label.into(),
            ..Default::default()
        };
        repo.create(&cancel, &mut item).await.unwrap();
        assert!(item.id > 0);
    }

    let cond = Item {
        order: 3,
        ..Default::default()
    };
    let found = repo.find_by(&cancel, &cond, -1).await.unwrap();
    let labels: Vec<_> = found.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["third", "again"]);

    let mut first = repo.get_by_id(&cancel, 2).await.unwrap();
    first.order = 7;
    assert_eq!(repo.update(&cancel, &mut first).await.unwrap(), 1);
    assert_eq!(repo.get_by_id(&cancel, 2).await.unwrap().order, 7);

    let page = repo
        .p_find_compare(&cancel, &cond, 5i32, Operator::Gte, Pageable::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.total_count, 3);

    assert_eq!(repo.delete_by_id(&cancel, 1).await.unwrap(), 1);
    assert_eq!(repo.find_all(&cancel, -1).await.unwrap().len(), 2);
}
