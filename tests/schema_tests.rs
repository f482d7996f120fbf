// tests/schema_tests.rs

use quiz_backend::{db, store::QuestionStore};

fn database_url(dir: &tempfile::TempDir) -> String {
    format!("sqlite://{}", dir.path().join("quiz.sqlite").display())
}

async fn table_names(pool: &sqlx::SqlitePool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' \
         AND name NOT LIKE 'sqlite%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn schema_init_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);

    let pool = db::connect(&url, 2).await.unwrap();
    db::init_schema(&pool).await.unwrap();
    sqlx::query(
        "INSERT INTO users (email, password) VALUES ('kept@example.com', 'x')",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    // A second startup neither fails nor loses data.
    let pool = db::connect(&url, 2).await.unwrap();
    db::init_schema(&pool).await.unwrap();
    db::health_check(&pool).await.unwrap();

    assert_eq!(
        table_names(&pool).await,
        vec!["questions", "user_questions", "users"]
    );
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
}

#[tokio::test]
async fn foreign_keys_are_enforced_on_every_connection() {
    let dir = tempfile::tempdir().unwrap();
    let pool = db::connect(&database_url(&dir), 3).await.unwrap();
    db::init_schema(&pool).await.unwrap();

    for _ in 0..3 {
        let mut conn = pool.acquire().await.unwrap();
        let enforced: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(enforced, 1);
    }
}

#[tokio::test]
async fn legacy_database_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);

    // A database written before image subtypes were recorded.
    let pool = db::connect(&url, 1).await.unwrap();
    sqlx::query(
        r#"
        CREATE TABLE questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            year_of_paper TEXT NOT NULL,
            subject TEXT NOT NULL,
            topic TEXT NOT NULL,
            paper TEXT NOT NULL,
            question_number INTEGER NOT NULL,
            question BLOB NOT NULL,
            points_available INTEGER NOT NULL DEFAULT 0,
            time_available INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO questions (year_of_paper, subject, topic, paper, question_number, question) \
         VALUES ('2015', 'Physics', 'Optics', 'Paper 3', 4, X'FFD8FFE0')",
    )
    .execute(&pool)
    .await
    .unwrap();

    db::init_schema(&pool).await.unwrap();

    let store = QuestionStore::new(pool.clone());
    let questions = store.list_all().await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].image_type, "jpeg");
    assert_eq!(
        store.get_image(questions[0].id).await.unwrap(),
        "data:image/jpeg;base64,/9j/4A=="
    );
}
