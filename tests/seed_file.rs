use trivia_api::db::{self, SeedData};

async fn setup_pool() -> sqlx::SqlitePool {
    let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

fn shipped_seed() -> SeedData {
    let content = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/seed.yaml")).unwrap();
    serde_yaml::from_str(&content).unwrap()
}

#[tokio::test]
async fn shipped_seed_loads_and_is_idempotent_for_categories() {
    let pool = setup_pool().await;
    let seed = shipped_seed();

    let (categories, questions) = db::apply_seed(&pool, &seed).await.unwrap();
    assert_eq!(categories, seed.categories.len());
    assert_eq!(questions, seed.questions.len());

    // Every stored question points at an existing category.
    let ids: Vec<String> = db::all_categories(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id.to_string())
        .collect();
    for q in db::all_questions(&pool).await.unwrap() {
        assert!(ids.contains(&q.category), "dangling category {}", q.category);
    }

    let (categories, _) = db::apply_seed(&pool, &seed).await.unwrap();
    assert_eq!(categories, 0);
    assert_eq!(db::all_categories(&pool).await.unwrap().len(), seed.categories.len());
}
