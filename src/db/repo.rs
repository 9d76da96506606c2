use super::model::SeedData;
use crate::model::{Category, NewQuestion, Question};
use anyhow::{anyhow, Result};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;
use tracing::instrument;

pub type Pool = SqlitePool;

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

pub async fn init_pool(database_url: &str) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let pool = SqlitePool::connect(&normalized).await?;
    sqlx::query("PRAGMA journal_mode=WAL;")
        .execute(&pool)
        .await?;
    Ok(pool)
}

/// If using a file-backed SQLite URL, expand a leading `~/`, ensure the parent
/// directory exists and ask SQLite to create the file. In-memory URLs pass through.
fn prepare_sqlite_url(url: &str) -> String {
    if !url.starts_with("sqlite:") || url.starts_with("sqlite::memory") {
        return url.to_string();
    }

    let rest = &url["sqlite:".len()..];
    let path_with_query = rest.strip_prefix("//").unwrap_or(rest);
    let (path_part, query_part) = match path_with_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_with_query, None),
    };
    if path_part.is_empty() {
        return url.to_string();
    }

    let expanded_path = match (path_part.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), rest),
        _ => path_part.to_string(),
    };

    if let Some(parent) = std::path::Path::new(&expanded_path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let query = match query_part {
        Some(q) if q.contains("mode=") => q.to_string(),
        Some(q) => format!("{q}&mode=rwc"),
        None => "mode=rwc".to_string(),
    };
    format!("sqlite://{expanded_path}?{query}")
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn all_categories(pool: &Pool) -> Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>("SELECT id, type FROM categories ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[instrument(skip_all)]
pub async fn get_category(pool: &Pool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query_as::<_, Category>("SELECT id, type FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

#[instrument(skip_all)]
pub async fn insert_category(pool: &Pool, kind: &str) -> Result<i64> {
    let rec = sqlx::query("INSERT INTO categories (type) VALUES (?) RETURNING id")
        .bind(kind)
        .fetch_one(pool)
        .await?;
    Ok(rec.get("id"))
}

#[instrument(skip_all)]
pub async fn all_questions(pool: &Pool) -> Result<Vec<Question>> {
    let rows = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[instrument(skip_all)]
pub async fn questions_in_category(pool: &Pool, category_id: i64) -> Result<Vec<Question>> {
    let rows = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE category = ? ORDER BY id"
    ))
    .bind(category_id.to_string())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Case-insensitive substring match on the question text.
///
/// Case folding happens here rather than in SQL: SQLite `LIKE` folds ASCII only.
#[instrument(skip_all)]
pub async fn search_questions(pool: &Pool, term: &str) -> Result<Vec<Question>> {
    let needle = term.to_lowercase();
    let matches = all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect();
    Ok(matches)
}

#[instrument(skip_all)]
pub async fn get_question(pool: &Pool, id: i64) -> Result<Option<Question>> {
    let row = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

#[instrument(skip_all)]
pub async fn insert_question(pool: &Pool, new: &NewQuestion) -> Result<i64> {
    let rec = sqlx::query(
        "INSERT INTO questions (question, answer, category, difficulty) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(&new.question)
    .bind(&new.answer)
    .bind(&new.category)
    .bind(new.difficulty)
    .fetch_one(pool)
    .await?;
    Ok(rec.get("id"))
}

/// Returns `false` when no row had that id.
#[instrument(skip_all)]
pub async fn delete_question(pool: &Pool, id: i64) -> Result<bool> {
    let res = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Questions eligible for the next quiz round, ordered by id.
#[instrument(skip_all)]
pub async fn quiz_candidates(
    pool: &Pool,
    category: Option<&str>,
    exclude: &[i64],
) -> Result<Vec<Question>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE 1 = 1"
    ));
    if let Some(category) = category {
        qb.push(" AND category = ").push_bind(category);
    }
    if !exclude.is_empty() {
        qb.push(" AND id NOT IN (");
        let mut ids = qb.separated(", ");
        for id in exclude {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
    }
    qb.push(" ORDER BY id");
    let rows = qb.build_query_as::<Question>().fetch_all(pool).await?;
    Ok(rows)
}

/// Insert seed categories and questions in one transaction.
///
/// Seed questions name their category by label; labels resolve against the
/// categories already stored plus those inserted here.
#[instrument(skip_all)]
pub async fn apply_seed(pool: &Pool, seed: &SeedData) -> Result<(usize, usize)> {
    let mut tx = pool.begin().await?;
    let mut by_label: HashMap<String, i64> = sqlx::query("SELECT id, type FROM categories")
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|row| (row.get::<String, _>("type"), row.get::<i64, _>("id")))
        .collect();

    let mut categories = 0;
    for category in &seed.categories {
        if by_label.contains_key(&category.kind) {
            continue;
        }
        let id: i64 = sqlx::query("INSERT INTO categories (type) VALUES (?) RETURNING id")
            .bind(&category.kind)
            .fetch_one(&mut *tx)
            .await?
            .get("id");
        by_label.insert(category.kind.clone(), id);
        categories += 1;
    }

    for question in &seed.questions {
        let category_id = by_label
            .get(&question.category)
            .ok_or_else(|| anyhow!("unknown category in seed: {}", question.category))?;
        sqlx::query(
            "INSERT INTO questions (question, answer, category, difficulty) VALUES (?, ?, ?, ?)",
        )
        .bind(&question.question)
        .bind(&question.answer)
        .bind(category_id.to_string())
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok((categories, seed.questions.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::model::{SeedCategory, SeedQuestion};

    async fn setup_pool() -> Pool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn new_question(text: &str, category: &str) -> NewQuestion {
        NewQuestion {
            question: text.into(),
            answer: "answer".into(),
            category: category.into(),
            difficulty: 1,
        }
    }

    #[test]
    fn sqlite_url_normalization() {
        assert_eq!(prepare_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            prepare_sqlite_url("postgres://localhost/db"),
            "postgres://localhost/db"
        );
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("nested").join("trivia.db");
        let url = prepare_sqlite_url(&format!("sqlite://{}", file.display()));
        assert_eq!(url, format!("sqlite://{}?mode=rwc", file.display()));
        assert!(file.parent().unwrap().exists());
    }

    #[tokio::test]
    async fn insert_get_delete() {
        let pool = setup_pool().await;
        let id = insert_question(&pool, &new_question("What is 2+2?", "1"))
            .await
            .unwrap();
        let q = get_question(&pool, id).await.unwrap().unwrap();
        assert_eq!(q.question, "What is 2+2?");
        assert_eq!(q.category, "1");
        assert_eq!(all_questions(&pool).await.unwrap().len(), 1);

        assert!(delete_question(&pool, id).await.unwrap());
        assert!(!delete_question(&pool, id).await.unwrap());
        assert!(get_question(&pool, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn category_filter_and_search() {
        let pool = setup_pool().await;
        let science = insert_category(&pool, "Science").await.unwrap();
        let art = insert_category(&pool, "Art").await.unwrap();
        insert_question(&pool, &new_question("Which planet is red?", &science.to_string()))
            .await
            .unwrap();
        insert_question(&pool, &new_question("Who painted the Mona Lisa?", &art.to_string()))
            .await
            .unwrap();

        let in_art = questions_in_category(&pool, art).await.unwrap();
        assert_eq!(in_art.len(), 1);
        assert_eq!(in_art[0].category, art.to_string());

        let hits = search_questions(&pool, "PLANET").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].question.contains("planet"));
        assert!(search_questions(&pool, "50%").await.unwrap().is_empty());

        assert_eq!(get_category(&pool, science).await.unwrap().unwrap().kind, "Science");
        assert!(get_category(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = setup_pool().await;
        insert_question(&pool, &new_question("Wer schrieb ÜBER die Zeit?", "1"))
            .await
            .unwrap();
        insert_question(&pool, &new_question("Was ist die Hauptstadt?", "1"))
            .await
            .unwrap();

        let hits = search_questions(&pool, "über").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].question.contains("ÜBER"));
        assert_eq!(search_questions(&pool, "ÜBER DIE").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn quiz_candidates_respects_filters() {
        let pool = setup_pool().await;
        let mut ids = Vec::new();
        for (text, cat) in [("a", "1"), ("b", "1"), ("c", "2"), ("d", "1")] {
            ids.push(insert_question(&pool, &new_question(text, cat)).await.unwrap());
        }

        assert_eq!(quiz_candidates(&pool, None, &[]).await.unwrap().len(), 4);

        let cands = quiz_candidates(&pool, Some("1"), &[ids[0]]).await.unwrap();
        let got: Vec<i64> = cands.iter().map(|q| q.id).collect();
        assert_eq!(got, vec![ids[1], ids[3]]);

        let cands = quiz_candidates(&pool, None, &ids).await.unwrap();
        assert!(cands.is_empty());
    }

    #[tokio::test]
    async fn seed_resolves_labels_and_skips_existing_categories() {
        let pool = setup_pool().await;
        insert_category(&pool, "Science").await.unwrap();
        let seed = SeedData {
            categories: vec![
                SeedCategory { kind: "Science".into() },
                SeedCategory { kind: "Art".into() },
            ],
            questions: vec![SeedQuestion {
                question: "Who painted Guernica?".into(),
                answer: "Picasso".into(),
                category: "Art".into(),
                difficulty: 2,
            }],
        };
        let (cats, qs) = apply_seed(&pool, &seed).await.unwrap();
        assert_eq!((cats, qs), (1, 1));

        let labels: Vec<String> = all_categories(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(labels, vec!["Science", "Art"]);
        let art = all_questions(&pool).await.unwrap();
        assert_eq!(art[0].category, "2");
    }

    #[tokio::test]
    async fn seed_with_unknown_label_rolls_back() {
        let pool = setup_pool().await;
        let seed = SeedData {
            categories: vec![SeedCategory { kind: "History".into() }],
            questions: vec![SeedQuestion {
                question: "q".into(),
                answer: "a".into(),
                category: "Nope".into(),
                difficulty: 1,
            }],
        };
        assert!(apply_seed(&pool, &seed).await.is_err());
        assert!(all_categories(&pool).await.unwrap().is_empty());
    }
}
