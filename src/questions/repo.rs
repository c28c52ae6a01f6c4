use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::Question;

/// Read-only view of the question catalog.
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    /// Every question, in catalog order.
    async fn list(&self) -> anyhow::Result<Vec<Question>>;
}

#[derive(Clone)]
pub struct PgQuestionCatalog {
    db: PgPool,
}

impl PgQuestionCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuestionCatalog for PgQuestionCatalog {
    async fn list(&self) -> anyhow::Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer
              FROM questions
             ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list questions")?;
        Ok(rows)
    }
}
