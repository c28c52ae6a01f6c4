use sqlx::FromRow;
use uuid::Uuid;

/// Catalog entry a new user's performance ledger is seeded from.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: Uuid,           // referenced by PerformanceEntry::word
    pub question: String,   // prompt shown to the learner
    pub answer: String,     // expected answer
}
