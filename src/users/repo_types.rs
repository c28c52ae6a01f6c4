use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::questions::Question;
use crate::users::{dto::PublicUser, password};

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,                               // assigned by the database
    pub username: String,                       // unique, never padded with whitespace
    pub password_hash: String,                  // bcrypt hash, never exposed
    pub performance: Json<Vec<PerformanceEntry>>, // embedded ledger, one entry per question
}

/// Tracked state of one catalog question for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub word: Uuid,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl PerformanceEntry {
    /// Fresh entry for `question`: nothing answered yet.
    pub fn seed(question: &Question) -> Self {
        Self {
            word: question.id,
            answer: question.answer.clone(),
            response: None,
            is_correct: None,
        }
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub performance: Vec<PerformanceEntry>,
}

impl NewUser {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            performance: Vec::new(),
        }
    }

    /// Replaces the ledger with one unanswered entry per question, keeping catalog order.
    pub fn seed_performance(&mut self, questions: &[Question]) {
        self.performance = questions.iter().map(PerformanceEntry::seed).collect();
    }
}

impl User {
    pub fn public_view(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
        }
    }

    /// `Ok(false)` on mismatch; errors only when the stored hash is unusable.
    pub async fn verify_password(&self, candidate: &str) -> anyhow::Result<bool> {
        password::verify_password(candidate, &self.password_hash).await
    }

    pub async fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
        password::hash_password(plain, cost).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            question: format!("translate {}", answer),
            answer: answer.into(),
        }
    }

    #[test]
    fn public_view_has_only_id_and_username() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            password_hash: "$2b$04$secret".into(),
            performance: Json(vec![PerformanceEntry::seed(&question("hola"))]),
        };

        let json = serde_json::to_value(user.public_view()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["username"], "alice");
        assert_eq!(obj["id"], user.id.to_string());
    }

    #[test]
    fn seeding_follows_catalog_order() {
        let catalog = vec![question("uno"), question("dos"), question("tres")];
        let mut user = NewUser::new("bob".into(), "hash".into());
        user.seed_performance(&catalog);

        assert_eq!(user.performance.len(), 3);
        for (entry, q) in user.performance.iter().zip(&catalog) {
            assert_eq!(entry.word, q.id);
            assert_eq!(entry.answer, q.answer);
            assert!(entry.response.is_none());
            assert!(entry.is_correct.is_none());
        }
    }

    #[test]
    fn unanswered_entry_omits_optional_fields() {
        let entry = PerformanceEntry::seed(&question("gato"));
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("response").is_none());
        assert!(json.get("is_correct").is_none());

        let back: PerformanceEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
