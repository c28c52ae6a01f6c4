pub mod repo;
pub mod repo_types;

pub use repo::{PgQuestionCatalog, QuestionCatalog};
pub use repo_types::Question;
