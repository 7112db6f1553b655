mod ids;
mod lesson;
mod question;
mod user;

pub use ids::{LessonId, ParseIdError, UserId};
pub use lesson::{Difficulty, Lesson, LessonDraft, LessonError};
pub use question::{ANSWERS_PER_QUESTION, Question, QuestionError};
pub use user::{ProgressUpdate, UserProfile};
