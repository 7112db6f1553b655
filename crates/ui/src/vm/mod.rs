mod lesson_form_vm;
mod lesson_vm;
mod quiz_vm;
mod results_vm;

pub use lesson_form_vm::{LessonFormVm, QuestionFormVm};
pub use lesson_vm::{HeaderVm, LessonCardVm, map_header, map_lesson_cards};
pub use quiz_vm::{AnswerMarker, AnswerRowVm, QuizScreenVm, QuizVm};
pub use results_vm::ResultsVm;
