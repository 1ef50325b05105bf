//! Generated study content.
//!
//! Real generation happens in an external service; the core only defines
//! the seam. [`ContentGenerator`] is the trait the quiz, flashcard, and
//! summary operations call through, and [`MockGenerator`] is the shipped
//! implementation: deterministic questions and cards derived from the
//! path's resource titles, good enough for tests and offline use.

use crate::quiz::QuizQuestion;
use crate::resource::Resource;

/// Seam for AI-backed content generation.
pub trait ContentGenerator {
    /// Produce a multiple-choice question set for a path.
    fn generate_questions(
        &self,
        path_title: &str,
        resources: &[Resource],
        count: usize,
    ) -> Vec<QuizQuestion>;

    /// Produce front/back review cards for a path.
    fn generate_flashcards(&self, path_title: &str, resources: &[Resource]) -> Vec<(String, String)>;

    /// Summarize a single resource.
    fn summarize(&self, resource: &Resource) -> String;
}

/// Deterministic stand-in for the external generation service.
#[derive(Debug, Default)]
pub struct MockGenerator;

impl ContentGenerator for MockGenerator {
    fn generate_questions(
        &self,
        path_title: &str,
        resources: &[Resource],
        count: usize,
    ) -> Vec<QuizQuestion> {
        let mut questions = Vec::with_capacity(count);
        for i in 0..count {
            let topic = resources
                .get(i % resources.len().max(1))
                .map(|r| r.title.as_str())
                .unwrap_or(path_title);
            questions.push(QuizQuestion {
                prompt: format!("Which statement about \"{topic}\" is correct?"),
                options: vec![
                    format!("It is the main topic of \"{path_title}\""),
                    "It is unrelated to this path".to_string(),
                    "It has no practical use".to_string(),
                    "None of the above".to_string(),
                ],
                answer_index: 0,
                difficulty: Some("medium".to_string()),
            });
        }
        questions
    }

    fn generate_flashcards(&self, path_title: &str, resources: &[Resource]) -> Vec<(String, String)> {
        if resources.is_empty() {
            return vec![(
                format!("What is \"{path_title}\" about?"),
                "Review the path description.".to_string(),
            )];
        }
        resources
            .iter()
            .map(|r| {
                (
                    format!("What did you learn from \"{}\"?", r.title),
                    format!("Key takeaways from the {} \"{}\".", r.kind.as_str(), r.title),
                )
            })
            .collect()
    }

    fn summarize(&self, resource: &Resource) -> String {
        format!(
            "Summary of the {} \"{}\": covers the essentials in a few paragraphs.",
            resource.kind.as_str(),
            resource.title
        )
    }
}
