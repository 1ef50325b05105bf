//! Quiz commands for CLI.

use clap::Subcommand;
use trailhead_core::ai::MockGenerator;
use trailhead_core::quiz::{generate_quiz, record_quiz_attempt};
use trailhead_core::storage::{Config, Database};

use super::resolve_user;

#[derive(Subcommand)]
pub enum QuizAction {
    /// Generate the quiz for a path
    Generate {
        /// Path id
        path_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
        /// Question count; defaults to the configured value
        #[arg(long)]
        questions: Option<usize>,
    },
    /// Show a path's quiz
    Show {
        /// Path id
        path_id: String,
    },
    /// Record a finished quiz run
    Attempt {
        /// Quiz id
        quiz_id: String,
        /// Correct answers
        score: u32,
        /// Total questions answered
        total: u32,
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// List the attempts recorded against a quiz
    Attempts {
        /// Quiz id
        quiz_id: String,
    },
}

pub fn run(action: QuizAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        QuizAction::Generate {
            path_id,
            user,
            questions,
        } => {
            let actor = resolve_user(&db, &user)?;
            let count = match questions {
                Some(n) => n,
                None => Config::load()?.study.quiz_questions,
            };
            let quiz = generate_quiz(&db, &MockGenerator, &actor.id, &path_id, count)?;
            println!("Quiz generated: {}", quiz.id);
            println!("{}", serde_json::to_string_pretty(&quiz)?);
        }
        QuizAction::Show { path_id } => {
            let quiz = db
                .get_quiz_by_path(&path_id)?
                .ok_or_else(|| format!("path {path_id} has no quiz"))?;
            println!("{}", serde_json::to_string_pretty(&quiz)?);
        }
        QuizAction::Attempt {
            quiz_id,
            score,
            total,
            user,
        } => {
            let actor = resolve_user(&db, &user)?;
            let threshold = Config::load()?.study.pass_threshold_pct;
            let attempt = record_quiz_attempt(&db, &actor.id, &quiz_id, score, total, threshold)?;
            println!(
                "Attempt recorded: {}/{} ({})",
                attempt.score,
                attempt.total_questions,
                if attempt.passed { "passed" } else { "failed" }
            );
            println!("{}", serde_json::to_string_pretty(&attempt)?);
        }
        QuizAction::Attempts { quiz_id } => {
            let attempts = db.list_quiz_attempts(&quiz_id)?;
            println!("{}", serde_json::to_string_pretty(&attempts)?);
        }
    }
    Ok(())
}
