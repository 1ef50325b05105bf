use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "trailhead", version, about = "Trailhead CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User accounts and privacy
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Learning path management
    Path {
        #[command(subcommand)]
        action: commands::path::PathAction,
    },
    /// Resources within a path
    Resource {
        #[command(subcommand)]
        action: commands::resource::ResourceAction,
    },
    /// Quizzes and attempts
    Quiz {
        #[command(subcommand)]
        action: commands::quiz::QuizAction,
    },
    /// Flashcard review decks
    Flashcard {
        #[command(subcommand)]
        action: commands::flashcard::FlashcardAction,
    },
    /// Study goals
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Follows and follow requests
    Follow {
        #[command(subcommand)]
        action: commands::follow::FollowAction,
    },
    /// Notification feed
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export a user's data as JSON
    Export {
        /// Acting username
        #[arg(long)]
        user: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::User { action } => commands::user::run(action),
        Commands::Path { action } => commands::path::run(action),
        Commands::Resource { action } => commands::resource::run(action),
        Commands::Quiz { action } => commands::quiz::run(action),
        Commands::Flashcard { action } => commands::flashcard::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Follow { action } => commands::follow::run(action),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Export { user } => commands::export::run(&user),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
