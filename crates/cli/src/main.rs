//! Cuidar de Mim CLI - self-care practices, streaks and progress.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use cuidar_core::{
    format_duration, format_relative_date, Dimension, Practice, PracticeId, Profile, RouteDecision, UserId,
};
use cuidar_progress::{
    checkins_on, habits_on, quote_of_the_day, EngineConfig, HabitUpdate, OnboardingAnswers, ProgressEngine,
};
use cuidar_storage::{
    seed_practices, seed_quotes, typed, Collection, DataSource, Filter, JsonStorage, OrderBy, Record, RecordStore, Value,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cuidar")]
#[command(about = "Self-care practices, streaks and progress", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the JSON data store
    #[arg(short, long, global = true, default_value = ".cuidar")]
    data_dir: PathBuf,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database URL, used instead of the data directory
    #[cfg(feature = "sqlite")]
    #[arg(long, global = true)]
    sqlite: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the practice and quote catalogs
    Seed,
    /// List practices
    Practices {
        /// Only this dimension
        #[arg(long)]
        dimension: Option<Dimension>,
    },
    /// Create a profile for a new user
    Register {
        /// Account email
        email: String,
        /// Display name
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Answer the onboarding questionnaire
    Onboard {
        /// User ID
        user: UserId,
        /// Display name
        #[arg(long)]
        name: String,
        /// Whether the user is a mother
        #[arg(long)]
        mother: Option<bool>,
        /// Number of children
        #[arg(long)]
        children: Option<String>,
        /// Children ages, comma separated
        #[arg(long, default_value = "")]
        ages: String,
        /// Main difficulty (repeatable)
        #[arg(long = "difficulty")]
        difficulties: Vec<String>,
        /// Minutes per day (5, 10, 15 or 30)
        #[arg(long, default_value = "10")]
        time: u32,
        /// Preferred time of day
        #[arg(long, default_value = "09:00")]
        preferred_time: String,
        /// Interest area (repeatable)
        #[arg(long = "interest")]
        interests: Vec<String>,
    },
    /// Record a completed practice
    Complete {
        /// User ID
        user: UserId,
        /// Practice ID
        practice: PracticeId,
        /// Reflection text
        #[arg(long)]
        reflection: Option<String>,
    },
    /// Show the current streak
    Streak {
        /// User ID
        user: UserId,
    },
    /// Show progress per dimension
    Progress {
        /// User ID
        user: UserId,
        /// Persist the recomputed snapshots
        #[arg(long)]
        refresh: bool,
    },
    /// Suggest a practice for today
    Recommend {
        /// User ID
        user: UserId,
    },
    /// Show the home screen summary
    Dashboard {
        /// User ID
        user: UserId,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record how you are feeling
    Checkin {
        /// User ID
        user: UserId,
        /// Mood label
        mood: String,
        /// Emoji for the mood
        #[arg(long, default_value = "")]
        emoji: String,
        /// Note
        #[arg(long)]
        note: Option<String>,
    },
    /// Track or show today's habits
    Habits {
        /// User ID
        user: UserId,
        /// Glasses of water
        #[arg(long)]
        water: Option<u32>,
        /// Slept well
        #[arg(long)]
        sleep: Option<bool>,
        /// Exercised
        #[arg(long)]
        exercise: Option<bool>,
    },
    /// Show the quote of the day
    Quote,
    /// Check where a request would be routed
    Route {
        /// Request path
        path: String,
        /// Signed-in user, if any
        #[arg(long)]
        user: Option<UserId>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    debug!(?config, "loaded config");
    Ok(config)
}

async fn open_store(cli: &Cli) -> Result<Arc<dyn RecordStore>> {
    #[cfg(feature = "sqlite")]
    if let Some(url) = &cli.sqlite {
        info!(url = %url, "opening sqlite store");
        return Ok(Arc::new(cuidar_storage::SqliteStorage::new(url).await?));
    }

    info!(path = %cli.data_dir.display(), "opening json store");
    Ok(Arc::new(JsonStorage::new(&cli.data_dir).await?))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).await?;
    let store = open_store(&cli).await?;
    let engine = ProgressEngine::new(store.clone()).with_config(config);

    match cli.command {
        Commands::Seed => {
            let practices = seed_practices(store.as_ref()).await?;
            let quotes = seed_quotes(store.as_ref()).await?;
            println!("Seeded {practices} practices and {quotes} quotes");
        }
        Commands::Practices { dimension } => {
            let mut filter = Filter::new();
            if let Some(dimension) = dimension {
                filter = filter.eq("dimension", Value::text(dimension));
            }
            let rows = store
                .list(Collection::Practices, &filter, Some(&OrderBy::asc("order_index")), None)
                .await?;
            let practices = typed::<Practice>(rows)?;

            println!("Practices ({})", practices.len());
            for p in practices {
                println!(
                    "  {} | {:<11} | {:>10} | {}",
                    p.id,
                    p.dimension.label(),
                    format_duration(p.duration_minutes),
                    p.title
                );
            }
        }
        Commands::Register { email, name } => {
            let taken = store
                .count(Collection::Profiles, &Filter::new().eq("email", email.as_str()))
                .await?;
            if taken > 0 {
                bail!("email already registered: {email}");
            }
            let profile = Profile::new(UserId::new(), name, email);
            store.insert(Record::from(profile.clone())).await?;
            println!("Registered user: {}", profile.id);
        }
        Commands::Onboard {
            user,
            name,
            mother,
            children,
            ages,
            difficulties,
            time,
            preferred_time,
            interests,
        } => {
            let answers = OnboardingAnswers {
                name,
                is_mother: mother,
                children_count: children,
                children_ages: ages,
                difficulties,
                available_time: time,
                preferred_time,
                interest_areas: interests,
            };
            let profile = engine.complete_onboarding(user, &answers, Utc::now()).await?;
            println!("Onboarding completed for {}", profile.name);
            println!("  Daily time: {}", format_duration(time));
        }
        Commands::Complete { user, practice, reflection } => {
            let done = engine
                .complete_practice(user, practice, reflection, Local::now())
                .await?;
            engine.refresh_dimension_progress(user, Utc::now()).await?;
            let streak = engine.streak().compute(user, Local::now().date_naive()).await?;
            println!("Completed {} on {}", done.practice_id, done.date);
            println!("  Streak: {streak} day(s)");
        }
        Commands::Streak { user } => {
            let streak = engine.streak().compute(user, Local::now().date_naive()).await?;
            println!("Streak: {streak} day(s)");
        }
        Commands::Progress { user, refresh } => {
            let today = Local::now().date_naive();
            let calc = engine.dimension_progress();

            if refresh {
                engine.refresh_dimension_progress(user, Utc::now()).await?;
            }

            println!("Progress (last {} days)", engine.config().window_days);
            for dimension in Dimension::ALL {
                let pct = calc.compute(user, dimension, Utc::now()).await?;
                let last = calc
                    .last_practice_date(user, dimension)
                    .await?
                    .map(|d| format_relative_date(d, today))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {:<11} {:>3}%  {}", dimension.label(), pct, last);
            }
        }
        Commands::Recommend { user } => {
            match engine.recommender().recommend(user, Local::now().date_naive()).await? {
                Some(p) => {
                    println!("{} ({}, {})", p.title, p.dimension.label(), format_duration(p.duration_minutes));
                    println!("  {}", p.description);
                    println!("  ID: {}", p.id);
                }
                None => println!("No practice fits today"),
            }
        }
        Commands::Dashboard { user, json } => {
            let dash = engine.dashboard(user, Local::now()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dash)?);
                return Ok(());
            }

            println!("{}", dash.greeting);
            println!("{}", dash.date_label);
            println!("  Streak: {} day(s)", dash.streak);
            for d in &dash.dimensions {
                println!("  {:<11} {:>3}%", d.dimension.label(), d.percentage);
            }
            match (&dash.recommendation, &dash.recommendation_duration) {
                (Some(p), Some(duration)) => println!("  Next: {} ({duration})", p.title),
                _ => println!("  Next: nothing fits today"),
            }
            if let Some(quote) = &dash.quote {
                println!("  \"{quote}\"");
            }
        }
        Commands::Checkin { user, mood, emoji, note } => {
            let now = Local::now();
            let checkin = engine.record_checkin(user, &mood, &emoji, note, now).await?;
            println!("Check-in at {}: {} {}", checkin.time, checkin.mood_emoji, checkin.mood);
            let today = checkins_on(store.as_ref(), user, now.date_naive()).await?;
            println!("  {} check-in(s) today", today.len());
        }
        Commands::Habits { user, water, sleep, exercise } => {
            let today = Local::now().date_naive();
            let changes = HabitUpdate {
                water_glasses: water,
                good_sleep: sleep,
                exercised: exercise,
            };
            let habit = if changes == HabitUpdate::default() {
                habits_on(store.as_ref(), user, today).await?
            } else {
                Some(engine.update_habits(user, today, &changes, Utc::now()).await?)
            };

            let answer = |v: Option<bool>| match v {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            };
            match habit {
                Some(h) => {
                    println!("Habits for {}", h.date);
                    println!("  Water: {} glass(es)", h.water_glasses);
                    println!("  Slept well: {}", answer(h.good_sleep));
                    println!("  Exercised: {}", answer(h.exercised));
                }
                None => println!("No habits tracked today"),
            }
        }
        Commands::Quote => match quote_of_the_day(store.as_ref(), Local::now().date_naive()).await? {
            Some(q) => println!("\"{}\"", q.text),
            None => println!("No quotes yet, run `cuidar seed`"),
        },
        Commands::Route { path, user } => match engine.route_for(&path, user).await? {
            RouteDecision::Allow => println!("allow {path}"),
            RouteDecision::Redirect { location } => println!("redirect {path} -> {location}"),
        },
    }

    Ok(())
}
