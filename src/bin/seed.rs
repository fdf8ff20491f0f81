//! Test-data generator: inserts test users and a realistic distribution of
//! notifications directly into the `activity` schema. Development tooling
//! only; the API itself never writes tables directly.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Generate test users and notifications for the activity schema")]
struct Args {
    /// Number of notifications to insert
    #[arg(long, default_value_t = 1000)]
    count: usize,

    /// Number of test users to ensure exist
    #[arg(long, default_value_t = 30)]
    users: usize,
}

/// (type, weight, has_actor, target_type, title, message)
const NOTIFICATION_TYPES: &[(&str, f64, bool, Option<&str>, &str, &str)] = &[
    ("comment", 0.25, true, Some("post"), "New comment on your post", "Someone commented on your post"),
    ("reaction", 0.20, true, Some("post"), "Someone reacted to your post", "Your post received a new reaction"),
    ("activity_invite", 0.15, true, Some("activity"), "You're invited to an activity", "Join us for a meetup"),
    ("new_post", 0.12, true, Some("community"), "New post in your community", "Check out the latest post"),
    ("activity_reminder", 0.10, false, Some("activity"), "Upcoming activity reminder", "Your activity starts soon"),
    ("activity_update", 0.08, true, Some("activity"), "Activity updated", "The organizer updated the details"),
    ("mention", 0.05, true, Some("post"), "You were mentioned", "Someone mentioned you in a post"),
    ("profile_view", 0.02, true, Some("user"), "Someone viewed your profile", "A user checked out your profile"),
    ("new_favorite", 0.01, true, Some("user"), "You have a new favorite", "Someone added you to their favorites"),
    ("community_invite", 0.01, true, Some("community"), "Community invitation", "You've been invited to join"),
    ("new_member", 0.005, true, Some("community"), "New member joined", "A new member joined your community"),
    ("system", 0.005, false, None, "System notification", "Important system message"),
];

const STATUS_DISTRIBUTION: &[(&str, f64)] = &[("unread", 0.75), ("read", 0.20), ("archived", 0.05)];

const FIRST_NAMES: &[&str] = &[
    "John", "Emma", "Michael", "Sophie", "David", "Lisa", "James", "Sarah", "Robert", "Anna",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez",
];
const SUBSCRIPTION_LEVELS: &[&str] = &["free", "club", "premium"];

// bcrypt hash of "test123"
const TEST_PASSWORD_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5NU7dNmDwSIva";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url())
        .await
        .context("database connection failed")?;

    println!("Database connection established");

    create_test_users(&pool, args.users).await?;
    let user_ids = test_user_ids(&pool).await?;
    if user_ids.len() < 2 {
        bail!("need at least 2 test users to assign actors");
    }

    generate_notifications(&pool, &user_ids, args.count).await?;
    show_statistics(&pool).await?;

    println!("Done. {} test notifications generated.", args.count);
    Ok(())
}

fn database_url() -> String {
    let var = |name: &str, default: &str| {
        std::env::var(name).unwrap_or_else(|_| default.to_string())
    };
    format!(
        "postgres://{}:{}@{}:{}/{}",
        var("DB_USER", "api_user"),
        var("DB_PASSWORD", "changeme"),
        var("DB_HOST", "localhost"),
        var("DB_PORT", "5432"),
        var("DB_NAME", "activity_platform"),
    )
}

async fn create_test_users(pool: &PgPool, count: usize) -> Result<()> {
    println!("Creating {count} test users...");

    for i in 1..=count {
        sqlx::query(
            "INSERT INTO activity.users (
                email, username, password_hash, first_name, last_name, subscription_level
            ) VALUES ($1, $2, $3, $4, $5, $6::activity.subscription_level)
            ON CONFLICT (email) DO NOTHING",
        )
        .bind(format!("testuser{i}@meet5.test"))
        .bind(format!("testuser{i}"))
        .bind(TEST_PASSWORD_HASH)
        .bind(FIRST_NAMES[i % FIRST_NAMES.len()])
        .bind(LAST_NAMES[i % LAST_NAMES.len()])
        .bind(SUBSCRIPTION_LEVELS[i % SUBSCRIPTION_LEVELS.len()])
        .execute(pool)
        .await?;
    }

    println!("Test users created/verified");
    Ok(())
}

async fn test_user_ids(pool: &PgPool) -> Result<Vec<Uuid>> {
    let rows = sqlx::query("SELECT user_id FROM activity.users WHERE email LIKE '%@meet5.test'")
        .fetch_all(pool)
        .await?;
    rows.iter()
        .map(|row| row.try_get("user_id").map_err(Into::into))
        .collect()
}

/// Random timestamp in the last 90 days, weighted towards recent dates.
fn random_recent_date(rng: &mut impl Rng) -> DateTime<Utc> {
    let days_ago = rng.gen::<f64>().powi(2) * 90.0;
    Utc::now() - Duration::seconds((days_ago * 86_400.0) as i64)
}

fn pick_weighted<'a>(rng: &mut impl Rng, choices: &[(&'a str, f64)]) -> &'a str {
    let total: f64 = choices.iter().map(|(_, w)| w).sum();
    let roll = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (choice, weight) in choices {
        cumulative += weight;
        if roll <= cumulative {
            return choice;
        }
    }
    choices.last().map(|(c, _)| *c).unwrap_or("system")
}

fn generate_payload(rng: &mut impl Rng, notification_type: &str) -> serde_json::Value {
    let pick = |rng: &mut dyn rand::RngCore, options: &[&str]| -> String {
        options.choose(rng).copied().unwrap_or_default().to_string()
    };

    match notification_type {
        "comment" => json!({
            "comment_text": pick(rng, &[
                "Great photo! Where was this taken?",
                "Thanks for organizing!",
                "Count me in for next time!",
                "Amazing experience!",
            ]),
            "post_title": pick(rng, &[
                "Amazing sunset hike",
                "Weekend cycling adventure",
                "Coffee meetup recap",
            ]),
        }),
        "reaction" => json!({
            "reaction_type": pick(rng, &["like", "love", "celebrate", "support"]),
            "post_title": "Weekend cycling adventure",
        }),
        "activity_invite" => json!({
            "activity_title": pick(rng, &[
                "Coffee & Networking",
                "Sunday Brunch",
                "Beach Volleyball",
                "Movie Night",
            ]),
            "activity_date": (Utc::now() + Duration::days(rng.gen_range(1..=30))).to_rfc3339(),
            "location": pick(rng, &["Central Park", "Coffee House", "Beach Club"]),
        }),
        "new_post" => json!({
            "community_name": pick(rng, &["Runners Club", "Food Lovers", "Yoga Enthusiasts"]),
            "post_title": "Check out this new post!",
        }),
        "activity_reminder" => json!({
            "activity_title": pick(rng, &["Sunday Brunch Meetup", "Morning Run", "Yoga Session"]),
            "starts_at": (Utc::now() + Duration::hours(24)).to_rfc3339(),
        }),
        "activity_update" => json!({
            "activity_title": "Beach Volleyball",
            "update_type": pick(rng, &["location_changed", "time_changed", "details_updated"]),
        }),
        "mention" => json!({
            "post_title": "Great meetup yesterday!",
            "mention_context": "Thanks @user for organizing!",
        }),
        "profile_view" => json!({
            "is_premium_feature": true,
            "viewer_interests": (["hiking", "photography", "cooking", "yoga", "running"]
                .choose_multiple(rng, 2)
                .copied()
                .collect::<Vec<_>>()),
        }),
        "new_favorite" => json!({ "is_premium_feature": true }),
        "community_invite" => json!({
            "community_name": pick(rng, &["Food Lovers", "Tech Enthusiasts", "Book Club"]),
            "inviter_username": format!("user_{}", rng.gen_range(1..=100)),
        }),
        "new_member" => json!({
            "community_name": pick(rng, &["Yoga Enthusiasts", "Runners Club"]),
        }),
        "system" => json!({
            "notification_code": pick(rng, &[
                "ACCOUNT_VERIFIED",
                "SUBSCRIPTION_RENEWED",
                "SECURITY_ALERT",
                "FEATURE_ANNOUNCEMENT",
            ]),
        }),
        _ => json!({}),
    }
}

async fn generate_notifications(pool: &PgPool, user_ids: &[Uuid], count: usize) -> Result<()> {
    println!("Generating {count} notifications...");
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let recipient = *user_ids.choose(&mut rng).expect("non-empty user list");

        // Weighted type pick, same cumulative walk as the status pick.
        let type_roll = rng.gen::<f64>();
        let mut cumulative = 0.0;
        let mut selected = NOTIFICATION_TYPES.last().expect("non-empty type table");
        for entry in NOTIFICATION_TYPES {
            cumulative += entry.1;
            if type_roll <= cumulative {
                selected = entry;
                break;
            }
        }
        let (notif_type, _, has_actor, target_type, title, message) = *selected;

        let actor: Option<Uuid> = if has_actor && rng.gen::<f64>() < 0.8 {
            let candidates: Vec<Uuid> =
                user_ids.iter().copied().filter(|id| *id != recipient).collect();
            candidates.choose(&mut rng).copied()
        } else {
            None
        };

        let created_at = random_recent_date(&mut rng);
        let status = pick_weighted(&mut rng, STATUS_DISTRIBUTION);
        let read_at = if status == "read" || status == "archived" {
            Some(created_at + Duration::hours(rng.gen_range(1..=168)))
        } else {
            None
        };
        let payload = generate_payload(&mut rng, notif_type);

        sqlx::query(
            "INSERT INTO activity.notifications (
                user_id, actor_user_id, notification_type, target_type, target_id,
                title, message, status, created_at, read_at, payload
            ) VALUES (
                $1, $2, $3::activity.notification_type, $4, gen_random_uuid(),
                $5, $6, $7::activity.notification_status, $8, $9, $10
            )",
        )
        .bind(recipient)
        .bind(actor)
        .bind(notif_type)
        .bind(target_type)
        .bind(title)
        .bind(message)
        .bind(status)
        .bind(created_at)
        .bind(read_at)
        .bind(payload)
        .execute(pool)
        .await?;

        if (i + 1) % 100 == 0 {
            println!("  generated {} notifications...", i + 1);
        }
    }

    println!("{count} notifications generated");
    Ok(())
}

async fn show_statistics(pool: &PgPool) -> Result<()> {
    println!("\nGeneration statistics");

    let total: i64 = sqlx::query("SELECT COUNT(*) AS count FROM activity.notifications")
        .fetch_one(pool)
        .await?
        .try_get("count")?;
    println!("Total notifications: {total}");

    println!("\nBy type:");
    let rows = sqlx::query(
        "SELECT notification_type::text AS notification_type, COUNT(*) AS count
         FROM activity.notifications
         GROUP BY notification_type
         ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;
    for row in &rows {
        let ty: String = row.try_get("notification_type")?;
        let count: i64 = row.try_get("count")?;
        println!("  {ty:20} {count:5}");
    }

    println!("\nBy status:");
    let rows = sqlx::query(
        "SELECT status::text AS status, COUNT(*) AS count
         FROM activity.notifications
         GROUP BY status
         ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;
    for row in &rows {
        let status: String = row.try_get("status")?;
        let count: i64 = row.try_get("count")?;
        println!("  {status:20} {count:5}");
    }

    Ok(())
}
