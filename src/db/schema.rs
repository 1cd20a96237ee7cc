//! Table bootstrap and seed data.
//!
//! Tables are created with `IF NOT EXISTS` and each one is seeded only while
//! it is empty, so running this against an existing database is a no-op.

use sqlx::AnyPool;

use super::Database;
use crate::config::Driver;

const POSTGRES_DDL: [&str; 3] = [
    r#"CREATE TABLE IF NOT EXISTS group_matches (
           id BIGSERIAL PRIMARY KEY,
           match_date TEXT NOT NULL,
           team1 TEXT NOT NULL,
           team2 TEXT NOT NULL,
           venue TEXT,
           result TEXT,
           stage TEXT
       )"#,
    r#"CREATE TABLE IF NOT EXISTS standings (
           id BIGSERIAL PRIMARY KEY,
           team_name TEXT NOT NULL UNIQUE,
           matches_played BIGINT NOT NULL DEFAULT 0,
           wins BIGINT NOT NULL DEFAULT 0,
           losses BIGINT NOT NULL DEFAULT 0,
           points BIGINT NOT NULL DEFAULT 0,
           goal_difference BIGINT NOT NULL DEFAULT 0
       )"#,
    r#"CREATE TABLE IF NOT EXISTS player_stats (
           id BIGSERIAL PRIMARY KEY,
           player_name TEXT NOT NULL,
           team TEXT NOT NULL,
           matches BIGINT NOT NULL DEFAULT 0,
           runs BIGINT NOT NULL DEFAULT 0,
           wickets BIGINT NOT NULL DEFAULT 0,
           catches BIGINT NOT NULL DEFAULT 0
       )"#,
];

const SQLITE_DDL: [&str; 3] = [
    r#"CREATE TABLE IF NOT EXISTS group_matches (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           match_date TEXT NOT NULL,
           team1 TEXT NOT NULL,
           team2 TEXT NOT NULL,
           venue TEXT,
           result TEXT,
           stage TEXT
       )"#,
    r#"CREATE TABLE IF NOT EXISTS standings (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           team_name TEXT NOT NULL UNIQUE,
           matches_played INTEGER NOT NULL DEFAULT 0,
           wins INTEGER NOT NULL DEFAULT 0,
           losses INTEGER NOT NULL DEFAULT 0,
           points INTEGER NOT NULL DEFAULT 0,
           goal_difference INTEGER NOT NULL DEFAULT 0
       )"#,
    r#"CREATE TABLE IF NOT EXISTS player_stats (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           player_name TEXT NOT NULL,
           team TEXT NOT NULL,
           matches INTEGER NOT NULL DEFAULT 0,
           runs INTEGER NOT NULL DEFAULT 0,
           wickets INTEGER NOT NULL DEFAULT 0,
           catches INTEGER NOT NULL DEFAULT 0
       )"#,
];

// (date, team1, team2, venue, result, stage)
const SEED_MATCHES: [(&str, &str, &str, &str, Option<&str>, &str); 6] = [
    ("2025-08-28", "India", "Bangladesh", "Dubai", Some("India won by 41 runs"), "Group A"),
    ("2025-08-29", "Pakistan", "Sri Lanka", "Abu Dhabi", Some("Sri Lanka won by 5 wickets"), "Group A"),
    ("2025-08-31", "India", "Sri Lanka", "Dubai", Some("India won by 7 wickets"), "Group A"),
    ("2025-09-01", "Pakistan", "Bangladesh", "Sharjah", Some("Pakistan won by 22 runs"), "Group A"),
    ("2025-09-02", "India", "Pakistan", "Dubai", None, "Group A"),
    ("2025-09-03", "Sri Lanka", "Bangladesh", "Abu Dhabi", None, "Group A"),
];

// (team, played, won, lost, points, goal difference); deliberately unsorted
const SEED_STANDINGS: [(&str, i64, i64, i64, i64, i64); 4] = [
    ("Sri Lanka", 2, 1, 1, 2, -3),
    ("Bangladesh", 2, 0, 2, 0, -17),
    ("India", 2, 2, 0, 4, 15),
    ("Pakistan", 2, 1, 1, 2, 5),
];

// (player, team, matches, runs, wickets, catches)
const SEED_PLAYERS: [(&str, &str, i64, i64, i64, i64); 8] = [
    ("Jasprit Bumrah", "India", 2, 4, 6, 0),
    ("Shubman Gill", "India", 2, 112, 0, 1),
    ("Babar Azam", "Pakistan", 2, 96, 0, 2),
    ("Kusal Mendis", "Sri Lanka", 2, 88, 0, 3),
    ("Wanindu Hasaranga", "Sri Lanka", 2, 31, 5, 1),
    ("Shaheen Afridi", "Pakistan", 2, 12, 4, 0),
    ("Litton Das", "Bangladesh", 2, 58, 0, 2),
    ("Mustafizur Rahman", "Bangladesh", 2, 12, 3, 1),
];

/// Create tables if missing, then seed any that are empty.
pub async fn bootstrap(db: &Database) -> Result<(), sqlx::Error> {
    let ddl = match db.driver {
        Driver::Postgres => &POSTGRES_DDL,
        Driver::Sqlite => &SQLITE_DDL,
    };
    for statement in ddl {
        sqlx::query(*statement).execute(&db.pool).await?;
    }

    seed_matches(&db.pool).await?;
    seed_standings(&db.pool).await?;
    seed_player_stats(&db.pool).await?;
    Ok(())
}

async fn count(pool: &AnyPool, sql: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await
}

async fn seed_matches(pool: &AnyPool) -> Result<(), sqlx::Error> {
    if count(pool, "SELECT COUNT(*) FROM group_matches").await? > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for (date, team1, team2, venue, result, stage) in SEED_MATCHES {
        sqlx::query(
            r#"INSERT INTO group_matches (match_date, team1, team2, venue, result, stage)
               VALUES ($1, $2, $3, $4, $5, $6)"#
        )
        .bind(date)
        .bind(team1)
        .bind(team2)
        .bind(venue)
        .bind(result)
        .bind(stage)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!(rows = SEED_MATCHES.len(), "Seeded group_matches");
    Ok(())
}

async fn seed_standings(pool: &AnyPool) -> Result<(), sqlx::Error> {
    if count(pool, "SELECT COUNT(*) FROM standings").await? > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for (team, played, won, lost, points, goal_difference) in SEED_STANDINGS {
        sqlx::query(
            r#"INSERT INTO standings (team_name, matches_played, wins, losses, points, goal_difference)
               VALUES ($1, $2, $3, $4, $5, $6)"#
        )
        .bind(team)
        .bind(played)
        .bind(won)
        .bind(lost)
        .bind(points)
        .bind(goal_difference)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!(rows = SEED_STANDINGS.len(), "Seeded standings");
    Ok(())
}

async fn seed_player_stats(pool: &AnyPool) -> Result<(), sqlx::Error> {
    if count(pool, "SELECT COUNT(*) FROM player_stats").await? > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for (player, team, matches, runs, wickets, catches) in SEED_PLAYERS {
        sqlx::query(
            r#"INSERT INTO player_stats (player_name, team, matches, runs, wickets, catches)
               VALUES ($1, $2, $3, $4, $5, $6)"#
        )
        .bind(player)
        .bind(team)
        .bind(matches)
        .bind(runs)
        .bind(wickets)
        .bind(catches)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!(rows = SEED_PLAYERS.len(), "Seeded player_stats");
    Ok(())
}
