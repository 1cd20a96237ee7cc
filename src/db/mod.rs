use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::config::{DatabaseConfig, Driver};
use crate::models::*;

pub mod schema;

/// Pool handle plus the driver it was opened with.
#[derive(Debug, Clone)]
pub struct Database {
    pub pool: AnyPool,
    pub driver: Driver,
}

fn pool_options(config: &DatabaseConfig) -> AnyPoolOptions {
    AnyPoolOptions::new()
        .max_connections(config.pool_max)
        .acquire_timeout(config.connect_timeout)
}

/// Open the pool and establish one connection up front.
pub async fn connect(config: &DatabaseConfig) -> Result<Database, sqlx::Error> {
    sqlx::any::install_default_drivers();
    let pool = pool_options(config).connect(&config.url).await?;
    Ok(Database {
        pool,
        driver: config.driver,
    })
}

/// Build a pool without connecting, so later health probes can pick up a
/// database that was down at startup.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<Database, sqlx::Error> {
    sqlx::any::install_default_drivers();
    let pool = pool_options(config).connect_lazy(&config.url)?;
    Ok(Database {
        pool,
        driver: config.driver,
    })
}

/// Liveness probe. Returns whether the database currently refuses writes.
pub async fn probe(db: &Database) -> Result<bool, sqlx::Error> {
    sqlx::query("SELECT 1").execute(&db.pool).await?;
    is_read_only(db).await
}

pub async fn is_read_only(db: &Database) -> Result<bool, sqlx::Error> {
    match db.driver {
        Driver::Postgres => {
            let flag: String =
                sqlx::query_scalar("SELECT current_setting('transaction_read_only')")
                    .fetch_one(&db.pool)
                    .await?;
            Ok(flag.eq_ignore_ascii_case("on"))
        }
        Driver::Sqlite => {
            let flag: i64 = sqlx::query_scalar("PRAGMA query_only")
                .fetch_one(&db.pool)
                .await?;
            Ok(flag != 0)
        }
    }
}

// Match queries
pub async fn get_all_matches(pool: &AnyPool) -> Result<Vec<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"SELECT id, match_date, team1, team2, venue, result, stage
           FROM group_matches
           ORDER BY match_date ASC, id ASC"#
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_match(pool: &AnyPool, new_match: &NewMatch) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO group_matches (match_date, team1, team2, venue, stage)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id"#
    )
    .bind(&new_match.match_date)
    .bind(&new_match.team1)
    .bind(&new_match.team2)
    .bind(new_match.venue.as_deref())
    .bind(new_match.stage.as_deref())
    .fetch_one(pool)
    .await
}

// Standings queries
pub async fn get_standings(pool: &AnyPool) -> Result<Vec<Standing>, sqlx::Error> {
    sqlx::query_as::<_, Standing>(
        r#"SELECT id, team_name, matches_played, wins, losses, points, goal_difference
           FROM standings
           ORDER BY points DESC, goal_difference DESC"#
    )
    .fetch_all(pool)
    .await
}

// Player queries
pub async fn get_player_stats(pool: &AnyPool) -> Result<Vec<PlayerStat>, sqlx::Error> {
    sqlx::query_as::<_, PlayerStat>(
        r#"SELECT id, player_name, team, matches, runs, wickets, catches
           FROM player_stats
           ORDER BY runs DESC, wickets DESC"#
    )
    .fetch_all(pool)
    .await
}
