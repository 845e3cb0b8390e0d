//! Database seeding for development and manual testing.
//!
//! Generation runs in parallel with Rayon; inserts are batched multi-row
//! statements inside a transaction per entity kind.
//!
//! Every seeded identity shares one password, hashed once up front.

pub mod children;
pub mod models;
pub mod programs;
pub mod users;

use kinder_core::hash_password;
use kinder_models::Role;
use kinder_models::ids::UserId;
use sqlx::PgPool;
use std::time::Instant;

pub use models::SeedConfig;

pub type SeedResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Row counts produced by [`seed_all`].
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub programs: usize,
    pub groups: usize,
    pub employees: usize,
    pub parents: usize,
    pub children: usize,
}

fn hash(password: &str) -> SeedResult<String> {
    Ok(hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?)
}

/// Seeds programs, groups, staff, parents and children in dependency order.
pub async fn seed_all(db: &PgPool, config: SeedConfig, password: &str) -> SeedResult<SeedSummary> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...\n");

    let password_hash = hash(password)?;

    let program_ids = programs::seed_programs(db, config.programs).await?;
    let group_ids = programs::seed_groups(db, &program_ids, config.groups_per_program).await?;
    let employee_ids = users::seed_employees(db, config.employees, &password_hash).await?;
    children::seed_group_assignments(db, &group_ids, &employee_ids).await?;
    let parent_ids = users::seed_parents(db, config.parents, &password_hash).await?;
    let child_ids =
        children::seed_children(db, &group_ids, config.children_per_group, &parent_ids).await?;

    let summary = SeedSummary {
        programs: program_ids.len(),
        groups: group_ids.len(),
        employees: employee_ids.len(),
        parents: parent_ids.len(),
        children: child_ids.len(),
    };

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("   {:?}", summary);
    println!("   All seeded accounts use the password you supplied");

    Ok(summary)
}

/// Deletes all seeded data. Admin identities are kept.
pub async fn clear_all(db: &PgPool) -> SeedResult<()> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;

    // Events block employee deletion and children block group deletion,
    // so they go first.
    let events = sqlx::query("DELETE FROM events")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let children = sqlx::query("DELETE FROM children")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let programs = sqlx::query("DELETE FROM educational_programs")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let users = sqlx::query("DELETE FROM users WHERE role <> $1")
        .bind(Role::Admin)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} events, {} children, {} programs, {} users in {:?}",
        events,
        children,
        programs,
        users,
        start_time.elapsed()
    );
    Ok(())
}

/// Creates an Admin identity. Fails when the username is taken.
pub async fn create_admin(db: &PgPool, username: &str, password: &str) -> SeedResult<UserId> {
    let password_hash = hash(password)?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (username, password, role)
         VALUES ($1, $2, $3)
         ON CONFLICT (username) DO NOTHING
         RETURNING id",
    )
    .bind(username)
    .bind(&password_hash)
    .bind(Role::Admin)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "User with this username already exists".into())
}
