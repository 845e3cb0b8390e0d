//! Identity seeding for employees and parents.
//!
//! Every profile row is inserted right after its identity, in the same
//! transaction, so a failed batch leaves no orphan identities behind.

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use kinder_models::directory::PHONE_MIN;
use kinder_models::ids::{EmployeeId, ParentId, UserId};
use kinder_models::{Qualification, Role};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::SeedResult;
use super::models::{EmployeeSeed, IdentitySeed, ParentSeed};

/// First phone number handed out to seeded employees when none exist yet.
const EMPLOYEE_PHONE_BASE: i64 = 89_100_000_000;
const PARENT_PHONE_BASE: i64 = 89_500_000_000;

fn username(first: &str, last: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}.{}.{}",
        first.to_lowercase(),
        last.to_lowercase(),
        &suffix[..6]
    )
    .chars()
    .take(50)
    .collect()
}

fn birthday(min_years: i32, spread_days: u64) -> chrono::NaiveDate {
    let today = chrono::Utc::now().date_naive();
    let offset = (0..spread_days).fake::<u64>();
    today
        .checked_sub_months(chrono::Months::new(min_years as u32 * 12))
        .and_then(|d| d.checked_sub_days(chrono::Days::new(offset)))
        .unwrap_or(today)
}

pub fn generate_employees(
    qualifications: &[Qualification],
    first_phone: i64,
    password_hash: &str,
) -> Vec<EmployeeSeed> {
    qualifications
        .par_iter()
        .enumerate()
        .map(|(idx, &qualification)| {
            let fname: String = FirstName().fake();
            let lname: String = LastName().fake();
            EmployeeSeed {
                identity: IdentitySeed {
                    username: username(&fname, &lname),
                    password_hash: password_hash.to_string(),
                    role: Role::Employee,
                },
                fname,
                lname,
                patronymic: None,
                gender: idx % 2 == 0,
                birthday: birthday(22, 365 * 30),
                phone_number: first_phone + idx as i64,
                qualification,
                work_experience: (0..25i32).fake(),
            }
        })
        .collect()
}

pub fn generate_parents(count: usize, first_phone: i64, password_hash: &str) -> Vec<ParentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let fname: String = FirstName().fake();
            let lname: String = LastName().fake();
            ParentSeed {
                identity: IdentitySeed {
                    username: username(&fname, &lname),
                    password_hash: password_hash.to_string(),
                    role: Role::Parent,
                },
                fname,
                lname,
                patronymic: None,
                phone_number: first_phone + idx as i64,
            }
        })
        .collect()
}

/// Next free phone number after the highest one in `table`.
async fn next_phone(db: &PgPool, table: &str, base: i64) -> SeedResult<i64> {
    let max: Option<i64> = sqlx::query_scalar(&format!("SELECT MAX(phone_number) FROM {table}"))
        .fetch_one(db)
        .await?;
    Ok(max.map_or(base, |m| m.max(PHONE_MIN) + 1))
}

/// Seeds up to `count` employees, one per qualification not yet held.
pub async fn seed_employees(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> SeedResult<Vec<EmployeeId>> {
    let start_time = Instant::now();

    let taken: Vec<Qualification> = sqlx::query_scalar("SELECT qualification FROM employees")
        .fetch_all(db)
        .await?;
    let free: Vec<Qualification> = Qualification::ALL
        .into_iter()
        .filter(|q| !taken.contains(q))
        .take(count)
        .collect();

    println!(
        "👩‍🏫 Seeding {} employees ({} qualifications already taken)...",
        free.len(),
        taken.len()
    );
    if free.is_empty() {
        return Ok(Vec::new());
    }

    let first_phone = next_phone(db, "employees", EMPLOYEE_PHONE_BASE).await?;
    let employees = generate_employees(&free, first_phone, password_hash);
    let identities: Vec<&IdentitySeed> = employees.iter().map(|e| &e.identity).collect();

    let mut tx = db.begin().await?;
    let user_ids = insert_identities(&mut tx, &identities).await?;

    let mut query = String::from(
        "INSERT INTO employees (user_id, fname, lname, patronymic, gender, birthday, \
         phone_number, qualification, work_experience) VALUES ",
    );
    for i in 0..employees.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 9;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 7,
            p + 8,
            p + 9
        ));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, EmployeeId>(&query);
    for (employee, user_id) in employees.iter().zip(&user_ids) {
        q = q
            .bind(user_id)
            .bind(&employee.fname)
            .bind(&employee.lname)
            .bind(&employee.patronymic)
            .bind(employee.gender)
            .bind(employee.birthday)
            .bind(employee.phone_number)
            .bind(employee.qualification)
            .bind(employee.work_experience);
    }
    let ids = q.fetch_all(&mut *tx).await?;

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} employees in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

pub async fn seed_parents(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> SeedResult<Vec<ParentId>> {
    let start_time = Instant::now();
    println!("👪 Seeding {} parents...", count);

    let first_phone = next_phone(db, "parents", PARENT_PHONE_BASE).await?;
    let parents = generate_parents(count, first_phone, password_hash);

    // 5 params per parent
    const BATCH_SIZE: usize = 1000;

    let mut tx = db.begin().await?;
    let mut all_ids = Vec::with_capacity(parents.len());
    for chunk in parents.chunks(BATCH_SIZE) {
        let identities: Vec<&IdentitySeed> = chunk.iter().map(|p| &p.identity).collect();
        let user_ids = insert_identities(&mut tx, &identities).await?;
        all_ids.extend(insert_parents_chunk(&mut tx, chunk, &user_ids).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} parents in {:?}",
        all_ids.len(),
        start_time.elapsed()
    );
    Ok(all_ids)
}

async fn insert_parents_chunk(
    tx: &mut Transaction<'_, Postgres>,
    parents: &[ParentSeed],
    user_ids: &[UserId],
) -> SeedResult<Vec<ParentId>> {
    if parents.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO parents (user_id, fname, lname, patronymic, phone_number) VALUES ");
    for i in 0..parents.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5
        ));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, ParentId>(&query);
    for (parent, user_id) in parents.iter().zip(user_ids) {
        q = q
            .bind(user_id)
            .bind(&parent.fname)
            .bind(&parent.lname)
            .bind(&parent.patronymic)
            .bind(parent.phone_number);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

/// Inserts identities, returning ids in input order.
async fn insert_identities(
    tx: &mut Transaction<'_, Postgres>,
    identities: &[&IdentitySeed],
) -> SeedResult<Vec<UserId>> {
    if identities.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO users (username, password, role) VALUES ");
    for i in 0..identities.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 3;
        query.push_str(&format!("(${}, ${}, ${})", p + 1, p + 2, p + 3));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, UserId>(&query);
    for identity in identities {
        q = q
            .bind(&identity.username)
            .bind(&identity.password_hash)
            .bind(identity.role);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinder_models::directory::PHONE_MAX;

    #[test]
    fn test_generate_employees_one_per_qualification() {
        let employees = generate_employees(&Qualification::ALL, EMPLOYEE_PHONE_BASE, "hash");
        assert_eq!(employees.len(), 10);
        for (employee, qualification) in employees.iter().zip(Qualification::ALL) {
            assert_eq!(employee.qualification, qualification);
            assert_eq!(employee.identity.role, Role::Employee);
            assert!((0..25).contains(&employee.work_experience));
        }
    }

    #[test]
    fn test_generated_phones_are_distinct_and_in_range() {
        let parents = generate_parents(50, PARENT_PHONE_BASE, "hash");
        let mut phones: Vec<i64> = parents.iter().map(|p| p.phone_number).collect();
        phones.dedup();
        assert_eq!(phones.len(), 50);
        assert!(
            phones
                .iter()
                .all(|p| (PHONE_MIN..=PHONE_MAX).contains(p))
        );
    }

    #[test]
    fn test_usernames_fit_column() {
        let name = username(&"a".repeat(40), &"b".repeat(40));
        assert!(name.chars().count() <= 50);
        assert!(username("Anna", "Petrova").starts_with("anna.petrova."));
    }
}
