//! Educational program and group seeding.

use fake::Fake;
use fake::faker::lorem::en::Sentence;
use kinder_models::AgeGroup;
use kinder_models::ids::{GroupId, ProgramId};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::SeedResult;
use super::models::{GroupSeed, ProgramSeed};

const GROUP_NAMES: [&str; 8] = [
    "Sunflowers",
    "Bees",
    "Ladybirds",
    "Squirrels",
    "Daisies",
    "Hedgehogs",
    "Swallows",
    "Bluebells",
];

pub fn generate_programs(count: usize) -> Vec<ProgramSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| ProgramSeed {
            description: Sentence(3..8).fake(),
            // 0..=6 years, cycling so every age band is covered
            age_category_children: (idx % 7) as i32,
        })
        .collect()
}

/// Generates groups for programs, spreading age bands evenly.
pub fn generate_groups(program_ids: &[ProgramId], groups_per_program: usize) -> Vec<GroupSeed> {
    program_ids
        .par_iter()
        .enumerate()
        .flat_map(|(program_idx, &program_id)| {
            (0..groups_per_program)
                .map(|group_idx| {
                    let n = program_idx * groups_per_program + group_idx;
                    GroupSeed {
                        name: format!("{} {}", GROUP_NAMES[n % GROUP_NAMES.len()], n + 1),
                        age_group: AgeGroup::ALL[n % AgeGroup::ALL.len()],
                        educational_program_id: program_id,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_programs(db: &PgPool, count: usize) -> SeedResult<Vec<ProgramId>> {
    let start_time = Instant::now();
    println!("📚 Seeding {} educational programs...", count);

    let programs = generate_programs(count);
    let mut tx = db.begin().await?;

    let mut query = String::from(
        "INSERT INTO educational_programs (description, age_category_children) VALUES ",
    );
    for i in 0..programs.len() {
        if i > 0 {
            query.push_str(", ");
        }
        query.push_str(&format!("(${}, ${})", i * 2 + 1, i * 2 + 2));
    }
    query.push_str(" RETURNING id");

    let ids = if programs.is_empty() {
        Vec::new()
    } else {
        let mut q = sqlx::query_scalar::<_, ProgramId>(&query);
        for program in &programs {
            q = q
                .bind(&program.description)
                .bind(program.age_category_children);
        }
        q.fetch_all(&mut *tx).await?
    };

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} programs in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

pub async fn seed_groups(
    db: &PgPool,
    program_ids: &[ProgramId],
    groups_per_program: usize,
) -> SeedResult<Vec<GroupId>> {
    let start_time = Instant::now();
    println!(
        "🏠 Seeding {} groups ({} per program)...",
        program_ids.len() * groups_per_program,
        groups_per_program
    );

    let groups = generate_groups(program_ids, groups_per_program);

    let mut tx = db.begin().await?;
    const BATCH_SIZE: usize = 1000;
    let mut all_ids = Vec::with_capacity(groups.len());
    for chunk in groups.chunks(BATCH_SIZE) {
        all_ids.extend(insert_groups_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} groups in {:?}",
        all_ids.len(),
        start_time.elapsed()
    );
    Ok(all_ids)
}

async fn insert_groups_chunk(
    tx: &mut Transaction<'_, Postgres>,
    groups: &[GroupSeed],
) -> SeedResult<Vec<GroupId>> {
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO child_groups (name, age_group, educational_program_id) VALUES ");
    for i in 0..groups.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 3;
        query.push_str(&format!("(${}, ${}, ${})", p + 1, p + 2, p + 3));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, GroupId>(&query);
    for group in groups {
        q = q
            .bind(&group.name)
            .bind(group.age_group)
            .bind(group.educational_program_id);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_groups_per_program() {
        let programs = vec![ProgramId::new(), ProgramId::new()];
        let groups = generate_groups(&programs, 3);
        assert_eq!(groups.len(), 6);
        assert_eq!(
            groups
                .iter()
                .filter(|g| g.educational_program_id == programs[0])
                .count(),
            3
        );
        assert!(groups.iter().all(|g| g.name.len() <= 50));
    }

    #[test]
    fn test_generate_programs_non_negative_age() {
        let programs = generate_programs(10);
        assert_eq!(programs.len(), 10);
        assert!(programs.iter().all(|p| p.age_category_children >= 0));
        assert!(programs.iter().all(|p| !p.description.is_empty()));
    }
}
