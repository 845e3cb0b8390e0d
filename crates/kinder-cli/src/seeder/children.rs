//! Child seeding: children, their guardianships and group staffing.

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use kinder_models::ids::{ChildId, EmployeeId, GroupId, ParentId};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::SeedResult;
use super::models::ChildSeed;

/// Generates children for groups, assigning guardians round-robin.
///
/// Returns an empty list when there are no parents to link to.
pub fn generate_children(
    group_ids: &[GroupId],
    children_per_group: usize,
    parent_ids: &[ParentId],
) -> Vec<ChildSeed> {
    if parent_ids.is_empty() {
        return Vec::new();
    }

    let today = chrono::Utc::now().date_naive();

    group_ids
        .par_iter()
        .enumerate()
        .flat_map(|(group_idx, &group_id)| {
            (0..children_per_group)
                .map(|child_idx| {
                    let n = group_idx * children_per_group + child_idx;
                    let age_days = (365 * 2..365 * 7).fake::<u64>();
                    let birthday = today
                        .checked_sub_days(chrono::Days::new(age_days))
                        .unwrap_or(today);
                    let transfer_date = birthday
                        .checked_add_days(chrono::Days::new(365 * 2))
                        .filter(|d| *d <= today)
                        .unwrap_or(today);

                    ChildSeed {
                        fname: FirstName().fake(),
                        lname: LastName().fake(),
                        patronymic: None,
                        gender: n % 2 == 0,
                        birthday,
                        group_id,
                        transfer_date,
                        parent_id: parent_ids[n % parent_ids.len()],
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Seeds children and links each one to a guardian.
///
/// Group counters are bumped in the same transaction.
pub async fn seed_children(
    db: &PgPool,
    group_ids: &[GroupId],
    children_per_group: usize,
    parent_ids: &[ParentId],
) -> SeedResult<Vec<ChildId>> {
    let start_time = Instant::now();

    let children = generate_children(group_ids, children_per_group, parent_ids);
    if children.is_empty() {
        println!("🧒 No children to seed (need at least one group and one parent)");
        return Ok(Vec::new());
    }
    println!(
        "🧒 Seeding {} children ({} per group)...",
        children.len(),
        children_per_group
    );

    // 7 params per child
    const BATCH_SIZE: usize = 1000;

    let mut tx = db.begin().await?;
    let mut all_ids = Vec::with_capacity(children.len());
    for chunk in children.chunks(BATCH_SIZE) {
        let ids = insert_children_chunk(&mut tx, chunk).await?;
        let links: Vec<(ParentId, ChildId)> = chunk
            .iter()
            .zip(&ids)
            .map(|(seed, &child_id)| (seed.parent_id, child_id))
            .collect();
        insert_guardianships(&mut tx, &links).await?;
        all_ids.extend(ids);
    }

    sqlx::query(
        "UPDATE child_groups g
         SET count_children = g.count_children + c.n, updated_at = NOW()
         FROM (
             SELECT group_id, COUNT(*)::int AS n
             FROM children WHERE id = ANY($1)
             GROUP BY group_id
         ) c
         WHERE g.id = c.group_id",
    )
    .bind(&all_ids)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} children in {:?}",
        all_ids.len(),
        start_time.elapsed()
    );
    Ok(all_ids)
}

async fn insert_children_chunk(
    tx: &mut Transaction<'_, Postgres>,
    children: &[ChildSeed],
) -> SeedResult<Vec<ChildId>> {
    let mut query = String::from(
        "INSERT INTO children (fname, lname, patronymic, gender, birthday, group_id, transfer_date) VALUES ",
    );
    for i in 0..children.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 7;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 7
        ));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, ChildId>(&query);
    for child in children {
        q = q
            .bind(&child.fname)
            .bind(&child.lname)
            .bind(&child.patronymic)
            .bind(child.gender)
            .bind(child.birthday)
            .bind(child.group_id)
            .bind(child.transfer_date);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_guardianships(
    tx: &mut Transaction<'_, Postgres>,
    links: &[(ParentId, ChildId)],
) -> SeedResult<()> {
    let (parent_ids, child_ids): (Vec<ParentId>, Vec<ChildId>) = links.iter().copied().unzip();

    sqlx::query(
        "INSERT INTO parent_children (parent_id, child_id)
         SELECT * FROM UNNEST($1::uuid[], $2::uuid[])
         ON CONFLICT (parent_id, child_id) DO NOTHING",
    )
    .bind(&parent_ids)
    .bind(&child_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Puts one employee on each group, in the employee's own qualification.
pub async fn seed_group_assignments(
    db: &PgPool,
    group_ids: &[GroupId],
    employee_ids: &[EmployeeId],
) -> SeedResult<u64> {
    if group_ids.is_empty() || employee_ids.is_empty() {
        return Ok(0);
    }

    let start_time = Instant::now();
    println!("🔗 Assigning employees to {} groups...", group_ids.len());

    let staff: Vec<EmployeeId> = (0..group_ids.len())
        .map(|i| employee_ids[i % employee_ids.len()])
        .collect();

    let assigned = sqlx::query(
        "INSERT INTO group_assignments (group_id, employee_id, role)
         SELECT a.group_id, a.employee_id, e.qualification
         FROM UNNEST($1::uuid[], $2::uuid[]) AS a(group_id, employee_id)
         JOIN employees e ON e.id = a.employee_id
         ON CONFLICT (group_id, employee_id) DO NOTHING",
    )
    .bind(group_ids)
    .bind(&staff)
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Created {} assignments in {:?}",
        assigned,
        start_time.elapsed()
    );
    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_need_a_parent() {
        let groups = vec![GroupId::new()];
        assert!(generate_children(&groups, 5, &[]).is_empty());
    }

    #[test]
    fn test_children_spread_over_parents() {
        let groups = vec![GroupId::new(), GroupId::new()];
        let parents = vec![ParentId::new(), ParentId::new(), ParentId::new()];
        let children = generate_children(&groups, 4, &parents);

        assert_eq!(children.len(), 8);
        for parent in &parents {
            assert!(children.iter().any(|c| c.parent_id == *parent));
        }
        assert_eq!(children.iter().filter(|c| c.group_id == groups[1]).count(), 4);
    }

    #[test]
    fn test_child_dates_are_ordered() {
        let today = chrono::Utc::now().date_naive();
        let children = generate_children(&[GroupId::new()], 20, &[ParentId::new()]);
        for child in children {
            assert!(child.birthday < today);
            assert!(child.transfer_date >= child.birthday);
            assert!(child.transfer_date <= today);
        }
    }
}
