use std::collections::HashMap;

use anyhow::Context;
use kinder_core::AppError;
use kinder_db::{is_foreign_key_violation, is_unique_violation, violated_constraint};
use kinder_models::children::{
    AddChildDto, Child, ChildDetail, ChildFilterParams, Guardianship, MedicalNote, UpdateChildDto,
};
use kinder_models::directory::Parent;
use kinder_models::ids::{ChildId, GroupId, ParentId};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use crate::modules::groups::service::GroupService;
use crate::modules::parents::service::ParentService;

const CHILD_COLUMNS: &str = "id, fname, lname, patronymic, gender, birthday, group_id, \
     transfer_date, created_at, updated_at";

pub struct ChildService;

impl ChildService {
    /// Inserts the child with its first guardian and medical notes.
    ///
    /// Everything runs in one transaction: a missing group or parent, or a
    /// duplicate note code, leaves no trace of the child.
    #[instrument(skip(db, dto), fields(parent_id = %dto.parent_id))]
    pub async fn add_child(db: &PgPool, dto: AddChildDto) -> Result<ChildDetail, AppError> {
        let mut tx = db.begin().await?;

        let data = dto.child;
        if GroupService::find_group(&mut tx, data.group_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(anyhow::anyhow!("Group not found")));
        }

        let child = sqlx::query_as::<_, Child>(&format!(
            "INSERT INTO children (fname, lname, patronymic, gender, birthday, group_id, transfer_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            CHILD_COLUMNS
        ))
        .bind(&data.fname)
        .bind(&data.lname)
        .bind(&data.patronymic)
        .bind(data.gender)
        .bind(data.birthday)
        .bind(data.group_id)
        .bind(data.transfer_date)
        .fetch_one(&mut *tx)
        .await?;

        if ParentService::find_by_id(&mut tx, dto.parent_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(anyhow::anyhow!("Parent not found")));
        }

        insert_guardianship(&mut tx, dto.parent_id, child.id).await?;

        for (index, note) in dto.medical_notes.iter().enumerate() {
            sqlx::query(
                "INSERT INTO medical_notes (code, description, child_id) VALUES ($1, $2, $3)",
            )
            .bind(&note.code)
            .bind(&note.description)
            .bind(child.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    return AppError::field(
                        &format!("medical_notes[{}].code", index),
                        format!("Medical note code '{}' already exists", note.code),
                    );
                }
                AppError::from(e)
            })?;
        }

        adjust_group_count(&mut tx, child.group_id, 1).await?;

        tx.commit().await?;

        Self::get_child(db, child.id).await
    }

    #[instrument(skip(db))]
    pub async fn get_child(db: &PgPool, id: ChildId) -> Result<ChildDetail, AppError> {
        let child = sqlx::query_as::<_, Child>(&format!(
            "SELECT {} FROM children WHERE id = $1",
            CHILD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch child")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Child not found")))?;

        let mut details = Self::with_details(db, vec![child]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::internal_error("Child detail missing".to_string()))
    }

    #[instrument(skip(db))]
    pub async fn list_children(
        db: &PgPool,
        filters: ChildFilterParams,
    ) -> Result<Vec<ChildDetail>, AppError> {
        let children = sqlx::query_as::<_, Child>(&format!(
            "SELECT {} FROM children
             WHERE ($1::uuid IS NULL OR group_id = $1)
             ORDER BY lname, fname",
            CHILD_COLUMNS
        ))
        .bind(filters.group_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch children")
        .map_err(AppError::database)?;

        Self::with_details(db, children).await
    }

    #[instrument(skip(db))]
    pub async fn children_of_parent(
        db: &PgPool,
        parent_id: ParentId,
    ) -> Result<Vec<ChildDetail>, AppError> {
        let children = sqlx::query_as::<_, Child>(&format!(
            "SELECT {} FROM children
             WHERE id IN (SELECT child_id FROM parent_children WHERE parent_id = $1)
             ORDER BY birthday",
            CHILD_COLUMNS
        ))
        .bind(parent_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch children of parent")
        .map_err(AppError::database)?;

        Self::with_details(db, children).await
    }

    /// Applies the supplied fields. A group change moves the child between
    /// group counters in the same transaction.
    #[instrument(skip(db, dto))]
    pub async fn update_child(
        db: &PgPool,
        id: ChildId,
        dto: UpdateChildDto,
    ) -> Result<ChildDetail, AppError> {
        let mut tx = db.begin().await?;

        let current_group = sqlx::query_scalar::<_, GroupId>(
            "SELECT group_id FROM children WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Child not found")))?;

        if let Some(new_group) = dto.group_id
            && new_group != current_group
        {
            if GroupService::find_group(&mut tx, new_group).await?.is_none() {
                return Err(AppError::not_found(anyhow::anyhow!("Group not found")));
            }
            move_group_count(&mut tx, current_group, new_group).await?;
        }

        sqlx::query(
            "UPDATE children SET
                fname = COALESCE($2, fname),
                lname = COALESCE($3, lname),
                patronymic = CASE WHEN $4 THEN $5 ELSE patronymic END,
                gender = COALESCE($6, gender),
                birthday = COALESCE($7, birthday),
                group_id = COALESCE($8, group_id),
                transfer_date = COALESCE($9, transfer_date),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&dto.fname)
        .bind(&dto.lname)
        .bind(dto.patronymic.is_some())
        .bind(dto.patronymic.clone().flatten())
        .bind(dto.gender)
        .bind(dto.birthday)
        .bind(dto.group_id)
        .bind(dto.transfer_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Self::get_child(db, id).await
    }

    /// Links an additional guardian to an existing child.
    #[instrument(skip(db))]
    pub async fn link_parent(
        db: &PgPool,
        child_id: ChildId,
        parent_id: ParentId,
    ) -> Result<Guardianship, AppError> {
        let mut conn = db.acquire().await?;

        let child_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM children WHERE id = $1)")
                .bind(child_id)
                .fetch_one(&mut *conn)
                .await?;
        if !child_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Child not found")));
        }

        if ParentService::find_by_id(&mut conn, parent_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(anyhow::anyhow!("Parent not found")));
        }

        insert_guardianship(&mut conn, parent_id, child_id).await
    }

    /// True when the child is linked to the parent.
    pub async fn is_guardian(
        conn: &mut PgConnection,
        parent_id: ParentId,
        child_id: ChildId,
    ) -> Result<bool, AppError> {
        let linked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM parent_children WHERE parent_id = $1 AND child_id = $2)",
        )
        .bind(parent_id)
        .bind(child_id)
        .fetch_one(conn)
        .await
        .context("Failed to check guardianship")
        .map_err(AppError::database)?;

        Ok(linked)
    }

    /// Resolves group names, medical notes and guardians for a batch of children.
    async fn with_details(db: &PgPool, children: Vec<Child>) -> Result<Vec<ChildDetail>, AppError> {
        if children.is_empty() {
            return Ok(Vec::new());
        }

        let child_ids: Vec<ChildId> = children.iter().map(|c| c.id).collect();
        let group_ids: Vec<GroupId> = children.iter().map(|c| c.group_id).collect();

        let group_names: HashMap<GroupId, String> = sqlx::query_as::<_, (GroupId, String)>(
            "SELECT id, name FROM child_groups WHERE id = ANY($1)",
        )
        .bind(&group_ids)
        .fetch_all(db)
        .await
        .context("Failed to fetch group names")
        .map_err(AppError::database)?
        .into_iter()
        .collect();

        let mut notes: HashMap<ChildId, Vec<MedicalNote>> = HashMap::new();
        for note in sqlx::query_as::<_, MedicalNote>(
            "SELECT id, code, description, child_id, created_at
             FROM medical_notes WHERE child_id = ANY($1) ORDER BY code",
        )
        .bind(&child_ids)
        .fetch_all(db)
        .await
        .context("Failed to fetch medical notes")
        .map_err(AppError::database)?
        {
            notes.entry(note.child_id).or_default().push(note);
        }

        #[derive(sqlx::FromRow)]
        struct GuardianRow {
            child_id: ChildId,
            #[sqlx(flatten)]
            parent: Parent,
        }

        let mut parents: HashMap<ChildId, Vec<Parent>> = HashMap::new();
        for row in sqlx::query_as::<_, GuardianRow>(
            "SELECT pc.child_id, p.id, p.user_id, p.fname, p.lname, p.patronymic,
                    p.phone_number, p.created_at, p.updated_at
             FROM parent_children pc
             JOIN parents p ON p.id = pc.parent_id
             WHERE pc.child_id = ANY($1)
             ORDER BY pc.created_at",
        )
        .bind(&child_ids)
        .fetch_all(db)
        .await
        .context("Failed to fetch guardians")
        .map_err(AppError::database)?
        {
            parents.entry(row.child_id).or_default().push(row.parent);
        }

        Ok(children
            .into_iter()
            .map(|child| ChildDetail {
                group_name: group_names.get(&child.group_id).cloned().unwrap_or_default(),
                medical_notes: notes.remove(&child.id).unwrap_or_default(),
                parents: parents.remove(&child.id).unwrap_or_default(),
                child,
            })
            .collect())
    }
}

async fn insert_guardianship(
    conn: &mut PgConnection,
    parent_id: ParentId,
    child_id: ChildId,
) -> Result<Guardianship, AppError> {
    sqlx::query_as::<_, Guardianship>(
        "INSERT INTO parent_children (parent_id, child_id)
         VALUES ($1, $2)
         RETURNING id, parent_id, child_id, created_at",
    )
    .bind(parent_id)
    .bind(child_id)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e)
            && violated_constraint(&e) == Some("parent_children_parent_child_key")
        {
            return AppError::field("parent_id", "This parent is already linked to the child");
        }
        if is_foreign_key_violation(&e) {
            return AppError::not_found(anyhow::anyhow!("Parent or child not found"));
        }
        AppError::from(e)
    })
}

/// Moves one child from `from` to `to`. Both rows are locked in id order so
/// crossing moves cannot deadlock.
async fn move_group_count(
    conn: &mut PgConnection,
    from: GroupId,
    to: GroupId,
) -> Result<(), AppError> {
    sqlx::query("SELECT id FROM child_groups WHERE id = ANY($1) ORDER BY id FOR UPDATE")
        .bind(vec![from, to])
        .execute(&mut *conn)
        .await
        .context("Failed to lock group counters")
        .map_err(AppError::database)?;

    sqlx::query(
        "UPDATE child_groups
         SET count_children = GREATEST(count_children + CASE WHEN id = $2 THEN 1 ELSE -1 END, 0),
             updated_at = NOW()
         WHERE id IN ($1, $2)",
    )
    .bind(from)
    .bind(to)
    .execute(&mut *conn)
    .await
    .context("Failed to move group counter")
    .map_err(AppError::database)?;

    Ok(())
}

async fn adjust_group_count(
    conn: &mut PgConnection,
    group_id: GroupId,
    delta: i32,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE child_groups
         SET count_children = GREATEST(count_children + $2, 0), updated_at = NOW()
         WHERE id = $1",
    )
    .bind(group_id)
    .bind(delta)
    .execute(conn)
    .await
    .context("Failed to update group counter")
    .map_err(AppError::database)?;

    Ok(())
}
