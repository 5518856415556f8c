//! Repository for the `projects` table.

use sqlx::types::Json;
use sqlx::PgPool;
use shootbook_core::lifecycle::LifecycleFlags;
use shootbook_core::types::DbId;

use crate::models::project::{
    Project, ProjectFilter, ProjectInput, ProjectSort, ProjectWithOwner,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, version, name, client, job_number, head, shoot_type, \
     shoot_base, locations, location_count, finalised_concept, concept, finalised_script, \
     script_files, budget, resources, actors_count, extras_count, notes, due_date, \
     shoot_start, shoot_end, approved, complete, created_at, updated_at";

/// Same columns qualified for the owner join, plus the owner summary.
const JOINED_COLUMNS: &str = "p.id, p.user_id, p.version, p.name, p.client, p.job_number, \
     p.head, p.shoot_type, p.shoot_base, p.locations, p.location_count, p.finalised_concept, \
     p.concept, p.finalised_script, p.script_files, p.budget, p.resources, p.actors_count, \
     p.extras_count, p.notes, p.due_date, p.shoot_start, p.shoot_end, p.approved, p.complete, \
     p.created_at, p.updated_at, \
     u.id AS owner_id, u.name AS owner_name, u.email AS owner_email, u.image AS owner_image";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `owner_id`, returning the created row.
    ///
    /// `approved` and `complete` are left to their column defaults (false).
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &ProjectInput,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (user_id, name, client, job_number, head, shoot_type, \
                 shoot_base, locations, location_count, finalised_concept, concept, \
                 finalised_script, script_files, budget, resources, actors_count, \
                 extras_count, notes, due_date, shoot_start, shoot_end)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                 $16, $17, $18, $19, $20, $21)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.client)
            .bind(&input.job_number)
            .bind(&input.head)
            .bind(input.shoot_type.as_str())
            .bind(input.shoot_base.as_str())
            .bind(&input.locations)
            .bind(input.location_count)
            .bind(input.finalised_concept)
            .bind(&input.concept)
            .bind(input.finalised_script)
            .bind(Json(&input.script_files))
            .bind(input.budget)
            .bind(&input.resources)
            .bind(input.actors_count)
            .bind(input.extras_count)
            .bind(&input.notes)
            .bind(input.due_date)
            .bind(input.shoot_start)
            .bind(input.shoot_end)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by ID together with its owner.
    pub async fn find_with_owner(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM projects p \
             JOIN users u ON u.id = p.user_id \
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, ProjectWithOwner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching `filter`, ordered by `sort`.
    ///
    /// `filter.approved = None` matches both states; `filter.complete = None`
    /// matches only incomplete projects.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
        sort: &ProjectSort,
    ) -> Result<Vec<ProjectWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM projects p \
             JOIN users u ON u.id = p.user_id \
             WHERE ($1::BOOLEAN IS NULL OR p.approved = $1) AND p.complete = $2 \
             ORDER BY {}",
            sort.order_clause()
        );
        sqlx::query_as::<_, ProjectWithOwner>(&query)
            .bind(filter.approved)
            .bind(filter.complete_or_default())
            .fetch_all(pool)
            .await
    }

    /// Replace the descriptive fields and persist `flags`.
    ///
    /// When `expected_version` is given the write only happens if the stored
    /// version still matches. Returns `None` if no row was updated (missing
    /// row or stale version; callers tell them apart with
    /// [`find_by_id`](Self::find_by_id)).
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ProjectInput,
        flags: LifecycleFlags,
        expected_version: Option<i32>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = $2,
                client = $3,
                job_number = $4,
                head = $5,
                shoot_type = $6,
                shoot_base = $7,
                locations = $8,
                location_count = $9,
                finalised_concept = $10,
                concept = $11,
                finalised_script = $12,
                script_files = $13,
                budget = $14,
                resources = $15,
                actors_count = $16,
                extras_count = $17,
                notes = $18,
                due_date = $19,
                shoot_start = $20,
                shoot_end = $21,
                approved = $22,
                complete = $23,
                version = version + 1
             WHERE id = $1 AND ($24::INTEGER IS NULL OR version = $24)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.client)
            .bind(&input.job_number)
            .bind(&input.head)
            .bind(input.shoot_type.as_str())
            .bind(input.shoot_base.as_str())
            .bind(&input.locations)
            .bind(input.location_count)
            .bind(input.finalised_concept)
            .bind(&input.concept)
            .bind(input.finalised_script)
            .bind(Json(&input.script_files))
            .bind(input.budget)
            .bind(&input.resources)
            .bind(input.actors_count)
            .bind(input.extras_count)
            .bind(&input.notes)
            .bind(input.due_date)
            .bind(input.shoot_start)
            .bind(input.shoot_end)
            .bind(flags.approved)
            .bind(flags.complete)
            .bind(expected_version)
            .fetch_optional(pool)
            .await
    }

    /// Persist only the lifecycle flags. Same version semantics as
    /// [`update`](Self::update).
    pub async fn set_flags(
        pool: &PgPool,
        id: DbId,
        flags: LifecycleFlags,
        expected_version: Option<i32>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                approved = $2,
                complete = $3,
                version = version + 1
             WHERE id = $1 AND ($4::INTEGER IS NULL OR version = $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(flags.approved)
            .bind(flags.complete)
            .bind(expected_version)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
