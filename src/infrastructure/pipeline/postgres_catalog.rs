//! PostgreSQL catalog over the console database's step, model and profile tables

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::{
    DomainError, FlavorId, InputModality, Model, ModelId, ModelRepository, Profile,
    ProfileRepository, Step, StepId, StepRepository,
};

/// Open a connection pool
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// Read-only PostgreSQL implementation of the step, model and profile repositories
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StepRepository for PostgresCatalog {
    async fn list_for_flavor(&self, flavor_id: FlavorId) -> Result<Vec<Step>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id::int8 AS id,
                   humor_flavor_id::int8 AS humor_flavor_id,
                   order_by::int4 AS order_by,
                   llm_input_type_id::int8 AS llm_input_type_id,
                   llm_model_id::int8 AS llm_model_id,
                   llm_temperature::float8 AS llm_temperature,
                   llm_system_prompt,
                   llm_user_prompt,
                   humor_flavor_step_type_id::int8 AS humor_flavor_step_type_id
            FROM humor_flavor_steps
            WHERE humor_flavor_id = $1
            ORDER BY order_by ASC
            "#,
        )
        .bind(flavor_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list steps: {}", e)))?;

        rows.iter().map(row_to_step).collect()
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| true)
            .map_err(|e| DomainError::storage(format!("Database unreachable: {}", e)))
    }
}

#[async_trait]
impl ModelRepository for PostgresCatalog {
    async fn list(&self) -> Result<Vec<Model>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id::int8 AS id,
                   name,
                   provider_model_id,
                   llm_provider_id::int8 AS llm_provider_id,
                   is_temperature_supported
            FROM llm_models
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list models: {}", e)))?;

        rows.iter().map(row_to_model).collect()
    }
}

#[async_trait]
impl ProfileRepository for PostgresCatalog {
    async fn get(&self, user_id: &str) -> Result<Option<Profile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id::text AS id, is_superadmin
            FROM profiles
            WHERE id::text = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get profile: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_profile(&row)?)),
            None => Ok(None),
        }
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", name, e)))
}

fn row_to_step(row: &PgRow) -> Result<Step, DomainError> {
    let temperature: Option<f64> = column(row, "llm_temperature")?;
    let model_id: Option<i64> = column(row, "llm_model_id")?;

    Ok(Step {
        id: StepId::new(column(row, "id")?),
        flavor_id: FlavorId::new(column(row, "humor_flavor_id")?),
        order_index: column(row, "order_by")?,
        input_modality: InputModality::from_type_id(column(row, "llm_input_type_id")?),
        model_ref: model_id.map(ModelId::new),
        temperature: temperature.map(|t| t as f32),
        system_prompt_template: column(row, "llm_system_prompt")?,
        user_prompt_template: column(row, "llm_user_prompt")?,
        step_type_ref: column(row, "humor_flavor_step_type_id")?,
    })
}

fn row_to_model(row: &PgRow) -> Result<Model, DomainError> {
    let id: i64 = column(row, "id")?;
    let name: Option<String> = column(row, "name")?;
    let provider_model_id: Option<String> = column(row, "provider_model_id")?;
    let provider_id: Option<i64> = column(row, "llm_provider_id")?;
    let supports_temperature: Option<bool> = column(row, "is_temperature_supported")?;

    Ok(Model::new(id, name.unwrap_or_default(), provider_model_id.unwrap_or_default())
        .with_provider_id(provider_id.unwrap_or_default())
        .with_supports_temperature(supports_temperature.unwrap_or(true)))
}

fn row_to_profile(row: &PgRow) -> Result<Profile, DomainError> {
    let is_superadmin: Option<bool> = column(row, "is_superadmin")?;

    Ok(Profile {
        id: column(row, "id")?,
        is_superadmin: is_superadmin.unwrap_or(false),
    })
}
