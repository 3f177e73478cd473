//! Repository for the `clients` table, including the explicit cascade.

use clientele_core::types::DbId;

use crate::models::client::{Client, CreateClient, UpdateClient};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, phone, company_name, commercial_id, \
                       created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (first_name, last_name, email, phone, company_name, commercial_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company_name)
            .bind(input.commercial_id)
            .fetch_one(pool)
            .await
    }

    /// Find a client by internal ID.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a client by email (emails are globally unique).
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE email = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List clients, optionally restricted to one owning commercial.
    pub async fn list(
        pool: &DbPool,
        commercial_id: Option<DbId>,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE ($1 IS NULL OR commercial_id = $1)
             ORDER BY last_name, first_name"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(commercial_id)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                company_name = COALESCE($6, company_name),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company_name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client and everything under it, as one atomic unit.
    ///
    /// Ordered cascade inside a single transaction: events under the
    /// client's contracts first, then the contracts, then the client. A
    /// failure at any step rolls the whole deletion back.
    ///
    /// Returns `true` if the client row existed.
    pub async fn delete_cascade(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM events
             WHERE contract_id IN (SELECT id FROM contracts WHERE client_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM contracts WHERE client_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(client_id = id, "client deleted with cascade");
        }
        Ok(deleted)
    }
}
