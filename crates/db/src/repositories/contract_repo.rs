//! Repository for the `contracts` table: CRUD, payment recording, cascade.

use clientele_core::payments;
use clientele_core::types::DbId;

use crate::models::contract::{Contract, ContractFilter, CreateContract, UpdateContract};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, client_id, commercial_id, total_amount, \
                       remaining_amount, is_signed, is_paid, created_at, updated_at";

/// Provides CRUD operations for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract, returning the created row.
    ///
    /// `commercial_id` is supplied by the operation layer (the client's
    /// commercial, never caller input); `remaining_amount` always starts at
    /// `total_amount`.
    pub async fn create(
        pool: &DbPool,
        input: &CreateContract,
        commercial_id: DbId,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts
                (name, description, client_id, commercial_id, total_amount, remaining_amount,
                 is_signed, is_paid)
             VALUES ($1, $2, $3, $4, $5, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.client_id)
            .bind(commercial_id)
            .bind(input.total_amount)
            .bind(input.is_signed)
            .bind(input.is_paid)
            .fetch_one(pool)
            .await
    }

    /// Find a contract by internal ID.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List contracts matching the filter (all criteria are AND-ed).
    pub async fn list(pool: &DbPool, filter: &ContractFilter) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts
             WHERE ($1 IS NULL OR client_id = $1)
               AND ($2 IS NULL OR commercial_id = $2)
               AND ($3 IS NULL OR is_signed = $3)
               AND ($4 IS NULL OR is_paid = $4)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(filter.client_id)
            .bind(filter.commercial_id)
            .bind(filter.is_signed)
            .bind(filter.is_paid)
            .fetch_all(pool)
            .await
    }

    /// Update a contract. Only non-`None` fields in `input` are applied.
    ///
    /// This path may set `is_paid` and `remaining_amount` independently;
    /// keeping them consistent is the caller's business decision.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                total_amount = COALESCE($4, total_amount),
                remaining_amount = COALESCE($5, remaining_amount),
                is_signed = COALESCE($6, is_signed),
                is_paid = COALESCE($7, is_paid),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.total_amount)
            .bind(input.remaining_amount)
            .bind(input.is_signed)
            .bind(input.is_paid)
            .fetch_optional(pool)
            .await
    }

    /// Record a payment against a contract.
    ///
    /// Re-reads `remaining_amount` inside a transaction, applies the pure
    /// payment rule, and persists the decrement. Returns `false` without any
    /// mutation when the rule refuses the amount (`amount <= 0` or
    /// `amount > remaining`). Does NOT touch `is_paid`.
    pub async fn record_payment(
        pool: &DbPool,
        id: DbId,
        amount: f64,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let remaining: f64 =
            sqlx::query_scalar("SELECT remaining_amount FROM contracts WHERE id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let Some(new_remaining) = payments::apply_payment(remaining, amount) else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE contracts SET remaining_amount = $2, updated_at = CURRENT_TIMESTAMP
             WHERE id = $1",
        )
        .bind(id)
        .bind(new_remaining)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(contract_id = id, amount, new_remaining, "payment recorded");
        Ok(true)
    }

    /// Delete a contract and its events as one atomic unit.
    ///
    /// Returns `true` if the contract row existed.
    pub async fn delete_cascade(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM events WHERE contract_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(contract_id = id, "contract deleted with cascade");
        }
        Ok(deleted)
    }
}
