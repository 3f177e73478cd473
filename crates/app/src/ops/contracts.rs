//! Contract and payment operations.
//!
//! The servicing commercial on a contract is always the client's commercial
//! at creation time; callers never supply it. Payments only ever decrement
//! `remaining_amount` and never flip `is_paid`.

use clientele_core::error::CoreError;
use clientele_core::permissions::{self, Action, ActorRef, Target};
use clientele_core::types::DbId;
use clientele_db::models::contract::{Contract, ContractFilter, CreateContract, UpdateContract};
use clientele_db::repositories::{ClientRepo, ContractRepo};
use clientele_db::DbPool;
use validator::Validate;

use crate::error::AppResult;

/// Create a contract for a client.
pub async fn create(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    input: CreateContract,
) -> AppResult<Contract> {
    // 1. The client anchors both the permission check and the commercial.
    let actor = permissions::require_authenticated(actor)?;
    let client = ClientRepo::find_by_id(pool, input.client_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "client", id: input.client_id })?;
    permissions::require_allowed(
        actor,
        Action::Create,
        &Target::Contract { commercial: client.commercial_id },
    )?;

    // 2. Amounts must be positive.
    if input.total_amount <= 0.0 {
        return Err(
            CoreError::Validation("The total amount must be greater than zero".into()).into(),
        );
    }

    // 3. Validate and insert; remaining_amount starts at total_amount.
    input.validate()?;
    let contract = ContractRepo::create(pool, &input, client.commercial_id).await?;
    tracing::info!(
        contract_id = contract.id,
        client_id = contract.client_id,
        total = contract.total_amount,
        "contract created"
    );
    Ok(contract)
}

/// Update a contract's fields.
///
/// `is_paid` and `remaining_amount` may be set independently here; the
/// update path never reconciles them.
pub async fn update(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    contract_id: DbId,
    input: UpdateContract,
) -> AppResult<Contract> {
    // 1. Resolve the target and guard against its servicing commercial.
    let actor = permissions::require_authenticated(actor)?;
    let contract = ContractRepo::find_by_id(pool, contract_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "contract", id: contract_id })?;
    permissions::require_allowed(
        actor,
        Action::Update,
        &Target::Contract { commercial: contract.commercial_id },
    )?;

    // 2. Amount sanity. `0 <= remaining <= total` must hold for the
    //    effective values, whichever side of the pair this update touches.
    let total = input.total_amount.unwrap_or(contract.total_amount);
    let remaining = input.remaining_amount.unwrap_or(contract.remaining_amount);
    if total <= 0.0 {
        return Err(
            CoreError::Validation("The total amount must be greater than zero".into()).into(),
        );
    }
    if remaining < 0.0 || remaining > total {
        return Err(CoreError::Validation(
            "The remaining amount must be between zero and the total amount".into(),
        )
        .into());
    }

    // 3. Apply.
    let contract = ContractRepo::update(pool, contract_id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "contract", id: contract_id })?;
    tracing::info!(contract_id = contract.id, "contract updated");
    Ok(contract)
}

/// Record a payment against a contract.
///
/// Returns `true` when the payment was applied, `false` when the amount was
/// refused (`amount <= 0` or `amount > remaining`); refusal mutates nothing.
pub async fn record_payment(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    contract_id: DbId,
    amount: f64,
) -> AppResult<bool> {
    // 1. Resolve the target and guard against its servicing commercial.
    let actor = permissions::require_authenticated(actor)?;
    let contract = ContractRepo::find_by_id(pool, contract_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "contract", id: contract_id })?;
    permissions::require_allowed(
        actor,
        Action::Update,
        &Target::Contract { commercial: contract.commercial_id },
    )?;

    // 2. The repository re-reads the balance inside its transaction.
    Ok(ContractRepo::record_payment(pool, contract_id, amount).await?)
}

/// Delete a contract together with its events.
pub async fn delete(pool: &DbPool, actor: Option<&ActorRef>, contract_id: DbId) -> AppResult<()> {
    // 1. Resolve the target and guard against its servicing commercial.
    let actor = permissions::require_authenticated(actor)?;
    let contract = ContractRepo::find_by_id(pool, contract_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "contract", id: contract_id })?;
    permissions::require_allowed(
        actor,
        Action::Delete,
        &Target::Contract { commercial: contract.commercial_id },
    )?;

    // 2. One atomic cascade: events first, then the contract.
    let deleted = ContractRepo::delete_cascade(pool, contract_id).await?;
    if !deleted {
        return Err(CoreError::NotFound { entity: "contract", id: contract_id }.into());
    }
    Ok(())
}

/// Fetch one contract. Reads are open to every authenticated role.
pub async fn get(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    contract_id: DbId,
) -> AppResult<Contract> {
    permissions::require_authenticated(actor)?;
    Ok(ContractRepo::find_by_id(pool, contract_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "contract", id: contract_id })?)
}

/// List contracts matching the filter.
pub async fn list(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    filter: ContractFilter,
) -> AppResult<Vec<Contract>> {
    permissions::require_authenticated(actor)?;
    Ok(ContractRepo::list(pool, &filter).await?)
}
