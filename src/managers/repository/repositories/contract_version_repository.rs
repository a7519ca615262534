use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::managers::repository::{
    error::Result,
    models::contract_versions::{ActiveModel, Column, Entity, Model},
};

/// Access to the version ledger. All operations run on a caller-supplied
/// connection so the mapper can keep them inside its transaction.
pub(crate) struct ContractVersionRepository;

impl ContractVersionRepository {
    /// Returns the version that produced the highest internal round so far.
    ///
    /// Ordering by `last_internal_round` (rather than insertion time) is the
    /// contract here: it keeps the mapping correct after a rollback to a
    /// previously-used contract identity.
    pub(crate) async fn current_version<C: ConnectionTrait>(conn: &C) -> Result<Option<Model>> {
        Ok(Entity::find()
            .order_by(Column::LastInternalRound, Order::Desc)
            .limit(1)
            .one(conn)
            .await?)
    }

    /// Inserts the ledger row for a newly observed contract identity.
    ///
    /// `first_internal_round` and `last_internal_round` both start at the
    /// identity's first mapped round. Re-inserting an address that already
    /// has a row fails with a uniqueness violation; that failure is
    /// deliberately surfaced to the caller.
    pub(crate) async fn insert_version<C: ConnectionTrait>(
        conn: &C,
        contract_address: &str,
        round_offset: i64,
        internal_round: i64,
    ) -> Result<()> {
        let model = ActiveModel {
            contract_address: ActiveValue::Set(contract_address.to_owned()),
            round_offset: ActiveValue::Set(round_offset),
            last_internal_round: ActiveValue::Set(internal_round),
            first_internal_round: ActiveValue::Set(internal_round),
        };

        Entity::insert(model).exec_without_returning(conn).await?;
        Ok(())
    }

    /// Advances `last_internal_round` for an existing identity.
    pub(crate) async fn set_last_internal_round<C: ConnectionTrait>(
        conn: &C,
        contract_address: &str,
        internal_round: i64,
    ) -> Result<()> {
        Entity::update_many()
            .col_expr(
                Column::LastInternalRound,
                sea_orm::sea_query::Expr::value(internal_round),
            )
            .filter(Column::ContractAddress.eq(contract_address))
            .exec(conn)
            .await?;
        Ok(())
    }
}
