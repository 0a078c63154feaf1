//! `SeaORM` entity for the `exchange_details` table.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::Currency;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "exchange_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub source_account_id: Uuid,
    pub target_account_id: Uuid,
    pub source_amount: Decimal,
    pub source_currency: Currency,
    pub target_amount: Decimal,
    pub target_currency: Currency,
    /// `target_amount / source_amount`, stored for reporting only (see `DESIGN.md`).
    pub exchange_rate: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id"
    )]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
