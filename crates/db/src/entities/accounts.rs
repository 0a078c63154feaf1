//! `SeaORM` entity for the `accounts` table.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::Currency;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: Decimal,
    pub currency: Currency,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts this row into the domain aggregate.
    #[must_use]
    pub fn into_domain(self) -> ledger_core::Account {
        ledger_core::Account::new(
            self.id.into(),
            self.user_id.into(),
            ledger_shared::Money::new(self.balance, self.currency.into()),
        )
    }
}
