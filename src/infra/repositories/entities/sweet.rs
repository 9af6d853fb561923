//! Sweet database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Sweet;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sweets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sweet {
    fn from(model: Model) -> Self {
        Sweet {
            id: model.id,
            name: model.name,
            category: model.category,
            price: model.price,
            quantity: model.quantity,
        }
    }
}
