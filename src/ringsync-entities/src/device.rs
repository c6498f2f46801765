use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "DEVICE")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "_id")]
    pub id: i64,
    #[sea_orm(column_name = "NAME")]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
