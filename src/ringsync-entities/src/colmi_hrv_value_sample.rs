use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "COLMI_HRV_VALUE_SAMPLE")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "TIMESTAMP")]
    pub timestamp: i64,
    #[sea_orm(primary_key, auto_increment = false, column_name = "DEVICE_ID")]
    pub device_id: i64,
    #[sea_orm(column_name = "VALUE")]
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
