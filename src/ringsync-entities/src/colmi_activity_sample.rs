use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "COLMI_ACTIVITY_SAMPLE")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "TIMESTAMP")]
    pub timestamp: i64,
    #[sea_orm(primary_key, auto_increment = false, column_name = "DEVICE_ID")]
    pub device_id: i64,
    #[sea_orm(column_name = "STEPS")]
    pub steps: i64,
    #[sea_orm(column_name = "CALORIES")]
    pub calories: i64,
    #[sea_orm(column_name = "DISTANCE")]
    pub distance: i64,
    #[sea_orm(column_name = "RAW_KIND")]
    pub raw_kind: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
