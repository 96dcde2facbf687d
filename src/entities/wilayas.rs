use super::DeliveryType;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "wilayas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: i32,
    pub name: String,
    pub name_ar: String,
    pub home_delivery_fee: i64,
    pub desk_delivery_fee: i64,
    pub is_active: bool,
}

impl Model {
    pub fn delivery_fee(&self, delivery_type: DeliveryType) -> i64 {
        match delivery_type {
            DeliveryType::Home => self.home_delivery_fee,
            DeliveryType::Desk => self.desk_delivery_fee,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
