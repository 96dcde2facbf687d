use crate::entities::{commune_entity, wilaya_entity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WilayaResponse {
    pub code: i32,
    pub name: String,
    pub name_ar: String,
    pub home_delivery_fee: i64,
    pub desk_delivery_fee: i64,
    pub is_active: bool,
}

impl From<wilaya_entity::Model> for WilayaResponse {
    fn from(m: wilaya_entity::Model) -> Self {
        Self {
            code: m.code,
            name: m.name,
            name_ar: m.name_ar,
            home_delivery_fee: m.home_delivery_fee,
            desk_delivery_fee: m.desk_delivery_fee,
            is_active: m.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommuneResponse {
    pub id: i64,
    pub wilaya_code: i32,
    pub name: String,
}

impl From<commune_entity::Model> for CommuneResponse {
    fn from(m: commune_entity::Model) -> Self {
        Self {
            id: m.id,
            wilaya_code: m.wilaya_code,
            name: m.name,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateWilayaRequest {
    pub home_delivery_fee: Option<i64>,
    pub desk_delivery_fee: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddCommunesRequest {
    pub names: Vec<String>,
}
