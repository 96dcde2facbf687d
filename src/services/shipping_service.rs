use crate::entities::{commune_entity as communes, wilaya_entity as wilayas};
use crate::error::{AppError, AppResult};
use crate::models::{AddCommunesRequest, CommuneResponse, UpdateWilayaRequest, WilayaResponse};
use crate::utils::require_text;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

/// Trims names and drops blanks and case-insensitive duplicates.
pub fn clean_commune_names(names: &[String]) -> AppResult<Vec<String>> {
    let mut cleaned: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() {
            continue;
        }
        let name = require_text("Commune name", name, 2, 120)?;
        if !cleaned.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
            cleaned.push(name);
        }
    }
    if cleaned.is_empty() {
        return Err(AppError::ValidationError(
            "At least one commune name is required".to_string(),
        ));
    }
    Ok(cleaned)
}

#[derive(Clone)]
pub struct ShippingService {
    pool: DatabaseConnection,
}

impl ShippingService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_wilayas(&self, include_inactive: bool) -> AppResult<Vec<WilayaResponse>> {
        let mut select = wilayas::Entity::find();
        if !include_inactive {
            select = select.filter(wilayas::Column::IsActive.eq(true));
        }
        let list = select
            .order_by_asc(wilayas::Column::Code)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn list_communes(&self, wilaya_code: i32) -> AppResult<Vec<CommuneResponse>> {
        self.find_wilaya(wilaya_code).await?;
        let list = communes::Entity::find()
            .filter(communes::Column::WilayaCode.eq(wilaya_code))
            .order_by_asc(communes::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn update_wilaya(
        &self,
        wilaya_code: i32,
        request: UpdateWilayaRequest,
    ) -> AppResult<WilayaResponse> {
        let wilaya = self.find_wilaya(wilaya_code).await?;

        let fees = [request.home_delivery_fee, request.desk_delivery_fee];
        if fees.iter().flatten().any(|fee| *fee < 0) {
            return Err(AppError::ValidationError(
                "Delivery fee cannot be negative".to_string(),
            ));
        }

        let mut model = wilaya.into_active_model();
        if let Some(fee) = request.home_delivery_fee {
            model.home_delivery_fee = Set(fee);
        }
        if let Some(fee) = request.desk_delivery_fee {
            model.desk_delivery_fee = Set(fee);
        }
        if let Some(active) = request.is_active {
            model.is_active = Set(active);
        }
        let updated = model.update(&self.pool).await?;

        log::info!(
            "Wilaya {} updated: home {} / desk {} DZD, active={}",
            updated.code,
            updated.home_delivery_fee,
            updated.desk_delivery_fee,
            updated.is_active
        );
        Ok(updated.into())
    }

    /// Adds communes, skipping names already present. Returns the full list.
    pub async fn add_communes(
        &self,
        wilaya_code: i32,
        request: AddCommunesRequest,
    ) -> AppResult<Vec<CommuneResponse>> {
        self.find_wilaya(wilaya_code).await?;
        let names = clean_commune_names(&request.names)?;

        let models = names.into_iter().map(|name| communes::ActiveModel {
            wilaya_code: Set(wilaya_code),
            name: Set(name),
            ..Default::default()
        });
        let inserted = communes::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([communes::Column::WilayaCode, communes::Column::Name])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.pool)
            .await?;

        log::info!("Added {} communes to wilaya {}", inserted, wilaya_code);
        self.list_communes(wilaya_code).await
    }

    async fn find_wilaya(&self, wilaya_code: i32) -> AppResult<wilayas::Model> {
        wilayas::Entity::find_by_id(wilaya_code)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Wilaya {wilaya_code} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_commune_names() {
        let names = vec![
            " Bab Ezzouar ".to_string(),
            "".to_string(),
            "bab ezzouar".to_string(),
            "Hydra".to_string(),
        ];
        assert_eq!(
            clean_commune_names(&names).unwrap(),
            vec!["Bab Ezzouar".to_string(), "Hydra".to_string()]
        );
    }

    #[test]
    fn test_clean_commune_names_requires_one() {
        assert!(clean_commune_names(&[]).is_err());
        assert!(clean_commune_names(&["  ".to_string()]).is_err());
    }
}
