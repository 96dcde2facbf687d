use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

/// Delivery fee zones in DZD (home, desk).
const ZONE_CAPITAL: (i64, i64) = (400, 250);
const ZONE_NORTH: (i64, i64) = (600, 350);
const ZONE_HIGHLANDS: (i64, i64) = (800, 500);
const ZONE_SOUTH: (i64, i64) = (1200, 800);

/// The 58 wilayas (code, name, Arabic name, fee zone).
const WILAYAS: &[(i32, &str, &str, (i64, i64))] = &[
    (1, "Adrar", "أدرار", ZONE_SOUTH),
    (2, "Chlef", "الشلف", ZONE_NORTH),
    (3, "Laghouat", "الأغواط", ZONE_HIGHLANDS),
    (4, "Oum El Bouaghi", "أم البواقي", ZONE_NORTH),
    (5, "Batna", "باتنة", ZONE_NORTH),
    (6, "Béjaïa", "بجاية", ZONE_NORTH),
    (7, "Biskra", "بسكرة", ZONE_HIGHLANDS),
    (8, "Béchar", "بشار", ZONE_HIGHLANDS),
    (9, "Blida", "البليدة", ZONE_NORTH),
    (10, "Bouira", "البويرة", ZONE_NORTH),
    (11, "Tamanrasset", "تمنراست", ZONE_SOUTH),
    (12, "Tébessa", "تبسة", ZONE_NORTH),
    (13, "Tlemcen", "تلمسان", ZONE_NORTH),
    (14, "Tiaret", "تيارت", ZONE_NORTH),
    (15, "Tizi Ouzou", "تيزي وزو", ZONE_NORTH),
    (16, "Alger", "الجزائر", ZONE_CAPITAL),
    (17, "Djelfa", "الجلفة", ZONE_HIGHLANDS),
    (18, "Jijel", "جيجل", ZONE_NORTH),
    (19, "Sétif", "سطيف", ZONE_NORTH),
    (20, "Saïda", "سعيدة", ZONE_NORTH),
    (21, "Skikda", "سكيكدة", ZONE_NORTH),
    (22, "Sidi Bel Abbès", "سيدي بلعباس", ZONE_NORTH),
    (23, "Annaba", "عنابة", ZONE_NORTH),
    (24, "Guelma", "قالمة", ZONE_NORTH),
    (25, "Constantine", "قسنطينة", ZONE_NORTH),
    (26, "Médéa", "المدية", ZONE_NORTH),
    (27, "Mostaganem", "مستغانم", ZONE_NORTH),
    (28, "M'Sila", "المسيلة", ZONE_NORTH),
    (29, "Mascara", "معسكر", ZONE_NORTH),
    (30, "Ouargla", "ورقلة", ZONE_HIGHLANDS),
    (31, "Oran", "وهران", ZONE_NORTH),
    (32, "El Bayadh", "البيض", ZONE_HIGHLANDS),
    (33, "Illizi", "إليزي", ZONE_SOUTH),
    (34, "Bordj Bou Arréridj", "برج بوعريريج", ZONE_NORTH),
    (35, "Boumerdès", "بومرداس", ZONE_NORTH),
    (36, "El Tarf", "الطارف", ZONE_NORTH),
    (37, "Tindouf", "تندوف", ZONE_SOUTH),
    (38, "Tissemsilt", "تيسمسيلت", ZONE_NORTH),
    (39, "El Oued", "الوادي", ZONE_HIGHLANDS),
    (40, "Khenchela", "خنشلة", ZONE_NORTH),
    (41, "Souk Ahras", "سوق أهراس", ZONE_NORTH),
    (42, "Tipaza", "تيبازة", ZONE_NORTH),
    (43, "Mila", "ميلة", ZONE_NORTH),
    (44, "Aïn Defla", "عين الدفلى", ZONE_NORTH),
    (45, "Naâma", "النعامة", ZONE_HIGHLANDS),
    (46, "Aïn Témouchent", "عين تموشنت", ZONE_NORTH),
    (47, "Ghardaïa", "غرداية", ZONE_HIGHLANDS),
    (48, "Relizane", "غليزان", ZONE_NORTH),
    (49, "Timimoun", "تيميمون", ZONE_SOUTH),
    (50, "Bordj Badji Mokhtar", "برج باجي مختار", ZONE_SOUTH),
    (51, "Ouled Djellal", "أولاد جلال", ZONE_HIGHLANDS),
    (52, "Béni Abbès", "بني عباس", ZONE_SOUTH),
    (53, "In Salah", "عين صالح", ZONE_SOUTH),
    (54, "In Guezzam", "عين قزام", ZONE_SOUTH),
    (55, "Touggourt", "تقرت", ZONE_HIGHLANDS),
    (56, "Djanet", "جانت", ZONE_SOUTH),
    (57, "El M'Ghair", "المغير", ZONE_HIGHLANDS),
    (58, "El Meniaa", "المنيعة", ZONE_HIGHLANDS),
];

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let rows: Vec<String> = WILAYAS
            .iter()
            .map(|(code, name, name_ar, (home, desk))| {
                format!(
                    "({code}, {}, {}, {home}, {desk}, TRUE)",
                    quote(name),
                    quote(name_ar)
                )
            })
            .collect();

        // Re-running leaves fees edited by the admin untouched
        let sql = format!(
            "INSERT INTO wilayas (code, name, name_ar, home_delivery_fee, desk_delivery_fee, is_active) VALUES {} ON CONFLICT (code) DO NOTHING",
            rows.join(", ")
        );
        let stmt = Statement::from_string(manager.get_database_backend(), sql);
        manager.get_connection().execute(stmt).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let stmt = Statement::from_string(
            manager.get_database_backend(),
            "DELETE FROM wilayas".to_owned(),
        );
        manager.get_connection().execute(stmt).await?;
        Ok(())
    }
}
