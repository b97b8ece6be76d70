use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One monetized upload. Rows are only ever inserted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub summary: String,
    #[sea_orm(column_type = "Text")]
    pub tags: String, // JSON array text

    #[sea_orm(unique)]
    pub hash: String,
    pub download: String,
    pub title: String,
    pub wallet_address: String,
    pub amount: String,
    pub contract_address: String, // empty when nothing was deployed

    // Lowercased copies matched by keyword search
    #[sea_orm(column_type = "Text")]
    pub search_title: String,
    #[sea_orm(column_type = "Text")]
    pub search_tags: String,
    #[sea_orm(column_type = "Text")]
    pub search_summary: String,

    pub timestamp: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
