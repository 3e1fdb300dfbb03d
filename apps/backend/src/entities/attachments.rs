use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attachment_owner")]
#[serde(rename_all = "snake_case")]
pub enum AttachmentOwner {
    #[sea_orm(string_value = "TEST_CASE")]
    TestCase,
    #[sea_orm(string_value = "TEST_RESULT")]
    TestResult,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "owner_kind")]
    pub owner_kind: AttachmentOwner,
    #[sea_orm(column_name = "owner_id")]
    pub owner_id: i64,
    #[sea_orm(column_name = "file_name")]
    pub file_name: String,
    #[sea_orm(column_name = "content_type")]
    pub content_type: String,
    #[sea_orm(column_name = "size_bytes")]
    pub size_bytes: i64,
    #[sea_orm(column_name = "storage_key")]
    pub storage_key: String,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
