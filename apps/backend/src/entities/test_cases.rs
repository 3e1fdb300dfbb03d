use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "case_priority")]
#[serde(rename_all = "lowercase")]
pub enum CasePriority {
    #[sea_orm(string_value = "CRITICAL")]
    Critical,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "LOW")]
    Low,
}

/// A single step within a test case. The `steps` column stores a JSON
/// array of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    pub step_number: u32,
    pub action: String,
    pub expected_result: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "test_cases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "section_id")]
    pub section_id: i64,
    pub title: String,
    pub preconditions: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub steps: Json,
    #[sea_orm(column_name = "expected_result")]
    pub expected_result: String,
    pub priority: CasePriority,
    pub version: i32,
    #[sea_orm(column_name = "created_by")]
    pub created_by: Option<i64>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    #[sea_orm(column_name = "deleted_at")]
    pub deleted_at: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_sections::Entity",
        from = "Column::SectionId",
        to = "super::test_sections::Column::Id"
    )]
    TestSection,
    #[sea_orm(has_many = "super::test_case_versions::Entity")]
    Versions,
    #[sea_orm(has_many = "super::test_results::Entity")]
    TestResults,
    #[sea_orm(has_many = "super::requirement_coverage::Entity")]
    RequirementCoverage,
}

impl Related<super::test_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestSection.def()
    }
}

impl Related<super::test_case_versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Versions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
