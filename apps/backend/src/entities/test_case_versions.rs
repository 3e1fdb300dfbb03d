use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::test_cases::CasePriority;

/// Snapshot of a test case as it was before an update. Rows are written
/// by the case update path and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "test_case_versions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "case_id")]
    pub case_id: i64,
    pub version: i32,
    pub title: String,
    pub preconditions: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub steps: Json,
    #[sea_orm(column_name = "expected_result")]
    pub expected_result: String,
    pub priority: CasePriority,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_cases::Entity",
        from = "Column::CaseId",
        to = "super::test_cases::Column::Id"
    )]
    TestCase,
}

impl Related<super::test_cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestCase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
