use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "result_status")]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    #[sea_orm(string_value = "PASSED")]
    Passed,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "BLOCKED")]
    Blocked,
    #[sea_orm(string_value = "SKIPPED")]
    Skipped,
    #[sea_orm(string_value = "UNTESTED")]
    Untested,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "test_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "run_id")]
    pub run_id: i64,
    #[sea_orm(column_name = "case_id")]
    pub case_id: i64,
    pub status: ResultStatus,
    pub comment: Option<String>,
    #[sea_orm(column_name = "elapsed_seconds")]
    pub elapsed_seconds: Option<i32>,
    #[sea_orm(column_name = "executed_by")]
    pub executed_by: Option<i64>,
    #[sea_orm(column_name = "executed_at")]
    pub executed_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_runs::Entity",
        from = "Column::RunId",
        to = "super::test_runs::Column::Id"
    )]
    TestRun,
    #[sea_orm(
        belongs_to = "super::test_cases::Entity",
        from = "Column::CaseId",
        to = "super::test_cases::Column::Id"
    )]
    TestCase,
}

impl Related<super::test_runs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestRun.def()
    }
}

impl Related<super::test_cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestCase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
