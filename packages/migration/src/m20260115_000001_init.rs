use sea_orm::Statement;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::extension::postgres::Type as PgType;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Organizations {
    Table,
    Id,
    Name,
    Slug,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    OrgId,
    Email,
    PasswordHash,
    DisplayName,
    Role,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    OrgId,
    Name,
    Key,
    Description,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum TestSuites {
    Table,
    Id,
    ProjectId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum TestSections {
    Table,
    Id,
    SuiteId,
    ParentId,
    Name,
    Position,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TestCases {
    Table,
    Id,
    SectionId,
    Title,
    Preconditions,
    Steps,
    ExpectedResult,
    Priority,
    Version,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum TestCaseVersions {
    Table,
    Id,
    CaseId,
    Version,
    Title,
    Preconditions,
    Steps,
    ExpectedResult,
    Priority,
    CreatedAt,
}

#[derive(Iden)]
enum TestRuns {
    Table,
    Id,
    ProjectId,
    MilestoneId,
    Name,
    State,
    CreatedBy,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TestResults {
    Table,
    Id,
    RunId,
    CaseId,
    Status,
    Comment,
    ElapsedSeconds,
    ExecutedBy,
    ExecutedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Milestones {
    Table,
    Id,
    ProjectId,
    Name,
    Description,
    DueDate,
    Completed,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum TestPlans {
    Table,
    Id,
    ProjectId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Requirements {
    Table,
    Id,
    ProjectId,
    ExternalKey,
    Title,
    Description,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum RequirementCoverage {
    Table,
    Id,
    RequirementId,
    CaseId,
    CreatedAt,
}

#[derive(Iden)]
enum Attachments {
    Table,
    Id,
    OwnerKind,
    OwnerId,
    FileName,
    ContentType,
    SizeBytes,
    StorageKey,
    CreatedAt,
}

#[derive(Iden)]
enum UserRoleEnum {
    #[iden = "user_role"]
    Type,
}

#[derive(Iden)]
enum CasePriorityEnum {
    #[iden = "case_priority"]
    Type,
}

#[derive(Iden)]
enum RunStateEnum {
    #[iden = "run_state"]
    Type,
}

#[derive(Iden)]
enum ResultStatusEnum {
    #[iden = "result_status"]
    Type,
}

#[derive(Iden)]
enum AttachmentOwnerEnum {
    #[iden = "attachment_owner"]
    Type,
}

fn pk_bigint(col: impl IntoIden + 'static) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.big_integer().not_null().primary_key().auto_increment();
    def
}

fn timestamps(table: &mut TableCreateStatement, created: impl IntoIden + 'static, updated: impl IntoIden + 'static) {
    table
        .col(
            ColumnDef::new(created)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(updated)
                .timestamp_with_time_zone()
                .not_null(),
        );
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Postgres enum types first; entity columns reference them.
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                async fn enum_exists(
                    manager: &SchemaManager<'_>,
                    enum_name: &str,
                ) -> Result<bool, DbErr> {
                    let result = manager
                        .get_connection()
                        .query_one(Statement::from_string(
                            sea_orm::DatabaseBackend::Postgres,
                            format!("SELECT 1 FROM pg_type WHERE typname = '{}'", enum_name),
                        ))
                        .await?;
                    Ok(result.is_some())
                }

                if !enum_exists(manager, "user_role").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(UserRoleEnum::Type)
                                .values(["ADMIN", "MANAGER", "TESTER", "VIEWER"])
                                .to_owned(),
                        )
                        .await?;
                }

                if !enum_exists(manager, "case_priority").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(CasePriorityEnum::Type)
                                .values(["CRITICAL", "HIGH", "MEDIUM", "LOW"])
                                .to_owned(),
                        )
                        .await?;
                }

                if !enum_exists(manager, "run_state").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(RunStateEnum::Type)
                                .values(["ACTIVE", "COMPLETED"])
                                .to_owned(),
                        )
                        .await?;
                }

                if !enum_exists(manager, "result_status").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(ResultStatusEnum::Type)
                                .values(["PASSED", "FAILED", "BLOCKED", "SKIPPED", "UNTESTED"])
                                .to_owned(),
                        )
                        .await?;
                }

                if !enum_exists(manager, "attachment_owner").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(AttachmentOwnerEnum::Type)
                                .values(["TEST_CASE", "TEST_RESULT"])
                                .to_owned(),
                        )
                        .await?;
                }
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".into()));
            }
        }

        // organizations
        let mut organizations = Table::create()
            .table(Organizations::Table)
            .if_not_exists()
            .col(pk_bigint(Organizations::Id))
            .col(ColumnDef::new(Organizations::Name).string().not_null())
            .col(ColumnDef::new(Organizations::Slug).string().not_null())
            .col(
                ColumnDef::new(Organizations::DeletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .to_owned();
        timestamps(
            &mut organizations,
            Organizations::CreatedAt,
            Organizations::UpdatedAt,
        );
        manager.create_table(organizations).await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_organizations_slug")
                    .table(Organizations::Table)
                    .col(Organizations::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // users
        let mut users = Table::create()
            .table(Users::Table)
            .if_not_exists()
            .col(pk_bigint(Users::Id))
            .col(ColumnDef::new(Users::OrgId).big_integer().not_null())
            .col(ColumnDef::new(Users::Email).string().not_null())
            .col(ColumnDef::new(Users::PasswordHash).string().not_null())
            .col(ColumnDef::new(Users::DisplayName).string().not_null())
            .col(
                ColumnDef::new(Users::Role)
                    .custom(UserRoleEnum::Type)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Users::DeletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_users_org_id")
                    .from(Users::Table, Users::OrgId)
                    .to(Organizations::Table, Organizations::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        timestamps(&mut users, Users::CreatedAt, Users::UpdatedAt);
        manager.create_table(users).await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // projects
        let mut projects = Table::create()
            .table(Projects::Table)
            .if_not_exists()
            .col(pk_bigint(Projects::Id))
            .col(ColumnDef::new(Projects::OrgId).big_integer().not_null())
            .col(ColumnDef::new(Projects::Name).string().not_null())
            .col(ColumnDef::new(Projects::Key).string().not_null())
            .col(ColumnDef::new(Projects::Description).text().null())
            .col(
                ColumnDef::new(Projects::DeletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_projects_org_id")
                    .from(Projects::Table, Projects::OrgId)
                    .to(Organizations::Table, Organizations::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        timestamps(&mut projects, Projects::CreatedAt, Projects::UpdatedAt);
        manager.create_table(projects).await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_projects_org_id_key")
                    .table(Projects::Table)
                    .col(Projects::OrgId)
                    .col(Projects::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // test_suites
        let mut test_suites = Table::create()
            .table(TestSuites::Table)
            .if_not_exists()
            .col(pk_bigint(TestSuites::Id))
            .col(ColumnDef::new(TestSuites::ProjectId).big_integer().not_null())
            .col(ColumnDef::new(TestSuites::Name).string().not_null())
            .col(ColumnDef::new(TestSuites::Description).text().null())
            .col(
                ColumnDef::new(TestSuites::DeletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_suites_project_id")
                    .from(TestSuites::Table, TestSuites::ProjectId)
                    .to(Projects::Table, Projects::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        timestamps(&mut test_suites, TestSuites::CreatedAt, TestSuites::UpdatedAt);
        manager.create_table(test_suites).await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_test_suites_project_id")
                    .table(TestSuites::Table)
                    .col(TestSuites::ProjectId)
                    .to_owned(),
            )
            .await?;

        // test_sections (hierarchical within a suite; hard-deleted)
        let mut test_sections = Table::create()
            .table(TestSections::Table)
            .if_not_exists()
            .col(pk_bigint(TestSections::Id))
            .col(ColumnDef::new(TestSections::SuiteId).big_integer().not_null())
            .col(ColumnDef::new(TestSections::ParentId).big_integer().null())
            .col(ColumnDef::new(TestSections::Name).string().not_null())
            .col(
                ColumnDef::new(TestSections::Position)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_sections_suite_id")
                    .from(TestSections::Table, TestSections::SuiteId)
                    .to(TestSuites::Table, TestSuites::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_sections_parent_id")
                    .from(TestSections::Table, TestSections::ParentId)
                    .to(TestSections::Table, TestSections::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        timestamps(
            &mut test_sections,
            TestSections::CreatedAt,
            TestSections::UpdatedAt,
        );
        manager.create_table(test_sections).await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_test_sections_suite_id")
                    .table(TestSections::Table)
                    .col(TestSections::SuiteId)
                    .to_owned(),
            )
            .await?;

        // test_cases
        let mut test_cases = Table::create()
            .table(TestCases::Table)
            .if_not_exists()
            .col(pk_bigint(TestCases::Id))
            .col(ColumnDef::new(TestCases::SectionId).big_integer().not_null())
            .col(ColumnDef::new(TestCases::Title).string().not_null())
            .col(ColumnDef::new(TestCases::Preconditions).text().null())
            .col(ColumnDef::new(TestCases::Steps).json_binary().not_null())
            .col(ColumnDef::new(TestCases::ExpectedResult).text().not_null())
            .col(
                ColumnDef::new(TestCases::Priority)
                    .custom(CasePriorityEnum::Type)
                    .not_null(),
            )
            .col(
                ColumnDef::new(TestCases::Version)
                    .integer()
                    .not_null()
                    .default(1),
            )
            .col(ColumnDef::new(TestCases::CreatedBy).big_integer().null())
            .col(
                ColumnDef::new(TestCases::DeletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_cases_section_id")
                    .from(TestCases::Table, TestCases::SectionId)
                    .to(TestSections::Table, TestSections::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_cases_created_by")
                    .from(TestCases::Table, TestCases::CreatedBy)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        timestamps(&mut test_cases, TestCases::CreatedAt, TestCases::UpdatedAt);
        manager.create_table(test_cases).await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_test_cases_section_id")
                    .table(TestCases::Table)
                    .col(TestCases::SectionId)
                    .to_owned(),
            )
            .await?;

        // test_case_versions (snapshot of the prior state on every update)
        let test_case_versions = Table::create()
            .table(TestCaseVersions::Table)
            .if_not_exists()
            .col(pk_bigint(TestCaseVersions::Id))
            .col(
                ColumnDef::new(TestCaseVersions::CaseId)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(TestCaseVersions::Version)
                    .integer()
                    .not_null(),
            )
            .col(ColumnDef::new(TestCaseVersions::Title).string().not_null())
            .col(ColumnDef::new(TestCaseVersions::Preconditions).text().null())
            .col(
                ColumnDef::new(TestCaseVersions::Steps)
                    .json_binary()
                    .not_null(),
            )
            .col(
                ColumnDef::new(TestCaseVersions::ExpectedResult)
                    .text()
                    .not_null(),
            )
            .col(
                ColumnDef::new(TestCaseVersions::Priority)
                    .custom(CasePriorityEnum::Type)
                    .not_null(),
            )
            .col(
                ColumnDef::new(TestCaseVersions::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_case_versions_case_id")
                    .from(TestCaseVersions::Table, TestCaseVersions::CaseId)
                    .to(TestCases::Table, TestCases::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(test_case_versions).await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_test_case_versions_case_id_version")
                    .table(TestCaseVersions::Table)
                    .col(TestCaseVersions::CaseId)
                    .col(TestCaseVersions::Version)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // milestones (created before test_runs; runs reference them)
        let mut milestones = Table::create()
            .table(Milestones::Table)
            .if_not_exists()
            .col(pk_bigint(Milestones::Id))
            .col(ColumnDef::new(Milestones::ProjectId).big_integer().not_null())
            .col(ColumnDef::new(Milestones::Name).string().not_null())
            .col(ColumnDef::new(Milestones::Description).text().null())
            .col(ColumnDef::new(Milestones::DueDate).date().null())
            .col(
                ColumnDef::new(Milestones::Completed)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Milestones::DeletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_milestones_project_id")
                    .from(Milestones::Table, Milestones::ProjectId)
                    .to(Projects::Table, Projects::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        timestamps(&mut milestones, Milestones::CreatedAt, Milestones::UpdatedAt);
        manager.create_table(milestones).await?;

        // test_runs
        let mut test_runs = Table::create()
            .table(TestRuns::Table)
            .if_not_exists()
            .col(pk_bigint(TestRuns::Id))
            .col(ColumnDef::new(TestRuns::ProjectId).big_integer().not_null())
            .col(ColumnDef::new(TestRuns::MilestoneId).big_integer().null())
            .col(ColumnDef::new(TestRuns::Name).string().not_null())
            .col(
                ColumnDef::new(TestRuns::State)
                    .custom(RunStateEnum::Type)
                    .not_null(),
            )
            .col(ColumnDef::new(TestRuns::CreatedBy).big_integer().null())
            .col(
                ColumnDef::new(TestRuns::CompletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_runs_project_id")
                    .from(TestRuns::Table, TestRuns::ProjectId)
                    .to(Projects::Table, Projects::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_runs_milestone_id")
                    .from(TestRuns::Table, TestRuns::MilestoneId)
                    .to(Milestones::Table, Milestones::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_runs_created_by")
                    .from(TestRuns::Table, TestRuns::CreatedBy)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        timestamps(&mut test_runs, TestRuns::CreatedAt, TestRuns::UpdatedAt);
        manager.create_table(test_runs).await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_test_runs_project_id")
                    .table(TestRuns::Table)
                    .col(TestRuns::ProjectId)
                    .to_owned(),
            )
            .await?;

        // test_results
        let mut test_results = Table::create()
            .table(TestResults::Table)
            .if_not_exists()
            .col(pk_bigint(TestResults::Id))
            .col(ColumnDef::new(TestResults::RunId).big_integer().not_null())
            .col(ColumnDef::new(TestResults::CaseId).big_integer().not_null())
            .col(
                ColumnDef::new(TestResults::Status)
                    .custom(ResultStatusEnum::Type)
                    .not_null(),
            )
            .col(ColumnDef::new(TestResults::Comment).text().null())
            .col(ColumnDef::new(TestResults::ElapsedSeconds).integer().null())
            .col(ColumnDef::new(TestResults::ExecutedBy).big_integer().null())
            .col(
                ColumnDef::new(TestResults::ExecutedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_results_run_id")
                    .from(TestResults::Table, TestResults::RunId)
                    .to(TestRuns::Table, TestRuns::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_results_case_id")
                    .from(TestResults::Table, TestResults::CaseId)
                    .to(TestCases::Table, TestCases::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_results_executed_by")
                    .from(TestResults::Table, TestResults::ExecutedBy)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        timestamps(&mut test_results, TestResults::CreatedAt, TestResults::UpdatedAt);
        manager.create_table(test_results).await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_test_results_run_id_case_id")
                    .table(TestResults::Table)
                    .col(TestResults::RunId)
                    .col(TestResults::CaseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // test_plans
        let mut test_plans = Table::create()
            .table(TestPlans::Table)
            .if_not_exists()
            .col(pk_bigint(TestPlans::Id))
            .col(ColumnDef::new(TestPlans::ProjectId).big_integer().not_null())
            .col(ColumnDef::new(TestPlans::Name).string().not_null())
            .col(ColumnDef::new(TestPlans::Description).text().null())
            .col(
                ColumnDef::new(TestPlans::DeletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_test_plans_project_id")
                    .from(TestPlans::Table, TestPlans::ProjectId)
                    .to(Projects::Table, Projects::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        timestamps(&mut test_plans, TestPlans::CreatedAt, TestPlans::UpdatedAt);
        manager.create_table(test_plans).await?;

        // requirements
        let mut requirements = Table::create()
            .table(Requirements::Table)
            .if_not_exists()
            .col(pk_bigint(Requirements::Id))
            .col(
                ColumnDef::new(Requirements::ProjectId)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(Requirements::ExternalKey).string().not_null())
            .col(ColumnDef::new(Requirements::Title).string().not_null())
            .col(ColumnDef::new(Requirements::Description).text().null())
            .col(
                ColumnDef::new(Requirements::DeletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_requirements_project_id")
                    .from(Requirements::Table, Requirements::ProjectId)
                    .to(Projects::Table, Projects::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        timestamps(
            &mut requirements,
            Requirements::CreatedAt,
            Requirements::UpdatedAt,
        );
        manager.create_table(requirements).await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_requirements_project_id_external_key")
                    .table(Requirements::Table)
                    .col(Requirements::ProjectId)
                    .col(Requirements::ExternalKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // requirement_coverage (requirement <-> test case join)
        let requirement_coverage = Table::create()
            .table(RequirementCoverage::Table)
            .if_not_exists()
            .col(pk_bigint(RequirementCoverage::Id))
            .col(
                ColumnDef::new(RequirementCoverage::RequirementId)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(RequirementCoverage::CaseId)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(RequirementCoverage::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_requirement_coverage_requirement_id")
                    .from(
                        RequirementCoverage::Table,
                        RequirementCoverage::RequirementId,
                    )
                    .to(Requirements::Table, Requirements::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_requirement_coverage_case_id")
                    .from(RequirementCoverage::Table, RequirementCoverage::CaseId)
                    .to(TestCases::Table, TestCases::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(requirement_coverage).await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_requirement_coverage_requirement_id_case_id")
                    .table(RequirementCoverage::Table)
                    .col(RequirementCoverage::RequirementId)
                    .col(RequirementCoverage::CaseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // attachments
        let attachments = Table::create()
            .table(Attachments::Table)
            .if_not_exists()
            .col(pk_bigint(Attachments::Id))
            .col(
                ColumnDef::new(Attachments::OwnerKind)
                    .custom(AttachmentOwnerEnum::Type)
                    .not_null(),
            )
            .col(ColumnDef::new(Attachments::OwnerId).big_integer().not_null())
            .col(ColumnDef::new(Attachments::FileName).string().not_null())
            .col(ColumnDef::new(Attachments::ContentType).string().not_null())
            .col(ColumnDef::new(Attachments::SizeBytes).big_integer().not_null())
            .col(ColumnDef::new(Attachments::StorageKey).string().not_null())
            .col(
                ColumnDef::new(Attachments::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();
        manager.create_table(attachments).await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_attachments_storage_key")
                    .table(Attachments::Table)
                    .col(Attachments::StorageKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_attachments_owner")
                    .table(Attachments::Table)
                    .col(Attachments::OwnerKind)
                    .col(Attachments::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order.
        for table in [
            Table::drop().table(Attachments::Table).to_owned(),
            Table::drop().table(RequirementCoverage::Table).to_owned(),
            Table::drop().table(Requirements::Table).to_owned(),
            Table::drop().table(TestPlans::Table).to_owned(),
            Table::drop().table(TestResults::Table).to_owned(),
            Table::drop().table(TestRuns::Table).to_owned(),
            Table::drop().table(Milestones::Table).to_owned(),
            Table::drop().table(TestCaseVersions::Table).to_owned(),
            Table::drop().table(TestCases::Table).to_owned(),
            Table::drop().table(TestSections::Table).to_owned(),
            Table::drop().table(TestSuites::Table).to_owned(),
            Table::drop().table(Projects::Table).to_owned(),
            Table::drop().table(Users::Table).to_owned(),
            Table::drop().table(Organizations::Table).to_owned(),
        ] {
            manager.drop_table(table).await?;
        }

        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            for type_name in [
                "attachment_owner",
                "result_status",
                "run_state",
                "case_priority",
                "user_role",
            ] {
                manager
                    .get_connection()
                    .execute(Statement::from_string(
                        sea_orm::DatabaseBackend::Postgres,
                        format!("DROP TYPE IF EXISTS {type_name}"),
                    ))
                    .await?;
            }
        }

        Ok(())
    }
}
