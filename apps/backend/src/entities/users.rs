use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    #[sea_orm(string_value = "TESTER")]
    Tester,
    #[sea_orm(string_value = "VIEWER")]
    Viewer,
}

impl UserRole {
    fn rank(self) -> u8 {
        match self {
            UserRole::Admin => 3,
            UserRole::Manager => 2,
            UserRole::Tester => 1,
            UserRole::Viewer => 0,
        }
    }

    /// Whether this role grants at least the privileges of `required`.
    pub fn at_least(self, required: UserRole) -> bool {
        self.rank() >= required.rank()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "org_id")]
    pub org_id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    #[sea_orm(column_name = "password_hash")]
    pub password_hash: String,
    #[sea_orm(column_name = "display_name")]
    pub display_name: String,
    pub role: UserRole,
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
        belongs_to = "super::organizations::Entity",
        from = "Column::OrgId",
        to = "super::organizations::Column::Id"
    )]
    Organization,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::UserRole;

    #[test]
    fn role_ordering() {
        assert!(UserRole::Admin.at_least(UserRole::Manager));
        assert!(UserRole::Manager.at_least(UserRole::Tester));
        assert!(UserRole::Tester.at_least(UserRole::Viewer));
        assert!(!UserRole::Viewer.at_least(UserRole::Tester));
        assert!(!UserRole::Tester.at_least(UserRole::Manager));
        assert!(UserRole::Tester.at_least(UserRole::Tester));
    }
}
