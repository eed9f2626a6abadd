//! Account entity <-> model mapper

use lumen_core::entities::Account;
use lumen_core::value_objects::Snowflake;

use crate::models::AccountModel;

impl From<AccountModel> for Account {
    fn from(model: AccountModel) -> Self {
        Account {
            id: Snowflake::new(model.id),
            username: model.username,
            display_name: model.display_name,
            avatar: model.avatar,
            is_private: model.is_private,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
