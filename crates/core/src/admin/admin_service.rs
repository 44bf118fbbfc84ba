use std::sync::Arc;

use super::admin_model::AdminStats;
use super::admin_traits::{AdminRepositoryTrait, AdminServiceTrait};
use crate::audit::AuditLog;
use crate::auth::require_role;
use crate::constants::{NO_LOGS_PLACEHOLDER, RECENT_USERS_LIMIT, TOP_CATEGORIES_LIMIT};
use crate::errors::Result;
use crate::users::{Role, User};

pub struct AdminService {
    admin_repository: Arc<dyn AdminRepositoryTrait>,
    audit_log: Arc<AuditLog>,
}

impl AdminService {
    pub fn new(admin_repository: Arc<dyn AdminRepositoryTrait>, audit_log: Arc<AuditLog>) -> Self {
        AdminService {
            admin_repository,
            audit_log,
        }
    }

    fn log_text(&self) -> Result<String> {
        Ok(self
            .audit_log
            .read_all()?
            .unwrap_or_else(|| NO_LOGS_PLACEHOLDER.to_string()))
    }
}

impl AdminServiceTrait for AdminService {
    fn stats(&self, acting_user: &User) -> Result<AdminStats> {
        require_role(acting_user, Role::Admin)?;

        Ok(AdminStats {
            total_users: self.admin_repository.count_users()?,
            total_entries: self.admin_repository.count_entries()?,
            total_categories: self.admin_repository.count_distinct_category_names()?,
            top_categories: self
                .admin_repository
                .top_categories(TOP_CATEGORIES_LIMIT)?,
            recent_users: self.admin_repository.recent_users(RECENT_USERS_LIMIT)?,
            logs: self.log_text()?.trim().to_string(),
        })
    }

    fn view_logs(&self, acting_user: &User) -> Result<String> {
        require_role(acting_user, Role::Admin)?;
        self.log_text()
    }
}
