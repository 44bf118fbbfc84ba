use std::sync::Arc;

use smartbudget_core::{
    admin::{AdminService, AdminServiceTrait},
    audit::AuditLog,
    auth::{AuthService, AuthServiceTrait},
    categories::{CategoryService, CategoryServiceTrait},
    entries::{EntryService, EntryServiceTrait},
    users::Role,
};
use smartbudget_storage_sqlite::{
    db, AdminRepository, CategoryRepository, EntryRepository, SessionRepository, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    auth::{decode_secret_key, random_secret_key, SessionManager},
    config::Config,
};

pub struct AppState {
    pub auth_service: Arc<dyn AuthServiceTrait>,
    pub entry_service: Arc<dyn EntryServiceTrait>,
    pub category_service: Arc<dyn CategoryServiceTrait>,
    pub admin_service: Arc<dyn AdminServiceTrait>,
    pub sessions: Arc<SessionManager>,
    pub audit_log: Arc<AuditLog>,
    /// Accounts registered with this email are promoted to admin.
    pub admin_email: Option<String>,
}

impl AppState {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_email
            .as_deref()
            .is_some_and(|admin| admin.eq_ignore_ascii_case(email.trim()))
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("SB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);
    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let session_repository = Arc::new(SessionRepository::new(pool.clone(), writer.clone()));
    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let entry_repository = Arc::new(EntryRepository::new(pool.clone(), writer.clone()));
    let admin_repository = Arc::new(AdminRepository::new(pool.clone()));

    let audit_log = Arc::new(AuditLog::new(&config.audit_log_path));

    let session_ttl = chrono::Duration::from_std(config.session_ttl)?;
    let auth_service = Arc::new(AuthService::new(
        user_repository,
        session_repository,
        session_ttl,
    ));
    let purged = auth_service.purge_expired_sessions().await?;
    if purged > 0 {
        tracing::info!("Removed {} expired sessions", purged);
    }
    let category_service = Arc::new(CategoryService::new(category_repository.clone()));
    let entry_service = Arc::new(EntryService::new(entry_repository, category_repository));
    let admin_service = Arc::new(AdminService::new(admin_repository, audit_log.clone()));

    let secret = match &config.secret_key {
        Some(raw) => decode_secret_key(raw)?,
        None => {
            tracing::warn!(
                "SB_SECRET_KEY is not set; sessions will not survive a restart of this process"
            );
            random_secret_key()
        }
    };
    let sessions = Arc::new(SessionManager::new(
        &secret,
        config.session_ttl,
        config.cookie_secure,
    ));

    if let Some(email) = &config.admin_email {
        if auth_service.set_role(email, Role::Admin).await? {
            tracing::info!("Granted admin role to {}", email);
        } else {
            tracing::info!("{} will be granted admin role on registration", email);
        }
    }

    audit_log.record_or_log("SmartBudget app started.");

    Ok(Arc::new(AppState {
        auth_service,
        entry_service,
        category_service,
        admin_service,
        sessions,
        audit_log,
        admin_email: config.admin_email.clone(),
    }))
}
