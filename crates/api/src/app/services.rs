use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use sqlx::PgPool;
use tracing::{info, warn};

use invoicedesk_auth::{
    CredentialsProvider, Hs256SessionCodec, IdentityProvider, InMemoryUserDirectory,
    UserDirectory,
};
use invoicedesk_infra::{
    InMemoryInvoiceStore, InMemoryViewCache, InvoiceActions, InvoiceStore, PostgresInvoiceStore,
    PostgresUserDirectory, Settings, db,
};

pub type Actions = InvoiceActions<Arc<dyn InvoiceStore>, Arc<InMemoryViewCache>>;

/// Everything the handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub actions: Actions,
    pub views: Arc<InMemoryViewCache>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: Arc<Hs256SessionCodec>,
    pub session_ttl: Duration,
    pub secure_cookies: bool,
    pool: Option<PgPool>,
}

impl AppServices {
    /// Wire services over an explicit store and user directory.
    pub fn from_parts(
        settings: &Settings,
        store: Arc<dyn InvoiceStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> anyhow::Result<Self> {
        let session_ttl = Duration::try_minutes(settings.session_ttl_minutes)
            .context("SESSION_TTL_MINUTES out of range")?;
        let views = Arc::new(InMemoryViewCache::new());

        Ok(Self {
            actions: InvoiceActions::new(store, views.clone()),
            views,
            identity: Arc::new(CredentialsProvider::new(directory)),
            sessions: Arc::new(Hs256SessionCodec::new(
                settings.session_secret.as_bytes(),
                session_ttl,
            )),
            session_ttl,
            secure_cookies: settings.session_cookie_secure,
            pool: None,
        })
    }

    /// Pool backing the stores, when running against Postgres.
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }
}

/// Build services from settings: Postgres when `DATABASE_URL` is set,
/// in-memory stores otherwise.
pub async fn build_services(settings: &Settings) -> anyhow::Result<AppServices> {
    let Some(pool) = db::connect(settings)
        .await
        .context("failed to connect to postgres")?
    else {
        warn!("DATABASE_URL not set; using in-memory stores (no users can sign in)");
        return AppServices::from_parts(
            settings,
            Arc::new(InMemoryInvoiceStore::new()),
            Arc::new(InMemoryUserDirectory::new()),
        );
    };

    let invoices = PostgresInvoiceStore::new(pool.clone());
    invoices
        .ensure_schema()
        .await
        .context("failed to prepare invoices table")?;
    let users = PostgresUserDirectory::new(pool.clone());
    users
        .ensure_schema()
        .await
        .context("failed to prepare users table")?;
    info!("using postgres stores");

    let mut services = AppServices::from_parts(settings, Arc::new(invoices), Arc::new(users))?;
    services.pool = Some(pool);
    Ok(services)
}
