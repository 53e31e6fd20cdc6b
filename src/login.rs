//! One end-user login: device code, user-scoped fetches and the locker.
//!
//! The HTTP session lives exactly as long as `LoginFlow::run`; it is closed
//! on success, on error and on cancellation. Calls that only depend on the
//! user token run concurrently.

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::epic::{
    self, AccountMetadata, AuthenticatedUser, DeviceCodeChallenge, PublicAccountInfo,
};
use crate::errors::{EpicError, EpicResult};
use crate::http::{ClientCredentials, EpicSession, EpicTransport, HttpTransport};
use crate::locker::{LockerAggregator, LockerSnapshot, ReferenceLists};
use crate::logger::{self, LogTag};
use crate::paths::resolve_data_path;
use crate::profile::{
    owned_banner_ids, parse_common_profile, summarize_seasons, PurchaseSummary, SeasonSummary,
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Front-end hooks called while a login is in progress
#[async_trait]
pub trait LoginObserver: Send + Sync {
    /// The user must open `challenge.verification_url` before it expires
    async fn on_challenge(&self, challenge: &DeviceCodeChallenge);

    async fn on_authenticated(&self, _user: &AuthenticatedUser) {}
}

/// Everything one login produced
#[derive(Debug, Clone)]
pub struct LoginReport {
    pub user: AuthenticatedUser,
    pub account: AccountMetadata,
    pub public_info: PublicAccountInfo,
    pub purchases: PurchaseSummary,
    pub seasons: SeasonSummary,
    pub locker: LockerSnapshot,
}

pub struct LoginFlow {
    transport: Arc<dyn EpicTransport>,
    catalog: CatalogClient,
    lists: ReferenceLists,
    switch_credentials: ClientCredentials,
    ios_credentials: ClientCredentials,
    poll_interval: Duration,
}

impl LoginFlow {
    pub fn new(
        transport: Arc<dyn EpicTransport>,
        catalog: CatalogClient,
        lists: ReferenceLists,
        config: &Config,
    ) -> Self {
        Self {
            transport,
            catalog,
            lists,
            switch_credentials: ClientCredentials::from_encoded(
                config.epic.switch_client_token.clone(),
            ),
            ios_credentials: ClientCredentials::from_encoded(config.epic.ios_client_token.clone()),
            poll_interval: Duration::from_secs(config.epic.poll_interval_secs.max(1)),
        }
    }

    /// Fresh transports and reference lists read from disk
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let transport =
            HttpTransport::new(&config.epic.user_agent, config.epic.request_timeout_secs)?;
        let catalog = CatalogClient::from_config(&config.catalog)?;
        let lists = ReferenceLists::load(
            &resolve_data_path(&config.locker.exclusive_list_path),
            &resolve_data_path(&config.locker.popular_list_path),
        );
        Ok(Self::new(Arc::new(transport), catalog, lists, config))
    }

    pub async fn run(
        &self,
        label: &str,
        observer: &dyn LoginObserver,
        cancel: &CancellationToken,
    ) -> EpicResult<LoginReport> {
        let session = EpicSession::open(
            label,
            self.transport.clone(),
            self.switch_credentials.clone(),
            self.ios_credentials.clone(),
        );

        let result = self.run_in_session(&session, observer, cancel).await;
        match &result {
            Ok(report) => logger::info(
                LogTag::Login,
                &format!(
                    "Login {} finished for {} ({} warning(s))",
                    label,
                    report.user.display_name,
                    report.locker.warnings.len()
                ),
            ),
            Err(EpicError::Cancelled) => {
                logger::info(LogTag::Login, &format!("Login {} cancelled", label))
            }
            Err(e) if e.is_user_facing() => {
                logger::info(LogTag::Login, &format!("Login {} ended: {}", label, e))
            }
            Err(e) => logger::error(LogTag::Login, &format!("Login {} failed: {}", label, e)),
        }

        session.close();
        result
    }

    async fn run_in_session(
        &self,
        session: &EpicSession,
        observer: &dyn LoginObserver,
        cancel: &CancellationToken,
    ) -> EpicResult<LoginReport> {
        let challenge = epic::create_device_code(session).await?;
        observer.on_challenge(&challenge).await;

        let user =
            epic::poll_until_authorized(session, &challenge, self.poll_interval, cancel).await?;
        observer.on_authenticated(&user).await;

        let (account, public_info, common, athena) = tokio::select! {
            _ = cancel.cancelled() => return Err(EpicError::Cancelled),
            fetched = async {
                tokio::join!(
                    epic::get_account_metadata(session, &user),
                    epic::get_public_account_info(session, &user),
                    retry_once("common_core profile", || epic::get_common_profile(session, &user)),
                    retry_once("athena profile", || epic::get_athena_profile(session, &user)),
                )
            } => fetched,
        };

        // An invalid account outranks whatever the profile calls returned
        let account = account?;
        let public_info = public_info.unwrap_or_else(|e| {
            logger::warning(
                LogTag::Login,
                &format!("Public account info unavailable: {}", e),
            );
            PublicAccountInfo::degraded(format!("Error fetching account info ({})", e))
        });
        let common = common?;
        let athena = athena?;

        let purchases = parse_common_profile(&common);
        let banners = owned_banner_ids(&common);
        let seasons = summarize_seasons(&athena);

        let aggregator = LockerAggregator::new(&self.catalog, &self.lists);
        let locker = tokio::select! {
            _ = cancel.cancelled() => return Err(EpicError::Cancelled),
            locker = aggregator.build_snapshot(&athena, &banners) => locker,
        };

        Ok(LoginReport {
            user,
            account,
            public_info,
            purchases,
            seasons,
            locker,
        })
    }
}

/// One-shot calls get a single retry on transient upstream failures
async fn retry_once<T, F, Fut>(what: &str, mut call: F) -> EpicResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = EpicResult<T>>,
{
    match call().await {
        Err(e) if e.is_recoverable() => {
            logger::warning(
                LogTag::Login,
                &format!("{} failed, retrying once: {}", what, e),
            );
            call().await
        }
        result => result,
    }
}
