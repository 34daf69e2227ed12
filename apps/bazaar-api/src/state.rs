use std::sync::Arc;

use bazaar_config::Config;
use bazaar_service::BazaarService;
use bazaar_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<BazaarService>,
}
impl AppState {
	/// Connects to Postgres and makes sure the discovery tables exist.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::with_service(BazaarService::new(config, Arc::new(db))))
	}

	pub fn with_service(service: BazaarService) -> Self {
		Self { service: Arc::new(service) }
	}
}
