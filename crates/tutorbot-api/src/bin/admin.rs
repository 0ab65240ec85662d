//! Tutorbot maintenance tool.
//!
//! Binary name: `tutorbot-admin`
//!
//! Opens the history database (creating the table if missing) and shows the
//! admin menu. Only the database URL is resolved, so neither an API key nor
//! valid tutor settings are needed.

use tutorbot_api::cli::admin::run_admin_menu;
use tutorbot_api::state::open_history;
use tutorbot_infra::config::load_database_url;
use tutorbot_infra::filesystem::resolve_data_dir;
use tutorbot_observe::tracing_setup::{init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_tracing("warn", false).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = async {
        let data_dir = resolve_data_dir();
        let database_url = load_database_url(&data_dir).await;
        let (db_pool, history) = open_history(&data_dir, &database_url).await?;
        run_admin_menu(&history).await?;
        db_pool.close().await;
        anyhow::Ok(())
    }
    .await;

    shutdown_tracing();
    result
}
