use nutrition_core::control::NutritionControlPlane;
use nutrition_core::import::{ImportError, ImportOptions, import_tsv_file};
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::config::NutritionConfig;

/// Opens the configured store and selects the namespace and database.
pub async fn open_control_plane(
    config: &NutritionConfig,
) -> Result<NutritionControlPlane<Any>, surrealdb::Error> {
    let endpoint = config.db_endpoint();
    info!(
        endpoint,
        namespace = %config.db_namespace,
        database = %config.db_name,
        "connecting to food store"
    );
    let db: Surreal<Any> = connect(endpoint).await?;

    if config.is_remote()
        && let (Some(username), Some(password)) =
            (config.db_username.as_ref(), config.db_password.as_ref())
    {
        db.signin(Root {
            username: username.as_str(),
            password: password.as_str(),
        })
        .await?;
    }

    db.use_ns(&config.db_namespace)
        .use_db(&config.db_name)
        .await?;

    Ok(NutritionControlPlane::new(db))
}

/// Loads the configured dataset export, if any.
pub async fn import_configured_dataset(
    control: &NutritionControlPlane<Any>,
    config: &NutritionConfig,
) -> Result<(), ImportError> {
    let Some(path) = config.import_path.as_deref() else {
        return Ok(());
    };
    let report = import_tsv_file(control.store(), path, ImportOptions::default()).await?;
    info!(
        path = %path.display(),
        imported = report.rows_imported,
        skipped = report.rows_skipped,
        "dataset loaded"
    );
    Ok(())
}
