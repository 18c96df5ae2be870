use std::fs::File;

use jwt_simple::prelude::HS256Key;
use pengajuan_axum::{schema, start_server};
use pengajuan_core::{models::Session, ports::RequirementRepository as _};
use pengajuan_demo::{
    AppConfig, Cli, Commands,
    impls::{DemoApp, mint_token},
};
use pengajuan_sqlite::Db;
use tokio::select;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // By convention, we leverage `tracing` to instrument and log various
    // operations throughout this project.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI args and extract the JWT key
    let cli = Cli::import()?;
    let key = HS256Key::from_bytes(cli.secret.as_bytes());

    if let Some(Commands::Token {
        sub,
        role,
        office,
        name,
        hours,
    }) = &cli.command
    {
        let session = Session {
            user_id: *sub,
            name: name.clone(),
            role: (*role).into(),
            office_id: *office,
        };
        println!("{}", mint_token(&key, &session, *hours)?);
        return Ok(());
    }

    // If requested, dump the schema and exit.
    if let Some(path) = &cli.schema {
        serde_json::to_writer_pretty(File::create(path)?, &schema::<DemoApp>())?;
        return Ok(());
    }

    // Create config with proper layering of CLI args
    let AppConfig {
        server,
        database,
        requirements,
    } = AppConfig::load(&cli)?;

    let db = Db::open(&database).await?;

    // The configured lists win over whatever an earlier run stored
    for (job_type, required) in requirements {
        db.set_required_files(&job_type, required).await?;
        tracing::info!(job_type = job_type.as_str(), "seeded required files");
    }

    let app = DemoApp { db, key };
    let server_task = tokio::spawn(async move { start_server(server, app).await });

    select! {
        r = server_task => r??,
        r = tokio::signal::ctrl_c() => {
            r?;
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
