// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

#[tokio::main]
async fn main() {
    use log::error;
    use std::panic;

    swapwatch_common::telemetry::init_logging();
    panic::set_hook(Box::new(|panic| error!(panic:%; "process panicked")));

    if let Err(error) = run().await {
        let error = format!("{error:#}");
        error!(error; "process exited with ERROR");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    use anyhow::Context;
    use log::info;
    use redb::Database;
    use std::sync::Arc;
    use swapwatch_api::{
        application,
        config::Config,
        infra::{
            self, IndexCleanupHook,
            api::{AppState, AxumApi},
        },
    };
    use swapwatch_common::{config::ConfigExt, telemetry};
    use swapwatch_index::infra::{FilterSync, RedbWalletIndex};
    use swapwatch_room::infra::{RedbRoomStorage, RoomRegistry, TelegramNotifier};
    use tokio::signal::unix::{SignalKind, signal};

    let sigterm = signal(SignalKind::terminate()).expect("SIGTERM handler can be registered");
    let config = Config::load().context("load configuration")?;
    info!(config:?; "starting");
    let Config {
        infra_config,
        telemetry_config,
    } = config;

    telemetry::init_metrics(telemetry_config.metrics_config);

    let infra::Config {
        api_config,
        storage_config,
        webhook_config,
        provider_config,
        outbound_config,
    } = infra_config;

    let db = Database::create(&storage_config.path).context("open database")?;
    RedbRoomStorage::init(&db).context("create room tables")?;
    RedbWalletIndex::init(&db).context("create index tables")?;
    let db = Arc::new(db);

    let index = RedbWalletIndex::new(db.clone());
    let filter_sync = FilterSync::new(
        index.clone(),
        provider_config,
        outbound_config.filter_sync_timeout,
    )
    .context("create filter sync client")?;
    let notifier =
        TelegramNotifier::new(outbound_config.push_timeout).context("create push client")?;
    let hook = IndexCleanupHook::new(index.clone(), filter_sync.clone());
    let registry = RoomRegistry::new(db, notifier, hook);

    let restored = registry.restore().await.context("restore persisted rooms")?;
    info!(restored; "rooms restored");

    let state = AppState {
        registry,
        index,
        filter_sync,
        webhook_secret: Arc::new(webhook_config.secret),
    };
    let api = AxumApi::new(api_config, state);

    application::run(api, sigterm).await
}
