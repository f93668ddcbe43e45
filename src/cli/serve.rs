//! Miner serve command

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::cli::ServeArgs;
use crate::config::{parse_device, MinrConfig};
use crate::engine::Executor;
use crate::key::{self, Keypair};
use crate::loader;
use crate::server::{self, auth::AuthState, AppState};
use crate::store::TaskStore;

/// Start the miner
pub async fn serve(args: ServeArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => MinrConfig::from_file(path)?,
        None => MinrConfig::default(),
    };
    apply_overrides(&mut config, &args);

    // Identity comes first: a miner without a key cannot serve.
    let key_path = key::resolve_key_path(&args.keyfile);
    let keypair = Keypair::load(&key_path).with_context(|| {
        format!(
            "cannot start without key file {} (run `minr keygen`)",
            key_path.display()
        )
    })?;
    tracing::info!("Key '{}' loaded ({})", keypair.name(), keypair.fingerprint());

    let device = parse_device(&config.miner.device)?;
    let device_label = if device.is_cuda() { "cuda" } else { "cpu" };
    tracing::info!("Using {} device", device_label);

    let source = loader::detect_model_source(&config.miner.model, &config.miner.revision);
    let files = loader::fetch_model(&source)?;
    let (model, tokenizer, _info) = loader::load_model(&files, config.miner.max_length, &device)?;

    let executor = Executor::new(model, tokenizer, device, config.miner.batch_size)?;
    tracing::info!(
        "Model {} ready (batch size {}, {} positions per prompt)",
        config.miner.model,
        executor.batch_size(),
        executor.max_length()
    );

    let auth = AuthState::new(&config.server)?;
    let store = args.store_tasks.then(|| Arc::new(TaskStore::from_env()));
    if store.is_some() {
        tracing::info!("Task storage enabled");
    }

    let state = Arc::new(AppState {
        executor: Arc::new(executor),
        auth,
        config: config.server.clone(),
        miner_name: config.miner.name.clone(),
        public_key: keypair.public_hex(),
        model: config.miner.model.clone(),
        device: device_label.to_string(),
        store,
        started_at: Instant::now(),
    });

    server::start(state).await
}

fn apply_overrides(config: &mut MinrConfig, args: &ServeArgs) {
    if let Some(name) = &args.name {
        config.miner.name = name.clone();
    }
    if let Some(ip) = &args.ip {
        config.server.host = ip.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(device) = &args.device {
        config.miner.device = device.clone();
    }
    if let Some(batch_size) = args.batch_size {
        config.miner.batch_size = batch_size;
    }
    if let Some(subnet_uid) = args.subnet_uid {
        config.server.subnet_uid = subnet_uid;
    }
    if let Some(model) = &args.model {
        config.miner.model = model.clone();
    }
    if let Some(revision) = &args.revision {
        config.miner.revision = revision.clone();
    }
    if let Some(max_length) = args.max_length {
        config.miner.max_length = max_length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let mut config = MinrConfig::default();
        let args = ServeArgs {
            keyfile: "nya-miner".to_string(),
            config: None,
            name: Some("custom".to_string()),
            ip: Some("127.0.0.1".to_string()),
            port: Some(7000),
            device: None,
            batch_size: Some(8),
            subnet_uid: Some(5),
            model: None,
            revision: None,
            max_length: Some(128),
            store_tasks: false,
        };
        apply_overrides(&mut config, &args);

        assert_eq!(config.miner.name, "custom");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.miner.batch_size, 8);
        assert_eq!(config.server.subnet_uid, 5);
        assert_eq!(config.miner.max_length, 128);
        // Untouched fields keep their configured values
        assert_eq!(config.miner.device, "cuda");
        assert_eq!(config.miner.model, "distilbert/distilbert-base-uncased");
    }
}
