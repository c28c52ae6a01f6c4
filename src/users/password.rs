use anyhow::Context;
use tracing::error;

/// bcrypt work factor used unless `BCRYPT_COST` overrides it.
pub const BCRYPT_COST: u32 = 10;

pub async fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
        .await
        .context("join bcrypt hash task")?
        .map_err(|e| {
            error!(error = %e, "bcrypt hash error");
            anyhow::anyhow!(e.to_string())
        })
}

pub async fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let plain = plain.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
        .await
        .context("join bcrypt verify task")?
        .map_err(|e| {
            error!(error = %e, "bcrypt verify error");
            anyhow::anyhow!(e.to_string())
        })
}
