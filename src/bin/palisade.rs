use color_eyre::eyre::eyre;
use tokio::net::TcpListener;

use palisade::{
    Argon2PasswordHasher, AuthService, Email, InMemoryResetTokenStore, PostgresUserStore,
    PostmarkEmailClient, RedisRevokedSessionStore, Secret, Settings, configure_postgresql,
    configure_redis, init_tracing,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    init_tracing()?;

    let settings = Settings::load()?;

    let database_url = settings
        .application
        .database_url
        .clone()
        .ok_or_else(|| eyre!("PALISADE__APPLICATION__DATABASE_URL must be set"))?;
    let pool = configure_postgresql(&database_url).await?;
    let user_store = PostgresUserStore::new(pool);

    let redis_host = settings
        .application
        .redis_host
        .clone()
        .ok_or_else(|| eyre!("PALISADE__APPLICATION__REDIS_HOST must be set"))?;
    let redis_conn = configure_redis(&redis_host)?;
    let revoked_sessions =
        RedisRevokedSessionStore::new(redis_conn, settings.session.ttl_seconds.max(0) as u64);

    let sender = settings
        .email
        .sender
        .clone()
        .ok_or_else(|| eyre!("PALISADE__EMAIL__SENDER must be set"))?;
    let authorization_token = settings
        .email
        .authorization_token
        .clone()
        .ok_or_else(|| eyre!("PALISADE__EMAIL__AUTHORIZATION_TOKEN must be set"))?;
    let email_client = PostmarkEmailClient::new(
        settings.email.base_url.clone(),
        Email::parse(Secret::from(sender))?,
        authorization_token,
        reqwest::Client::builder()
            .timeout(settings.email.timeout())
            .build()?,
    );

    let service = AuthService::new(
        user_store,
        Argon2PasswordHasher::new(),
        InMemoryResetTokenStore::new(settings.reset_token.ttl()),
        revoked_sessions,
        email_client,
        settings.lockout.policy(),
        settings.session.token_config(),
    );

    let listener = TcpListener::bind(&settings.application.address).await?;
    service
        .run_standalone(listener, settings.application.allowed_origins())
        .await?;

    Ok(())
}
