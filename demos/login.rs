use access_client::{AuthClient, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Notifications are tracing events, so install a subscriber to see them.
    let _ = tracing_subscriber::fmt().try_init();

    // Expects ACCESS_BASE_URL and ACCESS_STORAGE_DIR.
    let cfg = Config::from_env()?;
    let client = AuthClient::new(cfg)?;

    if client.unauthorized() {
        let user = std::env::var("ACCESS_USERNAME").unwrap_or_else(|_| "test".into());
        let pass = std::env::var("ACCESS_PASSWORD").unwrap_or_else(|_| "123456".into());
        client
            .login(
                &user,
                &pass,
                true,
                |data| println!("token expires at {}", data.expire),
                None,
            )
            .await;
    }

    client
        .dispatcher()
        .get("api/user/info", |info: serde_json::Value| println!("{info}"), None)
        .await;

    client.logout(|| println!("logged out"), None).await;
    Ok(())
}
