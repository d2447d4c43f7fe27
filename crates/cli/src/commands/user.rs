//! Shopper account management command.

use gilded_storefront::services::AuthService;

use super::CommandError;

/// Create a shopper account.
pub async fn create(username: &str, email: &str, password: &str) -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let user = AuthService::new(&pool)
        .register(username, email, password, password)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Account created");
    Ok(())
}
