use mongodb::Client;

/// Readiness probe: `ping` against the admin database.
pub async fn check_health(client: &Client) -> Result<(), mongodb::error::Error> {
    super::connector::ping(client).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_check_health() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        assert!(check_health(&client).await.is_ok());
    }
}
