#[cfg(test)]
mod tests {
    use crate::auth::create_calendar_hub;
    use nextdoor_common::NextdoorError;
    use nextdoor_config::GcalConfig;

    #[tokio::test]
    async fn test_missing_key_path_is_a_config_error() {
        let config = GcalConfig::default();
        match create_calendar_hub(&config).await {
            Ok(_) => panic!("Expected an error without a key path"),
            Err(err) => {
                assert!(matches!(err, NextdoorError::ConfigError(_)));
                assert!(err.to_string().contains("key_path"), "got: {}", err);
            }
        }
    }

    #[tokio::test]
    async fn test_unreadable_key_file() {
        let config = GcalConfig {
            key_path: Some("./does-not-exist/service-account.json".to_string()),
            ..Default::default()
        };
        match create_calendar_hub(&config).await {
            Ok(_) => panic!("Expected an error for a missing key file"),
            Err(err) => {
                assert!(matches!(err, NextdoorError::ConfigError(_)));
                assert!(
                    err.to_string().contains("service-account.json"),
                    "Error should name the key file, got: {}",
                    err
                );
            }
        }
    }
}
