//! CORS configuration integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::error::ProvideErrorMetadata;
    use aws_sdk_s3::types::{CorsConfiguration, CorsRule};

    use crate::{cleanup_bucket, create_test_bucket, s3_client};

    fn cors_config(origin: &str, methods: &[&str]) -> CorsConfiguration {
        let mut rule = CorsRule::builder().allowed_origins(origin).max_age_seconds(3600);
        for method in methods {
            rule = rule.allowed_methods(*method);
        }
        CorsConfiguration::builder()
            .cors_rules(rule.build().expect("build cors rule"))
            .build()
            .expect("build cors config")
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_and_get_cors() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "cors").await;

        client
            .put_bucket_cors()
            .bucket(&bucket)
            .cors_configuration(cors_config("https://example.com", &["GET", "PUT"]))
            .send()
            .await
            .expect("put_bucket_cors");

        let resp = client
            .get_bucket_cors()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_cors");

        let rules = resp.cors_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].allowed_methods(), ["GET", "PUT"]);
        assert_eq!(rules[0].max_age_seconds(), Some(3600));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_unknown_cors_method() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "badcors").await;

        let err = client
            .put_bucket_cors()
            .bucket(&bucket)
            .cors_configuration(cors_config("*", &["PATCH"]))
            .send()
            .await
            .expect_err("PATCH is not a CORS method");
        assert_eq!(err.code(), Some("MalformedXML"));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_cors() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "delcors").await;

        client
            .put_bucket_cors()
            .bucket(&bucket)
            .cors_configuration(cors_config("*", &["GET"]))
            .send()
            .await
            .expect("put cors");

        client
            .delete_bucket_cors()
            .bucket(&bucket)
            .send()
            .await
            .expect("delete cors");

        let err = client
            .get_bucket_cors()
            .bucket(&bucket)
            .send()
            .await
            .expect_err("get_cors after delete should fail");
        assert_eq!(err.code(), Some("NoSuchCORSConfiguration"));

        cleanup_bucket(&client, &bucket).await;
    }
}
