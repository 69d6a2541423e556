//! Bucket configuration sub-resource integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::error::ProvideErrorMetadata;
    use aws_sdk_s3::types::{
        BucketCannedAcl, BucketVersioningStatus, IndexDocument, Payer, Permission, Tag, Tagging,
        VersioningConfiguration, WebsiteConfiguration,
    };

    use crate::{cleanup_bucket, create_test_bucket, s3_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_tagging() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "tags").await;

        let err = client
            .get_bucket_tagging()
            .bucket(&bucket)
            .send()
            .await
            .expect_err("no tags yet");
        assert_eq!(err.code(), Some("NoSuchTagSet"));

        let tagging = Tagging::builder()
            .tag_set(Tag::builder().key("env").value("prod").build().expect("tag"))
            .build()
            .expect("tagging");
        client
            .put_bucket_tagging()
            .bucket(&bucket)
            .tagging(tagging)
            .send()
            .await
            .expect("put_bucket_tagging");

        let resp = client
            .get_bucket_tagging()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_tagging");
        assert_eq!(resp.tag_set().len(), 1);
        assert_eq!(resp.tag_set()[0].key(), "env");

        client
            .delete_bucket_tagging()
            .bucket(&bucket)
            .send()
            .await
            .expect("delete_bucket_tagging");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_policy() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "policy").await;
        let policy = r#"{"Version":"2012-10-17","Statement":[]}"#;

        client
            .put_bucket_policy()
            .bucket(&bucket)
            .policy(policy)
            .send()
            .await
            .expect("put_bucket_policy");

        let resp = client
            .get_bucket_policy()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_policy");
        assert_eq!(resp.policy(), Some(policy));

        let err = client
            .put_bucket_policy()
            .bucket(&bucket)
            .policy("not json")
            .send()
            .await
            .expect_err("invalid policy");
        assert_eq!(err.code(), Some("MalformedPolicy"));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_enable_versioning() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "versioning").await;

        let before = client
            .get_bucket_versioning()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_versioning");
        assert!(before.status().is_none());

        client
            .put_bucket_versioning()
            .bucket(&bucket)
            .versioning_configuration(
                VersioningConfiguration::builder()
                    .status(BucketVersioningStatus::Enabled)
                    .build(),
            )
            .send()
            .await
            .expect("put_bucket_versioning");

        let after = client
            .get_bucket_versioning()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_versioning");
        assert_eq!(after.status(), Some(&BucketVersioningStatus::Enabled));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_apply_canned_acl() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "acl").await;

        client
            .put_bucket_acl()
            .bucket(&bucket)
            .acl(BucketCannedAcl::PublicRead)
            .send()
            .await
            .expect("put_bucket_acl");

        let resp = client
            .get_bucket_acl()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_acl");
        let permissions: Vec<_> = resp.grants().iter().filter_map(|g| g.permission()).collect();
        assert!(permissions.contains(&&Permission::FullControl));
        assert!(permissions.contains(&&Permission::Read));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_website() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "website").await;

        client
            .put_bucket_website()
            .bucket(&bucket)
            .website_configuration(
                WebsiteConfiguration::builder()
                    .index_document(
                        IndexDocument::builder()
                            .suffix("index.html")
                            .build()
                            .expect("index document"),
                    )
                    .build(),
            )
            .send()
            .await
            .expect("put_bucket_website");

        let resp = client
            .get_bucket_website()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_website");
        assert_eq!(
            resp.index_document().map(IndexDocument::suffix),
            Some("index.html")
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_bucket_owner_payer() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "payer").await;

        let resp = client
            .get_bucket_request_payment()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_request_payment");
        assert_eq!(resp.payer(), Some(&Payer::BucketOwner));

        cleanup_bucket(&client, &bucket).await;
    }
}
