//! Bucket CRUD integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};

    use crate::{cleanup_bucket, create_test_bucket, s3_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_delete_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "create").await;

        let head = client.head_bucket().bucket(&bucket).send().await;
        assert!(head.is_ok(), "head_bucket should succeed");

        cleanup_bucket(&client, &bucket).await;

        let head = client.head_bucket().bucket(&bucket).send().await;
        assert!(head.is_err(), "head_bucket should fail after delete");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_empty_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "list").await;

        let resp = client
            .list_objects()
            .bucket(&bucket)
            .send()
            .await
            .expect("list_objects");
        assert_eq!(resp.name(), Some(bucket.as_str()));
        assert!(resp.contents().is_empty());
        assert_eq!(resp.max_keys(), Some(1000));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_get_classic_bucket_location() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "location").await;

        let resp = client
            .get_bucket_location()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_location");
        assert!(resp.location_constraint().is_none_or(|loc| loc.as_str().is_empty()));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_get_regional_bucket_location() {
        let client = s3_client();
        let bucket = test_bucket_name("regional");

        client
            .create_bucket()
            .bucket(&bucket)
            .create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::EuWest1)
                    .build(),
            )
            .send()
            .await
            .expect("create regional bucket");

        let resp = client
            .get_bucket_location()
            .bucket(&bucket)
            .send()
            .await
            .expect("get_bucket_location");
        assert_eq!(
            resp.location_constraint(),
            Some(&BucketLocationConstraint::EuWest1)
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_duplicate_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "dup").await;

        let result = client.create_bucket().bucket(&bucket).send().await;
        assert!(result.is_err(), "duplicate bucket should fail");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_recreate_bucket_after_delete() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "recreate").await;

        cleanup_bucket(&client, &bucket).await;

        client
            .create_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("recreate bucket");

        let head = client.head_bucket().bucket(&bucket).send().await;
        assert!(head.is_ok());

        cleanup_bucket(&client, &bucket).await;
    }
}
