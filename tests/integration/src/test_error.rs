//! Error handling integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::error::ProvideErrorMetadata;

    use crate::{cleanup_bucket, create_test_bucket, s3_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_no_such_bucket_on_sub_resource() {
        let client = s3_client();
        let bucket = test_bucket_name("ghost");

        let err = client
            .get_bucket_versioning()
            .bucket(&bucket)
            .send()
            .await
            .expect_err("versioning of missing bucket should fail");
        assert_eq!(err.code(), Some("NoSuchBucket"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_no_such_bucket_on_list() {
        let client = s3_client();
        let bucket = test_bucket_name("nolist");

        let result = client.list_objects().bucket(&bucket).send().await;

        assert!(result.is_err(), "list on nonexistent bucket should fail");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_bucket_name() {
        let client = s3_client();

        let err = client
            .create_bucket()
            .bucket("ab")
            .send()
            .await
            .expect_err("short name should fail");
        assert_eq!(err.code(), Some("InvalidBucketName"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_not_implemented_for_objects() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "noobj").await;

        let err = client
            .get_object()
            .bucket(&bucket)
            .key("file.txt")
            .send()
            .await
            .expect_err("object operations are not served");
        assert_eq!(err.code(), Some("NotImplemented"));

        cleanup_bucket(&client, &bucket).await;
    }
}
