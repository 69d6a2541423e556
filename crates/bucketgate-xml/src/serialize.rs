//! S3 XML serialization: converting configuration documents to S3-compatible XML.
//!
//! Documents are written compactly (no indentation) so the same value always
//! produces the same bytes.

use std::io::{self, Write};

use bucketgate_model::output::{ListObjectsOutput, LocationOutput};
use bucketgate_model::types::{
    AccelerateConfiguration, AccessControlPolicy, BucketLoggingStatus, CORSConfiguration,
    CORSRule, CommonPrefix, Grant, Grantee, LifecycleConfiguration, LifecycleRule,
    NotificationConfiguration, NotificationTarget, Object, Owner, ReplicationConfiguration,
    ReplicationRule, RequestPaymentConfiguration, RoutingRule, Tag, Tagging, Transition,
    VersioningConfiguration, WebsiteConfiguration,
};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::XmlError;

/// The S3 XML namespace.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// The XML declaration that starts every document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Trait for serializing S3 types to XML.
///
/// Implementors write their content as child elements inside the current XML context.
/// The root element name and namespace are handled by [`to_xml`].
pub trait S3Serialize {
    /// Serialize this value as XML child elements into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing to the underlying writer fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Serialize a value as a complete S3 XML document: declaration, then the
/// root element in the S3 namespace wrapping the value's content.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn to_xml<T: S3Serialize>(root_element: &str, value: &T) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element(root_element)
        .with_attribute(("xmlns", S3_NAMESPACE))
        .write_inner_content(|w| value.serialize_xml(w))?;

    Ok(buf)
}

// ---------------------------------------------------------------------------
// Helper functions for writing common XML patterns
// ---------------------------------------------------------------------------

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn write_optional_text<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, v)?;
    }
    Ok(())
}

fn write_bool<W: Write>(writer: &mut Writer<W>, tag: &str, value: bool) -> io::Result<()> {
    write_text_element(writer, tag, if value { "true" } else { "false" })
}

fn write_optional_bool<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<bool>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_bool(writer, tag, v)?;
    }
    Ok(())
}

fn write_optional_i32<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<i32>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, &v.to_string())?;
    }
    Ok(())
}

/// Format a `DateTime<Utc>` as ISO 8601 with milliseconds and `Z` suffix.
fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

// ---------------------------------------------------------------------------
// ACL
// ---------------------------------------------------------------------------

impl S3Serialize for Owner {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Owner").write_inner_content(|w| {
            write_optional_text(w, "ID", self.id.as_deref())?;
            write_optional_text(w, "DisplayName", self.display_name.as_deref())?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for Grantee {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("Grantee")
            .with_attribute(("xmlns:xsi", XSI_NAMESPACE))
            .with_attribute(("xsi:type", self.grantee_type.as_str()))
            .write_inner_content(|w| {
                write_optional_text(w, "ID", self.id.as_deref())?;
                write_optional_text(w, "DisplayName", self.display_name.as_deref())?;
                write_optional_text(w, "EmailAddress", self.email_address.as_deref())?;
                write_optional_text(w, "URI", self.uri.as_deref())?;
                Ok(())
            })?;
        Ok(())
    }
}

impl S3Serialize for Grant {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Grant").write_inner_content(|w| {
            self.grantee.serialize_xml(w)?;
            write_text_element(w, "Permission", self.permission.as_str())
        })?;
        Ok(())
    }
}

impl S3Serialize for AccessControlPolicy {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(ref owner) = self.owner {
            owner.serialize_xml(writer)?;
        }
        writer
            .create_element("AccessControlList")
            .write_inner_content(|w| {
                for grant in &self.grants {
                    grant.serialize_xml(w)?;
                }
                Ok(())
            })?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CORS, tagging, logging, versioning
// ---------------------------------------------------------------------------

impl S3Serialize for CORSRule {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("CORSRule").write_inner_content(|w| {
            write_optional_text(w, "ID", self.id.as_deref())?;
            for header in &self.allowed_headers {
                write_text_element(w, "AllowedHeader", header)?;
            }
            for method in &self.allowed_methods {
                write_text_element(w, "AllowedMethod", method)?;
            }
            for origin in &self.allowed_origins {
                write_text_element(w, "AllowedOrigin", origin)?;
            }
            for header in &self.expose_headers {
                write_text_element(w, "ExposeHeader", header)?;
            }
            write_optional_i32(w, "MaxAgeSeconds", self.max_age_seconds)?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for CORSConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for rule in &self.cors_rules {
            rule.serialize_xml(writer)?;
        }
        Ok(())
    }
}

impl S3Serialize for Tag {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Tag").write_inner_content(|w| {
            write_text_element(w, "Key", &self.key)?;
            write_text_element(w, "Value", &self.value)?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for Tagging {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("TagSet").write_inner_content(|w| {
            for tag in &self.tag_set {
                tag.serialize_xml(w)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for BucketLoggingStatus {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(ref enabled) = self.logging_enabled {
            writer
                .create_element("LoggingEnabled")
                .write_inner_content(|w| {
                    write_text_element(w, "TargetBucket", &enabled.target_bucket)?;
                    write_text_element(w, "TargetPrefix", &enabled.target_prefix)?;
                    Ok(())
                })?;
        }
        Ok(())
    }
}

impl S3Serialize for VersioningConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_optional_text(writer, "Status", self.status.as_ref().map(|s| s.as_str()))?;
        write_optional_text(
            writer,
            "MfaDelete",
            self.mfa_delete.as_ref().map(|s| s.as_str()),
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

fn write_notification_target<W: Write>(
    writer: &mut Writer<W>,
    element: &str,
    arn_element: &str,
    target: &NotificationTarget,
) -> io::Result<()> {
    writer.create_element(element).write_inner_content(|w| {
        write_optional_text(w, "Id", target.id.as_deref())?;
        write_text_element(w, arn_element, &target.arn)?;
        for event in &target.events {
            write_text_element(w, "Event", event)?;
        }
        if !target.filter_rules.is_empty() {
            w.create_element("Filter").write_inner_content(|w| {
                w.create_element("S3Key").write_inner_content(|w| {
                    for rule in &target.filter_rules {
                        w.create_element("FilterRule").write_inner_content(|w| {
                            write_text_element(w, "Name", &rule.name)?;
                            write_text_element(w, "Value", &rule.value)
                        })?;
                    }
                    Ok(())
                })?;
                Ok(())
            })?;
        }
        Ok(())
    })?;
    Ok(())
}

impl S3Serialize for NotificationConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for target in &self.topic_configurations {
            write_notification_target(writer, "TopicConfiguration", "Topic", target)?;
        }
        for target in &self.queue_configurations {
            write_notification_target(writer, "QueueConfiguration", "Queue", target)?;
        }
        for target in &self.lambda_function_configurations {
            write_notification_target(writer, "CloudFunctionConfiguration", "CloudFunction", target)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl S3Serialize for Transition {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Transition").write_inner_content(|w| {
            write_optional_text(w, "Date", self.date.as_deref())?;
            write_optional_i32(w, "Days", self.days)?;
            write_optional_text(w, "StorageClass", self.storage_class.as_deref())?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for LifecycleRule {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Rule").write_inner_content(|w| {
            write_optional_text(w, "ID", self.id.as_deref())?;
            if let Some(ref filter) = self.filter {
                w.create_element("Filter").write_inner_content(|w| {
                    write_optional_text(w, "Prefix", filter.prefix.as_deref())
                })?;
            } else {
                write_optional_text(w, "Prefix", self.prefix.as_deref())?;
            }
            write_text_element(w, "Status", self.status.as_str())?;
            for transition in &self.transitions {
                transition.serialize_xml(w)?;
            }
            if let Some(ref expiration) = self.expiration {
                w.create_element("Expiration").write_inner_content(|w| {
                    write_optional_text(w, "Date", expiration.date.as_deref())?;
                    write_optional_i32(w, "Days", expiration.days)?;
                    write_optional_bool(
                        w,
                        "ExpiredObjectDeleteMarker",
                        expiration.expired_object_delete_marker,
                    )?;
                    Ok(())
                })?;
            }
            if let Some(days) = self.noncurrent_version_expiration_days {
                w.create_element("NoncurrentVersionExpiration")
                    .write_inner_content(|w| {
                        write_text_element(w, "NoncurrentDays", &days.to_string())
                    })?;
            }
            if let Some(days) = self.abort_incomplete_multipart_upload_days {
                w.create_element("AbortIncompleteMultipartUpload")
                    .write_inner_content(|w| {
                        write_text_element(w, "DaysAfterInitiation", &days.to_string())
                    })?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for LifecycleConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for rule in &self.rules {
            rule.serialize_xml(writer)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Replication
// ---------------------------------------------------------------------------

impl S3Serialize for ReplicationRule {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Rule").write_inner_content(|w| {
            write_optional_text(w, "ID", self.id.as_deref())?;
            write_optional_i32(w, "Priority", self.priority)?;
            write_optional_text(w, "Prefix", self.prefix.as_deref())?;
            write_text_element(w, "Status", self.status.as_str())?;
            w.create_element("Destination").write_inner_content(|w| {
                write_text_element(w, "Bucket", &self.destination.bucket)?;
                write_optional_text(w, "Account", self.destination.account.as_deref())?;
                write_optional_text(
                    w,
                    "StorageClass",
                    self.destination.storage_class.as_deref(),
                )?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for ReplicationConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Role", &self.role)?;
        for rule in &self.rules {
            rule.serialize_xml(writer)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Website
// ---------------------------------------------------------------------------

impl S3Serialize for RoutingRule {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("RoutingRule").write_inner_content(|w| {
            if let Some(ref condition) = self.condition {
                w.create_element("Condition").write_inner_content(|w| {
                    write_optional_text(
                        w,
                        "HttpErrorCodeReturnedEquals",
                        condition.http_error_code_returned_equals.as_deref(),
                    )?;
                    write_optional_text(
                        w,
                        "KeyPrefixEquals",
                        condition.key_prefix_equals.as_deref(),
                    )?;
                    Ok(())
                })?;
            }
            let redirect = &self.redirect;
            w.create_element("Redirect").write_inner_content(|w| {
                write_optional_text(w, "HostName", redirect.host_name.as_deref())?;
                write_optional_text(
                    w,
                    "HttpRedirectCode",
                    redirect.http_redirect_code.as_deref(),
                )?;
                write_optional_text(w, "Protocol", redirect.protocol.as_deref())?;
                write_optional_text(
                    w,
                    "ReplaceKeyPrefixWith",
                    redirect.replace_key_prefix_with.as_deref(),
                )?;
                write_optional_text(w, "ReplaceKeyWith", redirect.replace_key_with.as_deref())?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for WebsiteConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(ref redirect) = self.redirect_all_requests_to {
            writer
                .create_element("RedirectAllRequestsTo")
                .write_inner_content(|w| {
                    write_text_element(w, "HostName", &redirect.host_name)?;
                    write_optional_text(w, "Protocol", redirect.protocol.as_deref())?;
                    Ok(())
                })?;
        }
        if let Some(ref suffix) = self.index_document_suffix {
            writer
                .create_element("IndexDocument")
                .write_inner_content(|w| write_text_element(w, "Suffix", suffix))?;
        }
        if let Some(ref key) = self.error_document_key {
            writer
                .create_element("ErrorDocument")
                .write_inner_content(|w| write_text_element(w, "Key", key))?;
        }
        if !self.routing_rules.is_empty() {
            writer
                .create_element("RoutingRules")
                .write_inner_content(|w| {
                    for rule in &self.routing_rules {
                        rule.serialize_xml(w)?;
                    }
                    Ok(())
                })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Accelerate, request payment, location
// ---------------------------------------------------------------------------

impl S3Serialize for AccelerateConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_optional_text(writer, "Status", self.status.as_ref().map(|s| s.as_str()))
    }
}

impl S3Serialize for RequestPaymentConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Payer", self.payer.as_str())
    }
}

impl S3Serialize for LocationOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(ref constraint) = self.location_constraint {
            writer.write_event(Event::Text(BytesText::new(constraint)))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

impl S3Serialize for Object {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Contents").write_inner_content(|w| {
            write_text_element(w, "Key", &self.key)?;
            write_text_element(w, "LastModified", &format_timestamp(&self.last_modified))?;
            write_text_element(w, "ETag", &self.e_tag)?;
            write_text_element(w, "Size", &self.size.to_string())?;
            write_text_element(w, "StorageClass", &self.storage_class)?;
            if let Some(ref owner) = self.owner {
                owner.serialize_xml(w)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for CommonPrefix {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("CommonPrefixes")
            .write_inner_content(|w| write_text_element(w, "Prefix", &self.prefix))?;
        Ok(())
    }
}

impl S3Serialize for ListObjectsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Name", &self.name)?;
        write_text_element(writer, "Prefix", self.prefix.as_deref().unwrap_or_default())?;
        write_text_element(writer, "Marker", self.marker.as_deref().unwrap_or_default())?;
        write_text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
        write_optional_text(writer, "Delimiter", self.delimiter.as_deref())?;
        write_bool(writer, "IsTruncated", self.is_truncated)?;
        write_optional_text(writer, "NextMarker", self.next_marker.as_deref())?;
        for obj in &self.contents {
            obj.serialize_xml(writer)?;
        }
        for cp in &self.common_prefixes {
            cp.serialize_xml(writer)?;
        }
        Ok(())
    }
}
