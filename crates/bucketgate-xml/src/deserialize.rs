//! S3 XML deserialization: parsing request bodies into configuration documents.
//!
//! Unknown child elements are skipped. Missing required elements and values
//! outside an enum's wire set are errors, which callers report as
//! `MalformedXML`.

use bucketgate_model::types::{
    AccessControlPolicy, BucketLoggingStatus, BucketVersioningStatus, CORSConfiguration,
    CORSRule, CreateBucketConfiguration, ExpirationStatus, Grant, Grantee, GranteeType,
    LifecycleConfiguration, LifecycleExpiration, LifecycleRule, LifecycleRuleFilter,
    LoggingEnabled, MfaDeleteStatus, Owner, Permission, Redirect, RedirectAllRequestsTo,
    RoutingCondition, RoutingRule, Tag, Tagging, Transition, VersioningConfiguration,
    WebsiteConfiguration,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::XmlError;

/// Trait for deserializing S3 types from XML.
///
/// The opening tag has already been consumed by the caller; the
/// implementation reads child elements until the matching end tag.
pub trait S3Deserialize: Sized {
    /// Deserialize an instance from the given XML reader.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the XML is malformed or required fields are missing.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError>;
}

/// Deserialize a request body whose root element must be `root`.
///
/// A self-closing root (`<BucketLoggingStatus/>`) is read as a root with no
/// children, so required-element checks still apply.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed, the root element has another
/// name, or deserialization fails.
pub fn from_xml<T: S3Deserialize>(xml: &[u8], root: &str) -> Result<T, XmlError> {
    // Text is not trimmed: entity references split text into several events
    // and trimming each one would eat the spaces around them.
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                check_root(&e, root)?;
                return T::deserialize_xml(&mut reader);
            }
            Event::Empty(e) => {
                check_root(&e, root)?;
                let expanded = format!("<{root}></{root}>");
                let mut reader = Reader::from_reader(expanded.as_bytes());
                reader.read_event()?;
                return T::deserialize_xml(&mut reader);
            }
            Event::Eof => {
                return Err(XmlError::MissingElement(root.to_owned()));
            }
            // Declaration, comments, processing instructions.
            _ => {}
        }
    }
}

fn check_root(start: &BytesStart<'_>, root: &str) -> Result<(), XmlError> {
    let name = local_name(start)?;
    if name == root {
        Ok(())
    } else {
        Err(XmlError::UnexpectedElement(format!(
            "expected root element {root}, found {name}"
        )))
    }
}

fn local_name(start: &BytesStart<'_>) -> Result<String, XmlError> {
    let name = start.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_owned)
        .map_err(|e| XmlError::ParseError(e.to_string()))
}

// ---------------------------------------------------------------------------
// Helper functions for reading common XML patterns
// ---------------------------------------------------------------------------

/// A child element that was just opened.
struct Child {
    name: String,
    /// `true` for a self-closing `<Name/>`, which has no end tag to consume.
    empty: bool,
    attributes: Vec<(String, String)>,
}

impl Child {
    fn from_start(start: &BytesStart<'_>, empty: bool) -> Result<Self, XmlError> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.local_name().as_ref())
                .map_err(|e| XmlError::ParseError(e.to_string()))?
                .to_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| XmlError::ParseError(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name: local_name(start)?,
            empty,
            attributes,
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Advance to the next child element of `parent`, or return `None` once the
/// parent's end tag has been consumed.
fn next_child(reader: &mut Reader<&[u8]>, parent: &str) -> Result<Option<Child>, XmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => return Child::from_start(&e, false).map(Some),
            Event::Empty(e) => return Child::from_start(&e, true).map(Some),
            Event::End(_) => return Ok(None),
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(format!(
                    "unexpected EOF in {parent}"
                )));
            }
            _ => {}
        }
    }
}

/// Read the text content of the current element and consume its end tag.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => {
                let raw = std::str::from_utf8(&e)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(raw);
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?
                {
                    text.push(ch);
                } else {
                    let entity = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&entity)
                        .ok_or_else(|| XmlError::ParseError(format!("unknown entity &{entity};")))?;
                    text.push_str(resolved);
                }
            }
            Event::End(_) => return Ok(text),
            Event::Start(e) => {
                return Err(XmlError::UnexpectedElement(format!(
                    "element {} inside text content",
                    local_name(&e)?
                )));
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while reading text content".to_string(),
                ));
            }
            _ => {}
        }
    }
}

fn read_text(reader: &mut Reader<&[u8]>, child: &Child) -> Result<String, XmlError> {
    if child.empty {
        Ok(String::new())
    } else {
        read_text_content(reader)
    }
}

/// Skip over an element and all its children.
fn skip(reader: &mut Reader<&[u8]>, child: &Child) -> Result<(), XmlError> {
    if child.empty {
        return Ok(());
    }
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while skipping element".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Deserialize a nested element that has required content of its own.
fn read_nested<T: S3Deserialize>(reader: &mut Reader<&[u8]>, child: &Child) -> Result<T, XmlError> {
    if child.empty {
        return Err(XmlError::MissingElement(format!("content of {}", child.name)));
    }
    T::deserialize_xml(reader)
}

fn required<T>(value: Option<T>, element: &str) -> Result<T, XmlError> {
    value.ok_or_else(|| XmlError::MissingElement(element.to_owned()))
}

fn parse_bool(s: &str) -> Result<bool, XmlError> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(XmlError::ParseError(format!("invalid boolean: {s}"))),
    }
}

fn parse_i32(s: &str) -> Result<i32, XmlError> {
    s.parse::<i32>()
        .map_err(|e| XmlError::ParseError(format!("invalid i32 '{s}': {e}")))
}

fn parse_enum<T>(s: &str, parse: fn(&str) -> Option<T>, element: &str) -> Result<T, XmlError> {
    parse(s).ok_or_else(|| XmlError::ParseError(format!("invalid {element} '{s}'")))
}

// ---------------------------------------------------------------------------
// ACL
// ---------------------------------------------------------------------------

impl S3Deserialize for Owner {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut owner = Owner::default();
        while let Some(child) = next_child(reader, "Owner")? {
            match child.name.as_str() {
                "ID" => owner.id = Some(read_text(reader, &child)?),
                "DisplayName" => owner.display_name = Some(read_text(reader, &child)?),
                _ => skip(reader, &child)?,
            }
        }
        Ok(owner)
    }
}

/// Grantee fields before the type is settled from `xsi:type` or the fields present.
#[derive(Default)]
struct GranteeFields {
    id: Option<String>,
    display_name: Option<String>,
    email_address: Option<String>,
    uri: Option<String>,
}

fn read_grantee(reader: &mut Reader<&[u8]>, child: &Child) -> Result<Grantee, XmlError> {
    let mut fields = GranteeFields::default();
    if !child.empty {
        while let Some(inner) = next_child(reader, "Grantee")? {
            match inner.name.as_str() {
                "ID" => fields.id = Some(read_text(reader, &inner)?),
                "DisplayName" => fields.display_name = Some(read_text(reader, &inner)?),
                "EmailAddress" => fields.email_address = Some(read_text(reader, &inner)?),
                "URI" => fields.uri = Some(read_text(reader, &inner)?),
                _ => skip(reader, &inner)?,
            }
        }
    }

    let grantee_type = match child.attribute("type") {
        Some(t) => parse_enum(t, GranteeType::parse, "xsi:type")?,
        None if fields.uri.is_some() => GranteeType::Group,
        None if fields.email_address.is_some() => GranteeType::AmazonCustomerByEmail,
        None if fields.id.is_some() => GranteeType::CanonicalUser,
        None => return Err(XmlError::MissingElement("Grantee identity".to_owned())),
    };

    Ok(Grantee {
        grantee_type,
        id: fields.id,
        display_name: fields.display_name,
        email_address: fields.email_address,
        uri: fields.uri,
    })
}

impl S3Deserialize for Grant {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut grantee = None;
        let mut permission = None;
        while let Some(child) = next_child(reader, "Grant")? {
            match child.name.as_str() {
                "Grantee" => grantee = Some(read_grantee(reader, &child)?),
                "Permission" => {
                    let text = read_text(reader, &child)?;
                    permission = Some(parse_enum(&text, Permission::parse, "Permission")?);
                }
                _ => skip(reader, &child)?,
            }
        }
        Ok(Grant {
            grantee: required(grantee, "Grantee")?,
            permission: required(permission, "Permission")?,
        })
    }
}

impl S3Deserialize for AccessControlPolicy {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut policy = AccessControlPolicy::default();
        while let Some(child) = next_child(reader, "AccessControlPolicy")? {
            match child.name.as_str() {
                "Owner" => {
                    if !child.empty {
                        policy.owner = Some(Owner::deserialize_xml(reader)?);
                    }
                }
                "AccessControlList" => {
                    if child.empty {
                        continue;
                    }
                    while let Some(inner) = next_child(reader, "AccessControlList")? {
                        if inner.name == "Grant" {
                            policy.grants.push(read_nested(reader, &inner)?);
                        } else {
                            skip(reader, &inner)?;
                        }
                    }
                }
                _ => skip(reader, &child)?,
            }
        }
        Ok(policy)
    }
}

// ---------------------------------------------------------------------------
// CORS, tagging, logging, versioning
// ---------------------------------------------------------------------------

impl S3Deserialize for CORSRule {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut rule = CORSRule::default();
        while let Some(child) = next_child(reader, "CORSRule")? {
            match child.name.as_str() {
                "ID" => rule.id = Some(read_text(reader, &child)?),
                "AllowedHeader" => rule.allowed_headers.push(read_text(reader, &child)?),
                "AllowedMethod" => rule.allowed_methods.push(read_text(reader, &child)?),
                "AllowedOrigin" => rule.allowed_origins.push(read_text(reader, &child)?),
                "ExposeHeader" => rule.expose_headers.push(read_text(reader, &child)?),
                "MaxAgeSeconds" => {
                    rule.max_age_seconds = Some(parse_i32(&read_text(reader, &child)?)?);
                }
                _ => skip(reader, &child)?,
            }
        }
        Ok(rule)
    }
}

impl S3Deserialize for CORSConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut config = CORSConfiguration::default();
        while let Some(child) = next_child(reader, "CORSConfiguration")? {
            if child.name == "CORSRule" {
                config.cors_rules.push(read_nested(reader, &child)?);
            } else {
                skip(reader, &child)?;
            }
        }
        Ok(config)
    }
}

impl S3Deserialize for Tag {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut key = None;
        let mut value = None;
        while let Some(child) = next_child(reader, "Tag")? {
            match child.name.as_str() {
                "Key" => key = Some(read_text(reader, &child)?),
                "Value" => value = Some(read_text(reader, &child)?),
                _ => skip(reader, &child)?,
            }
        }
        Ok(Tag {
            key: required(key, "Key")?,
            value: required(value, "Value")?,
        })
    }
}

impl S3Deserialize for Tagging {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut tag_set = None;
        while let Some(child) = next_child(reader, "Tagging")? {
            if child.name == "TagSet" {
                let mut tags = Vec::new();
                if !child.empty {
                    while let Some(inner) = next_child(reader, "TagSet")? {
                        if inner.name == "Tag" {
                            tags.push(read_nested(reader, &inner)?);
                        } else {
                            skip(reader, &inner)?;
                        }
                    }
                }
                tag_set = Some(tags);
            } else {
                skip(reader, &child)?;
            }
        }
        Ok(Tagging {
            tag_set: required(tag_set, "TagSet")?,
        })
    }
}

impl S3Deserialize for LoggingEnabled {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut target_bucket = None;
        let mut target_prefix = None;
        while let Some(child) = next_child(reader, "LoggingEnabled")? {
            match child.name.as_str() {
                "TargetBucket" => target_bucket = Some(read_text(reader, &child)?),
                "TargetPrefix" => target_prefix = Some(read_text(reader, &child)?),
                _ => skip(reader, &child)?,
            }
        }
        Ok(LoggingEnabled {
            target_bucket: required(target_bucket, "TargetBucket")?,
            target_prefix: target_prefix.unwrap_or_default(),
        })
    }
}

impl S3Deserialize for BucketLoggingStatus {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut status = BucketLoggingStatus::default();
        while let Some(child) = next_child(reader, "BucketLoggingStatus")? {
            if child.name == "LoggingEnabled" {
                status.logging_enabled = Some(read_nested(reader, &child)?);
            } else {
                skip(reader, &child)?;
            }
        }
        Ok(status)
    }
}

impl S3Deserialize for VersioningConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut config = VersioningConfiguration::default();
        while let Some(child) = next_child(reader, "VersioningConfiguration")? {
            match child.name.as_str() {
                "Status" => {
                    let text = read_text(reader, &child)?;
                    config.status = Some(parse_enum(&text, BucketVersioningStatus::parse, "Status")?);
                }
                "MfaDelete" => {
                    let text = read_text(reader, &child)?;
                    config.mfa_delete = Some(parse_enum(&text, MfaDeleteStatus::parse, "MfaDelete")?);
                }
                _ => skip(reader, &child)?,
            }
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl S3Deserialize for LifecycleExpiration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut expiration = LifecycleExpiration::default();
        while let Some(child) = next_child(reader, "Expiration")? {
            match child.name.as_str() {
                "Date" => expiration.date = Some(read_text(reader, &child)?),
                "Days" => expiration.days = Some(parse_i32(&read_text(reader, &child)?)?),
                "ExpiredObjectDeleteMarker" => {
                    expiration.expired_object_delete_marker =
                        Some(parse_bool(&read_text(reader, &child)?)?);
                }
                _ => skip(reader, &child)?,
            }
        }
        Ok(expiration)
    }
}

impl S3Deserialize for Transition {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut transition = Transition::default();
        while let Some(child) = next_child(reader, "Transition")? {
            match child.name.as_str() {
                "Date" => transition.date = Some(read_text(reader, &child)?),
                "Days" => transition.days = Some(parse_i32(&read_text(reader, &child)?)?),
                "StorageClass" => transition.storage_class = Some(read_text(reader, &child)?),
                _ => skip(reader, &child)?,
            }
        }
        Ok(transition)
    }
}

/// Read `<Parent><Name>n</Name></Parent>` where only one integer child matters.
fn read_single_i32(
    reader: &mut Reader<&[u8]>,
    parent: &Child,
    element: &str,
) -> Result<Option<i32>, XmlError> {
    let mut value = None;
    if parent.empty {
        return Ok(value);
    }
    while let Some(child) = next_child(reader, &parent.name)? {
        if child.name == element {
            value = Some(parse_i32(&read_text(reader, &child)?)?);
        } else {
            skip(reader, &child)?;
        }
    }
    Ok(value)
}

impl S3Deserialize for LifecycleRule {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut id = None;
        let mut prefix = None;
        let mut filter = None;
        let mut status = None;
        let mut expiration = None;
        let mut transitions = Vec::new();
        let mut noncurrent_version_expiration_days = None;
        let mut abort_incomplete_multipart_upload_days = None;

        while let Some(child) = next_child(reader, "Rule")? {
            match child.name.as_str() {
                "ID" => id = Some(read_text(reader, &child)?),
                "Prefix" => prefix = Some(read_text(reader, &child)?),
                "Filter" => {
                    let mut rule_filter = LifecycleRuleFilter::default();
                    if !child.empty {
                        while let Some(inner) = next_child(reader, "Filter")? {
                            if inner.name == "Prefix" {
                                rule_filter.prefix = Some(read_text(reader, &inner)?);
                            } else {
                                skip(reader, &inner)?;
                            }
                        }
                    }
                    filter = Some(rule_filter);
                }
                "Status" => {
                    let text = read_text(reader, &child)?;
                    status = Some(parse_enum(&text, ExpirationStatus::parse, "Status")?);
                }
                "Expiration" => expiration = Some(read_nested(reader, &child)?),
                "Transition" => transitions.push(read_nested(reader, &child)?),
                "NoncurrentVersionExpiration" => {
                    noncurrent_version_expiration_days =
                        read_single_i32(reader, &child, "NoncurrentDays")?;
                }
                "AbortIncompleteMultipartUpload" => {
                    abort_incomplete_multipart_upload_days =
                        read_single_i32(reader, &child, "DaysAfterInitiation")?;
                }
                _ => skip(reader, &child)?,
            }
        }

        Ok(LifecycleRule {
            id,
            prefix,
            filter,
            status: required(status, "Status")?,
            expiration,
            transitions,
            noncurrent_version_expiration_days,
            abort_incomplete_multipart_upload_days,
        })
    }
}

impl S3Deserialize for LifecycleConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut config = LifecycleConfiguration::default();
        while let Some(child) = next_child(reader, "LifecycleConfiguration")? {
            if child.name == "Rule" {
                config.rules.push(read_nested(reader, &child)?);
            } else {
                skip(reader, &child)?;
            }
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Website
// ---------------------------------------------------------------------------

impl S3Deserialize for RoutingRule {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut condition = None;
        let mut redirect = None;
        while let Some(child) = next_child(reader, "RoutingRule")? {
            match child.name.as_str() {
                "Condition" => {
                    let mut cond = RoutingCondition::default();
                    if !child.empty {
                        while let Some(inner) = next_child(reader, "Condition")? {
                            match inner.name.as_str() {
                                "HttpErrorCodeReturnedEquals" => {
                                    cond.http_error_code_returned_equals =
                                        Some(read_text(reader, &inner)?);
                                }
                                "KeyPrefixEquals" => {
                                    cond.key_prefix_equals = Some(read_text(reader, &inner)?);
                                }
                                _ => skip(reader, &inner)?,
                            }
                        }
                    }
                    condition = Some(cond);
                }
                "Redirect" => {
                    let mut target = Redirect::default();
                    if !child.empty {
                        while let Some(inner) = next_child(reader, "Redirect")? {
                            let slot = match inner.name.as_str() {
                                "HostName" => &mut target.host_name,
                                "HttpRedirectCode" => &mut target.http_redirect_code,
                                "Protocol" => &mut target.protocol,
                                "ReplaceKeyPrefixWith" => &mut target.replace_key_prefix_with,
                                "ReplaceKeyWith" => &mut target.replace_key_with,
                                _ => {
                                    skip(reader, &inner)?;
                                    continue;
                                }
                            };
                            *slot = Some(read_text(reader, &inner)?);
                        }
                    }
                    redirect = Some(target);
                }
                _ => skip(reader, &child)?,
            }
        }
        Ok(RoutingRule {
            condition,
            redirect: required(redirect, "Redirect")?,
        })
    }
}

impl S3Deserialize for WebsiteConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut config = WebsiteConfiguration::default();
        while let Some(child) = next_child(reader, "WebsiteConfiguration")? {
            match child.name.as_str() {
                "IndexDocument" | "ErrorDocument" => {
                    let element = if child.name == "IndexDocument" {
                        "Suffix"
                    } else {
                        "Key"
                    };
                    let mut value = None;
                    if !child.empty {
                        while let Some(inner) = next_child(reader, &child.name)? {
                            if inner.name == element {
                                value = Some(read_text(reader, &inner)?);
                            } else {
                                skip(reader, &inner)?;
                            }
                        }
                    }
                    let value = required(value, element)?;
                    if child.name == "IndexDocument" {
                        config.index_document_suffix = Some(value);
                    } else {
                        config.error_document_key = Some(value);
                    }
                }
                "RedirectAllRequestsTo" => {
                    let mut host_name = None;
                    let mut protocol = None;
                    if !child.empty {
                        while let Some(inner) = next_child(reader, "RedirectAllRequestsTo")? {
                            match inner.name.as_str() {
                                "HostName" => host_name = Some(read_text(reader, &inner)?),
                                "Protocol" => protocol = Some(read_text(reader, &inner)?),
                                _ => skip(reader, &inner)?,
                            }
                        }
                    }
                    config.redirect_all_requests_to = Some(RedirectAllRequestsTo {
                        host_name: required(host_name, "HostName")?,
                        protocol,
                    });
                }
                "RoutingRules" => {
                    if child.empty {
                        continue;
                    }
                    while let Some(inner) = next_child(reader, "RoutingRules")? {
                        if inner.name == "RoutingRule" {
                            config.routing_rules.push(read_nested(reader, &inner)?);
                        } else {
                            skip(reader, &inner)?;
                        }
                    }
                }
                _ => skip(reader, &child)?,
            }
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// CreateBucket
// ---------------------------------------------------------------------------

impl S3Deserialize for CreateBucketConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut config = CreateBucketConfiguration::default();
        while let Some(child) = next_child(reader, "CreateBucketConfiguration")? {
            if child.name == "LocationConstraint" {
                let text = read_text(reader, &child)?;
                if !text.is_empty() {
                    config.location_constraint = Some(text);
                }
            } else {
                skip(reader, &child)?;
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_deserialize_cors_configuration() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
            <CORSConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
                <CORSRule>
                    <ID>rule-1</ID>
                    <AllowedOrigin>https://example.com</AllowedOrigin>
                    <AllowedMethod>GET</AllowedMethod>
                    <AllowedMethod>PUT</AllowedMethod>
                    <AllowedHeader>*</AllowedHeader>
                    <MaxAgeSeconds>3000</MaxAgeSeconds>
                </CORSRule>
            </CORSConfiguration>"#;

        let config: CORSConfiguration = from_xml(xml, "CORSConfiguration").expect("valid CORS");

        assert_eq!(config.cors_rules.len(), 1);
        let rule = &config.cors_rules[0];
        assert_eq!(rule.id.as_deref(), Some("rule-1"));
        assert_eq!(rule.allowed_methods, vec!["GET", "PUT"]);
        assert_eq!(rule.allowed_origins, vec!["https://example.com"]);
        assert_eq!(rule.max_age_seconds, Some(3000));
    }

    #[test]
    fn test_should_reject_wrong_root_element() {
        let xml = b"<Tagging><TagSet/></Tagging>";
        let result: Result<CORSConfiguration, _> = from_xml(xml, "CORSConfiguration");
        assert!(matches!(result, Err(XmlError::UnexpectedElement(_))));
    }

    #[test]
    fn test_should_reject_unclosed_document() {
        let xml = b"<CORSConfiguration><CORSRule><AllowedMethod>GET";
        let result: Result<CORSConfiguration, _> = from_xml(xml, "CORSConfiguration");
        assert!(result.is_err());
    }

    #[test]
    fn test_should_reject_non_xml_body() {
        let result: Result<Tagging, _> = from_xml(b"not xml at all", "Tagging");
        assert!(result.is_err());
    }

    #[test]
    fn test_should_deserialize_tagging_with_escaped_value() {
        let xml = b"<Tagging><TagSet><Tag><Key>team</Key><Value>a &amp; b</Value></Tag>\
                    <Tag><Key>empty</Key><Value/></Tag></TagSet></Tagging>";

        let tagging: Tagging = from_xml(xml, "Tagging").expect("valid tagging");

        assert_eq!(tagging.tag_set.len(), 2);
        assert_eq!(tagging.tag_set[0].value, "a & b");
        assert_eq!(tagging.tag_set[1].value, "");
    }

    #[test]
    fn test_should_require_tag_set() {
        let result: Result<Tagging, _> = from_xml(b"<Tagging></Tagging>", "Tagging");
        assert!(matches!(result, Err(XmlError::MissingElement(_))));
    }

    #[test]
    fn test_should_require_tag_set_in_self_closing_root() {
        let result: Result<Tagging, _> = from_xml(b"<Tagging/>", "Tagging");
        assert!(matches!(result, Err(XmlError::MissingElement(_))));
    }

    #[test]
    fn test_should_accept_self_closing_logging_status() {
        let status: BucketLoggingStatus =
            from_xml(b"<BucketLoggingStatus/>", "BucketLoggingStatus").expect("valid logging");
        assert!(status.logging_enabled.is_none());
    }

    #[test]
    fn test_should_reject_unknown_versioning_status() {
        let xml = b"<VersioningConfiguration><Status>On</Status></VersioningConfiguration>";
        let result: Result<VersioningConfiguration, _> = from_xml(xml, "VersioningConfiguration");
        assert!(matches!(result, Err(XmlError::ParseError(_))));
    }

    #[test]
    fn test_should_deserialize_acl_with_xsi_type() {
        let xml = br#"<AccessControlPolicy>
            <Owner><ID>owner-id</ID></Owner>
            <AccessControlList>
                <Grant>
                    <Grantee xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="Group">
                        <URI>http://acs.amazonaws.com/groups/global/AllUsers</URI>
                    </Grantee>
                    <Permission>READ</Permission>
                </Grant>
                <Grant>
                    <Grantee><ID>owner-id</ID></Grantee>
                    <Permission>FULL_CONTROL</Permission>
                </Grant>
            </AccessControlList>
        </AccessControlPolicy>"#;

        let policy: AccessControlPolicy =
            from_xml(xml, "AccessControlPolicy").expect("valid ACL");

        assert_eq!(policy.owner.and_then(|o| o.id).as_deref(), Some("owner-id"));
        assert_eq!(policy.grants.len(), 2);
        assert_eq!(policy.grants[0].grantee.grantee_type, GranteeType::Group);
        assert_eq!(policy.grants[0].permission, Permission::Read);
        assert_eq!(policy.grants[1].grantee.grantee_type, GranteeType::CanonicalUser);
    }

    #[test]
    fn test_should_deserialize_lifecycle_rule() {
        let xml = b"<LifecycleConfiguration><Rule><ID>r</ID><Filter><Prefix>tmp/</Prefix></Filter>\
                    <Status>Enabled</Status><Expiration><Days>1</Days></Expiration>\
                    <NoncurrentVersionExpiration><NoncurrentDays>5</NoncurrentDays></NoncurrentVersionExpiration>\
                    </Rule></LifecycleConfiguration>";

        let config: LifecycleConfiguration =
            from_xml(xml, "LifecycleConfiguration").expect("valid lifecycle");

        let rule = &config.rules[0];
        assert_eq!(rule.status, ExpirationStatus::Enabled);
        assert_eq!(
            rule.filter.as_ref().and_then(|f| f.prefix.as_deref()),
            Some("tmp/")
        );
        assert_eq!(rule.expiration.as_ref().and_then(|e| e.days), Some(1));
        assert_eq!(rule.noncurrent_version_expiration_days, Some(5));
    }

    #[test]
    fn test_should_deserialize_website_configuration() {
        let xml = b"<WebsiteConfiguration><IndexDocument><Suffix>index.html</Suffix></IndexDocument>\
                    <ErrorDocument><Key>error.html</Key></ErrorDocument>\
                    <RoutingRules><RoutingRule><Condition><KeyPrefixEquals>docs/</KeyPrefixEquals></Condition>\
                    <Redirect><ReplaceKeyPrefixWith>documents/</ReplaceKeyPrefixWith></Redirect></RoutingRule></RoutingRules>\
                    </WebsiteConfiguration>";

        let config: WebsiteConfiguration =
            from_xml(xml, "WebsiteConfiguration").expect("valid website");

        assert_eq!(config.index_document_suffix.as_deref(), Some("index.html"));
        assert_eq!(config.error_document_key.as_deref(), Some("error.html"));
        assert_eq!(config.routing_rules.len(), 1);
        assert_eq!(
            config.routing_rules[0].redirect.replace_key_prefix_with.as_deref(),
            Some("documents/")
        );
    }

    #[test]
    fn test_should_deserialize_create_bucket_configuration() {
        let xml = b"<CreateBucketConfiguration><LocationConstraint>eu-west-1</LocationConstraint></CreateBucketConfiguration>";
        let config: CreateBucketConfiguration =
            from_xml(xml, "CreateBucketConfiguration").expect("valid configuration");
        assert_eq!(config.location_constraint.as_deref(), Some("eu-west-1"));
    }
}
