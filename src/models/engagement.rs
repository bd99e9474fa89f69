//! Engagement (activity) records: notes, emails, tasks, meetings and calls.
//!
//! The legacy engagements API returns one loosely typed document per
//! engagement. [`EngagementSummary::from_response`] turns it into a fixed
//! shape whose `content` payload is determined by the engagement type.

use crate::error::{HubSpotApiError, HubSpotApiResult};
use crate::models::value::CrmValue;
use serde_json::Value;

static MISSING: Value = Value::Null;

/// Kind of engagement, parsed from the case-sensitive `engagement.type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementType {
    Note,
    Email,
    Task,
    Meeting,
    Call,
    Unknown,
}

impl EngagementType {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("NOTE") => EngagementType::Note,
            Some("EMAIL") => EngagementType::Email,
            Some("TASK") => EngagementType::Task,
            Some("MEETING") => EngagementType::Meeting,
            Some("CALL") => EngagementType::Call,
            _ => EngagementType::Unknown,
        }
    }
}

/// Field of a metadata section as sent; `""` only when the key is absent.
fn field(section: &Value, key: &str) -> CrmValue {
    section
        .get(key)
        .map(|v| CrmValue::from(v.clone()))
        .unwrap_or_else(|| CrmValue::from(""))
}

/// Null, false, zero and empty strings, lists and mappings.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// An email participant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipientRef {
    pub raw: CrmValue,
    pub email: CrmValue,
    pub first_name: CrmValue,
    pub last_name: CrmValue,
}

impl RecipientRef {
    fn from_metadata(entry: &Value) -> Self {
        Self {
            raw: field(entry, "raw"),
            email: field(entry, "email"),
            first_name: field(entry, "firstName"),
            last_name: field(entry, "lastName"),
        }
    }

    /// Recipients listed under `key`, in source order.
    fn list_from_metadata(metadata: &Value, key: &str) -> Vec<Self> {
        metadata
            .get(key)
            .and_then(|v| v.as_array())
            .map(|entries| entries.iter().map(Self::from_metadata).collect())
            .unwrap_or_default()
    }
}

impl From<RecipientRef> for CrmValue {
    fn from(r: RecipientRef) -> Self {
        CrmValue::map([
            ("raw", r.raw),
            ("email", r.email),
            ("firstName", r.first_name),
            ("lastName", r.last_name),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmailContent {
    pub subject: CrmValue,
    pub from: RecipientRef,
    pub to: Vec<RecipientRef>,
    pub cc: Vec<RecipientRef>,
    pub bcc: Vec<RecipientRef>,
    pub sender_email: CrmValue,
    /// Plain text body, or the HTML body when the text is blank.
    pub body: CrmValue,
}

impl EmailContent {
    fn from_metadata(metadata: &Value) -> Self {
        let body = match metadata.get("text") {
            Some(plain) if !is_blank(plain) => CrmValue::from(plain.clone()),
            _ => field(metadata, "html"),
        };

        Self {
            subject: field(metadata, "subject"),
            from: RecipientRef::from_metadata(metadata.get("from").unwrap_or(&MISSING)),
            to: RecipientRef::list_from_metadata(metadata, "to"),
            cc: RecipientRef::list_from_metadata(metadata, "cc"),
            bcc: RecipientRef::list_from_metadata(metadata, "bcc"),
            sender_email: field(metadata.get("sender").unwrap_or(&MISSING), "email"),
            body,
        }
    }
}

impl From<EmailContent> for CrmValue {
    fn from(c: EmailContent) -> Self {
        CrmValue::map([
            ("subject", c.subject),
            ("from", CrmValue::from(c.from)),
            ("to", CrmValue::from(c.to)),
            ("cc", CrmValue::from(c.cc)),
            ("bcc", CrmValue::from(c.bcc)),
            ("sender", CrmValue::map([("email", c.sender_email)])),
            ("body", c.body),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskContent {
    pub subject: CrmValue,
    pub body: CrmValue,
    pub status: CrmValue,
    pub for_object_type: CrmValue,
}

impl From<TaskContent> for CrmValue {
    fn from(c: TaskContent) -> Self {
        CrmValue::map([
            ("subject", c.subject),
            ("body", c.body),
            ("status", c.status),
            ("for_object_type", c.for_object_type),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeetingContent {
    pub title: CrmValue,
    pub body: CrmValue,
    /// Raw source value, `null` when absent; normalized later if temporal.
    pub start_time: CrmValue,
    pub end_time: CrmValue,
    pub internal_notes: CrmValue,
}

impl From<MeetingContent> for CrmValue {
    fn from(c: MeetingContent) -> Self {
        CrmValue::map([
            ("title", c.title),
            ("body", c.body),
            ("start_time", c.start_time),
            ("end_time", c.end_time),
            ("internal_notes", c.internal_notes),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallContent {
    pub body: CrmValue,
    pub from_number: CrmValue,
    pub to_number: CrmValue,
    /// `null` when absent.
    pub duration_ms: CrmValue,
    pub status: CrmValue,
    pub disposition: CrmValue,
}

impl From<CallContent> for CrmValue {
    fn from(c: CallContent) -> Self {
        CrmValue::map([
            ("body", c.body),
            ("from_number", c.from_number),
            ("to_number", c.to_number),
            ("duration_ms", c.duration_ms),
            ("status", c.status),
            ("disposition", c.disposition),
        ])
    }
}

/// Type-specific payload of an engagement.
#[derive(Debug, Clone, PartialEq)]
pub enum EngagementContent {
    Note(CrmValue),
    Email(EmailContent),
    Task(TaskContent),
    Meeting(MeetingContent),
    Call(CallContent),
    /// Unrecognized type: no content is emitted.
    Unrecognized,
}

impl EngagementContent {
    /// Build the payload for `kind` from the engagement's metadata section.
    pub fn from_metadata(kind: EngagementType, metadata: &Value) -> Self {
        match kind {
            EngagementType::Note => EngagementContent::Note(field(metadata, "body")),
            EngagementType::Email => EngagementContent::Email(EmailContent::from_metadata(metadata)),
            EngagementType::Task => EngagementContent::Task(TaskContent {
                subject: field(metadata, "subject"),
                body: field(metadata, "body"),
                status: field(metadata, "status"),
                for_object_type: field(metadata, "forObjectType"),
            }),
            EngagementType::Meeting => EngagementContent::Meeting(MeetingContent {
                title: field(metadata, "title"),
                body: field(metadata, "body"),
                start_time: CrmValue::from_json(metadata.get("startTime")),
                end_time: CrmValue::from_json(metadata.get("endTime")),
                internal_notes: field(metadata, "internalMeetingNotes"),
            }),
            EngagementType::Call => EngagementContent::Call(CallContent {
                body: field(metadata, "body"),
                from_number: field(metadata, "fromNumber"),
                to_number: field(metadata, "toNumber"),
                duration_ms: CrmValue::from_json(metadata.get("durationMilliseconds")),
                status: field(metadata, "status"),
                disposition: field(metadata, "disposition"),
            }),
            EngagementType::Unknown => EngagementContent::Unrecognized,
        }
    }

    pub fn engagement_type(&self) -> EngagementType {
        match self {
            EngagementContent::Note(_) => EngagementType::Note,
            EngagementContent::Email(_) => EngagementType::Email,
            EngagementContent::Task(_) => EngagementType::Task,
            EngagementContent::Meeting(_) => EngagementType::Meeting,
            EngagementContent::Call(_) => EngagementType::Call,
            EngagementContent::Unrecognized => EngagementType::Unknown,
        }
    }

    /// The serialized payload, `None` for unrecognized types.
    pub fn into_value(self) -> Option<CrmValue> {
        match self {
            EngagementContent::Note(body) => Some(body),
            EngagementContent::Email(c) => Some(c.into()),
            EngagementContent::Task(c) => Some(c.into()),
            EngagementContent::Meeting(c) => Some(c.into()),
            EngagementContent::Call(c) => Some(c.into()),
            EngagementContent::Unrecognized => None,
        }
    }
}

/// A formatted engagement in a company's activity history.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementSummary {
    pub id: CrmValue,
    /// The source type tag, as sent.
    pub type_tag: CrmValue,
    pub created_at: CrmValue,
    pub last_updated: CrmValue,
    pub created_by: CrmValue,
    pub modified_by: CrmValue,
    pub timestamp: CrmValue,
    pub associations: CrmValue,
    pub content: EngagementContent,
}

impl EngagementSummary {
    /// Build a summary from a `GET /engagements/v1/engagements/{id}` body.
    ///
    /// The body must be a JSON object. Missing shared fields become `null`;
    /// a missing `associations` section becomes an empty mapping.
    pub fn from_response(response: &Value) -> HubSpotApiResult<Self> {
        if !response.is_object() {
            return Err(HubSpotApiError::UnexpectedResponse(format!(
                "engagement body is not a JSON object: {}",
                response
            )));
        }

        let engagement = response.get("engagement").unwrap_or(&MISSING);
        let metadata = response.get("metadata").unwrap_or(&MISSING);

        let kind = EngagementType::from_tag(engagement.get("type").and_then(|v| v.as_str()));

        Ok(Self {
            id: CrmValue::from_json(engagement.get("id")),
            type_tag: CrmValue::from_json(engagement.get("type")),
            created_at: CrmValue::from_json(engagement.get("createdAt")),
            last_updated: CrmValue::from_json(engagement.get("lastUpdated")),
            created_by: CrmValue::from_json(engagement.get("createdBy")),
            modified_by: CrmValue::from_json(engagement.get("modifiedBy")),
            timestamp: CrmValue::from_json(engagement.get("timestamp")),
            associations: response
                .get("associations")
                .map(|v| CrmValue::from(v.clone()))
                .unwrap_or_else(CrmValue::empty_map),
            content: EngagementContent::from_metadata(kind, metadata),
        })
    }

    pub fn engagement_type(&self) -> EngagementType {
        self.content.engagement_type()
    }
}

impl From<EngagementSummary> for CrmValue {
    fn from(s: EngagementSummary) -> Self {
        let mut entries = vec![
            ("id", s.id),
            ("type", s.type_tag),
            ("created_at", s.created_at),
            ("last_updated", s.last_updated),
            ("created_by", s.created_by),
            ("modified_by", s.modified_by),
            ("timestamp", s.timestamp),
            ("associations", s.associations),
        ];
        if let Some(content) = s.content.into_value() {
            entries.push(("content", content));
        }
        CrmValue::map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summarize(response: Value) -> CrmValue {
        CrmValue::from(EngagementSummary::from_response(&response).unwrap())
    }

    #[test]
    fn test_type_tag_is_case_sensitive() {
        assert_eq!(EngagementType::from_tag(Some("NOTE")), EngagementType::Note);
        assert_eq!(EngagementType::from_tag(Some("note")), EngagementType::Unknown);
        assert_eq!(EngagementType::from_tag(Some("CALL")), EngagementType::Call);
        assert_eq!(EngagementType::from_tag(None), EngagementType::Unknown);
    }

    #[test]
    fn test_note_content() {
        let value = summarize(json!({
            "engagement": {"id": 11, "type": "NOTE", "createdAt": 1704067200000u64},
            "metadata": {"body": "Called about renewal"}
        }));

        assert_eq!(
            value.get("content").and_then(CrmValue::as_str),
            Some("Called about renewal")
        );
        assert_eq!(value.get("id"), Some(&CrmValue::Number(11.into())));
        assert!(value.get("last_updated").map(CrmValue::is_null).unwrap_or(false));
        assert_eq!(value.get("associations"), Some(&CrmValue::empty_map()));
    }

    #[test]
    fn test_email_defaults_every_field() {
        let value = summarize(json!({
            "engagement": {"id": 12, "type": "EMAIL"},
            "metadata": {}
        }));

        let content = value.get("content").expect("email content");
        for key in ["subject", "from", "to", "cc", "bcc", "sender", "body"] {
            assert!(content.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(content.get("subject").and_then(CrmValue::as_str), Some(""));
        assert_eq!(content.get("to").and_then(CrmValue::as_list), Some(&[][..]));
        assert_eq!(
            content
                .get("from")
                .and_then(|f| f.get("firstName"))
                .and_then(CrmValue::as_str),
            Some("")
        );
        assert_eq!(
            content
                .get("sender")
                .and_then(|s| s.get("email"))
                .and_then(CrmValue::as_str),
            Some("")
        );
    }

    #[test]
    fn test_email_recipients_and_body_fallback() {
        let value = summarize(json!({
            "engagement": {"id": 13, "type": "EMAIL"},
            "metadata": {
                "subject": "Proposal",
                "from": {"email": "rep@example.com", "firstName": "Rita"},
                "to": [
                    {"raw": "A <a@example.com>", "email": "a@example.com"},
                    {"email": "b@example.com", "lastName": "Bee"}
                ],
                "sender": {"email": "rep@example.com"},
                "text": "",
                "html": "<p>Hi</p>"
            }
        }));

        let content = value.get("content").unwrap();
        let to = content.get("to").and_then(CrmValue::as_list).unwrap();
        assert_eq!(to.len(), 2);
        assert_eq!(to[0].get("email").and_then(CrmValue::as_str), Some("a@example.com"));
        assert_eq!(to[1].get("lastName").and_then(CrmValue::as_str), Some("Bee"));
        assert_eq!(to[1].get("raw").and_then(CrmValue::as_str), Some(""));
        assert_eq!(content.get("body").and_then(CrmValue::as_str), Some("<p>Hi</p>"));
        assert_eq!(
            content.get("from").and_then(|f| f.get("firstName")).and_then(CrmValue::as_str),
            Some("Rita")
        );
    }

    #[test]
    fn test_email_prefers_text_body() {
        let summary = EngagementSummary::from_response(&json!({
            "engagement": {"type": "EMAIL"},
            "metadata": {"text": "plain", "html": "<b>rich</b>"}
        }))
        .unwrap();
        match summary.content {
            EngagementContent::Email(email) => assert_eq!(email.body, CrmValue::from("plain")),
            other => panic!("expected email, got {:?}", other),
        }
    }

    #[test]
    fn test_task_meeting_call_shapes() {
        let task = EngagementSummary::from_response(&json!({
            "engagement": {"type": "TASK"},
            "metadata": {"subject": "Follow up", "status": "NOT_STARTED", "forObjectType": "OWNER"}
        }))
        .unwrap();
        assert_eq!(
            task.content,
            EngagementContent::Task(TaskContent {
                subject: CrmValue::from("Follow up"),
                body: CrmValue::from(""),
                status: CrmValue::from("NOT_STARTED"),
                for_object_type: CrmValue::from("OWNER"),
            })
        );

        let meeting = summarize(json!({
            "engagement": {"type": "MEETING"},
            "metadata": {"title": "Kickoff", "startTime": 1704103200000u64, "internalMeetingNotes": "bring deck"}
        }));
        let content = meeting.get("content").unwrap();
        assert_eq!(content.get("start_time"), Some(&CrmValue::Number(1704103200000u64.into())));
        assert!(content.get("end_time").map(CrmValue::is_null).unwrap_or(false));
        assert_eq!(content.get("internal_notes").and_then(CrmValue::as_str), Some("bring deck"));

        let call = summarize(json!({
            "engagement": {"type": "CALL"},
            "metadata": {"toNumber": "+15550100", "durationMilliseconds": 61000, "disposition": "connected"}
        }));
        let content = call.get("content").unwrap();
        assert_eq!(content.get("to_number").and_then(CrmValue::as_str), Some("+15550100"));
        assert_eq!(content.get("from_number").and_then(CrmValue::as_str), Some(""));
        assert_eq!(content.get("duration_ms"), Some(&CrmValue::Number(61000.into())));
    }

    #[test]
    fn test_unknown_type_has_no_content() {
        let summary = EngagementSummary::from_response(&json!({
            "engagement": {"id": 14, "type": "UNKNOWN_X"},
            "metadata": {"body": "ignored"}
        }))
        .unwrap();
        assert_eq!(summary.engagement_type(), EngagementType::Unknown);

        let value = CrmValue::from(summary);
        assert!(value.get("content").is_none());
        assert_eq!(value.get("type").and_then(CrmValue::as_str), Some("UNKNOWN_X"));
        for key in [
            "id",
            "created_at",
            "last_updated",
            "created_by",
            "modified_by",
            "timestamp",
            "associations",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_missing_sections() {
        let value = summarize(json!({}));
        assert!(value.get("id").map(CrmValue::is_null).unwrap_or(false));
        assert!(value.get("type").map(CrmValue::is_null).unwrap_or(false));
        assert!(value.get("content").is_none());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        for body in [json!(null), json!([1, 2]), json!("text"), json!(42)] {
            let result = EngagementSummary::from_response(&body);
            assert!(
                matches!(result, Err(HubSpotApiError::UnexpectedResponse(_))),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn test_present_non_string_fields_are_kept() {
        let value = summarize(json!({
            "engagement": {"type": "CALL"},
            "metadata": {"status": 3, "fromNumber": null, "body": "ring"}
        }));

        let content = value.get("content").unwrap();
        assert_eq!(content.get("status"), Some(&CrmValue::Number(3.into())));
        assert!(content.get("from_number").map(CrmValue::is_null).unwrap_or(false));
        assert_eq!(content.get("to_number").and_then(CrmValue::as_str), Some(""));
        assert_eq!(content.get("body").and_then(CrmValue::as_str), Some("ring"));
    }

    #[test]
    fn test_blank_text_body_falls_back_to_html() {
        let value = summarize(json!({
            "engagement": {"type": "EMAIL"},
            "metadata": {"text": null, "html": "<p>rich</p>", "subject": null}
        }));

        let content = value.get("content").unwrap();
        assert_eq!(content.get("body").and_then(CrmValue::as_str), Some("<p>rich</p>"));
        assert!(content.get("subject").map(CrmValue::is_null).unwrap_or(false));
    }
}
