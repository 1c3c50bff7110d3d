//! Wire shapes of the controller's link and device feeds.
//!
//! Records are decoded one at a time from `serde_json::Value` so a single
//! malformed entry is skipped instead of failing the whole feed.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::types::PortId;

/// Errors raised while turning feed JSON into graph elements
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("unexpected feed schema: {0}")]
    UnexpectedSchema(String),
}

/// An identifier the controller may send either as text or as a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    /// Textual form, or `None` for an empty string
    pub fn into_text(self) -> Option<String> {
        let text = match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn non_empty(raw: Option<RawId>) -> Option<String> {
    raw.and_then(RawId::into_text)
}

/// One entry of the link list
#[derive(Debug, Clone, Deserialize)]
pub struct LinkRecord {
    #[serde(rename = "src-switch")]
    pub src_switch: Option<RawId>,
    #[serde(rename = "dst-switch")]
    pub dst_switch: Option<RawId>,
    #[serde(rename = "src-port")]
    pub src_port: Option<RawId>,
    #[serde(rename = "dst-port")]
    pub dst_port: Option<RawId>,
    #[serde(rename = "type")]
    pub link_type: Option<String>,
    pub direction: Option<String>,
}

/// A link record with both switch identifiers present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLink {
    pub src_switch: String,
    pub dst_switch: String,
    pub src_port: Option<PortId>,
    pub dst_port: Option<PortId>,
    pub link_type: String,
    pub direction: String,
}

impl LinkRecord {
    pub fn validate(self) -> Result<ValidLink, IngestError> {
        let src_switch = non_empty(self.src_switch)
            .ok_or_else(|| IngestError::MalformedRecord("link without src-switch".to_string()))?;
        let dst_switch = non_empty(self.dst_switch)
            .ok_or_else(|| IngestError::MalformedRecord("link without dst-switch".to_string()))?;

        Ok(ValidLink {
            src_switch,
            dst_switch,
            src_port: non_empty(self.src_port).map(PortId),
            dst_port: non_empty(self.dst_port).map(PortId),
            link_type: self.link_type.unwrap_or_default(),
            direction: self.direction.unwrap_or_default(),
        })
    }
}

/// Either a single value or a list of them
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            Self::One(v) => Some(v),
            Self::Many(v) => v.into_iter().next(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentPoint {
    pub switch: Option<RawId>,
    #[serde(rename = "switchDPID")]
    pub switch_dpid: Option<RawId>,
    pub port: Option<RawId>,
}

/// One entry of the device feed
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRecord {
    pub mac: Option<OneOrMany<String>>,
    pub ipv4: Option<Vec<String>>,
    #[serde(rename = "attachmentPoint")]
    pub attachment_point: Option<Vec<AttachmentPoint>>,
}

/// A device reduced to what the topology uses: its first address of each
/// kind and its first attachment point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDevice {
    pub mac: Option<String>,
    pub ipv4: Option<String>,
    pub switch: String,
    pub port: PortId,
}

impl DeviceRecord {
    pub fn validate(self) -> Result<ValidDevice, IngestError> {
        // Only the first attachment point is modeled
        let attachment = self
            .attachment_point
            .and_then(|points| points.into_iter().next())
            .ok_or_else(|| IngestError::MalformedRecord("device without attachmentPoint".to_string()))?;

        let switch = non_empty(attachment.switch)
            .or_else(|| non_empty(attachment.switch_dpid))
            .ok_or_else(|| IngestError::MalformedRecord("attachment point without switch".to_string()))?;
        let port = non_empty(attachment.port)
            .map(PortId)
            .ok_or_else(|| IngestError::MalformedRecord("attachment point without port".to_string()))?;

        Ok(ValidDevice {
            mac: self
                .mac
                .and_then(OneOrMany::into_first)
                .filter(|m| !m.is_empty()),
            ipv4: self
                .ipv4
                .and_then(|ips| ips.into_iter().next())
                .filter(|ip| !ip.is_empty()),
            switch,
            port,
        })
    }
}

/// The two envelopes the device endpoint is known to use
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeviceEnvelope {
    Bare(Vec<Value>),
    Wrapped { devices: Vec<Value> },
}

/// Detect the device feed's envelope and return its records as one sequence
pub fn device_entries(feed: Value) -> Result<Vec<Value>, IngestError> {
    match serde_json::from_value::<DeviceEnvelope>(feed) {
        Ok(DeviceEnvelope::Bare(devices)) | Ok(DeviceEnvelope::Wrapped { devices }) => Ok(devices),
        Err(_) => Err(IngestError::UnexpectedSchema(
            "expected a device array or an object with a \"devices\" array".to_string(),
        )),
    }
}

/// Return the link list's records; anything but an array is a schema error
pub fn link_entries(feed: Value) -> Result<Vec<Value>, IngestError> {
    match feed {
        Value::Array(links) => Ok(links),
        other => Err(IngestError::UnexpectedSchema(format!(
            "expected a link array, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decode a single feed entry, mapping serde failures to a malformed record
pub fn decode_record<T: for<'de> Deserialize<'de>>(entry: Value) -> Result<T, IngestError> {
    serde_json::from_value(entry).map_err(|e| IngestError::MalformedRecord(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Tally of what a feed contributed
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestCounts {
    pub ingested: usize,
    pub skipped: usize,
}

impl IngestCounts {
    pub(crate) fn skip(&mut self, err: &IngestError) {
        log::warn!("Skipping record: {}", err);
        self.skipped += 1;
    }
}

/// Remap lookups shared by both ingestors
pub(crate) fn remap_or_prefix(table: &HashMap<String, String>, id: &str, prefix: &str) -> String {
    table
        .get(id)
        .cloned()
        .unwrap_or_else(|| format!("{}{}", prefix, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_record_requires_both_switches() {
        let record: LinkRecord = decode_record(json!({"src-switch": "1", "src-port": 1})).unwrap();
        assert!(matches!(record.validate(), Err(IngestError::MalformedRecord(_))));

        let record: LinkRecord = decode_record(json!({"src-switch": "", "dst-switch": "2"})).unwrap();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_link_record_numeric_fields() {
        let record: LinkRecord = decode_record(json!({
            "src-switch": "00:00:00:00:00:00:00:01",
            "dst-switch": 2,
            "src-port": 3,
            "dst-port": "4",
            "type": "internal",
            "direction": "bidirectional"
        }))
        .unwrap();
        let link = record.validate().unwrap();
        assert_eq!(link.dst_switch, "2");
        assert_eq!(link.src_port, Some(PortId::new("3")));
        assert_eq!(link.dst_port, Some(PortId::new("4")));
        assert_eq!(link.link_type, "internal");
    }

    #[test]
    fn test_device_mac_string_or_list() {
        let one: DeviceRecord = decode_record(json!({
            "mac": "aa:bb",
            "attachmentPoint": [{"switch": "1", "port": 2}]
        }))
        .unwrap();
        assert_eq!(one.validate().unwrap().mac.as_deref(), Some("aa:bb"));

        let many: DeviceRecord = decode_record(json!({
            "mac": ["cc:dd", "ee:ff"],
            "attachmentPoint": [{"switch": "1", "port": 2}]
        }))
        .unwrap();
        assert_eq!(many.validate().unwrap().mac.as_deref(), Some("cc:dd"));
    }

    #[test]
    fn test_device_uses_first_attachment_point_and_switch_dpid() {
        let record: DeviceRecord = decode_record(json!({
            "ipv4": ["10.0.0.1", "10.0.0.9"],
            "attachmentPoint": [
                {"switchDPID": "5", "port": 1},
                {"switch": "6", "port": 2}
            ]
        }))
        .unwrap();
        let device = record.validate().unwrap();
        assert_eq!(device.switch, "5");
        assert_eq!(device.port, PortId::new("1"));
        assert_eq!(device.ipv4.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_device_without_attachment_is_malformed() {
        let record: DeviceRecord = decode_record(json!({"mac": "aa", "attachmentPoint": []})).unwrap();
        assert!(record.validate().is_err());

        let record: DeviceRecord =
            decode_record(json!({"attachmentPoint": [{"switch": "1"}]})).unwrap();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_device_entries_envelopes() {
        assert_eq!(device_entries(json!([{"mac": "a"}])).unwrap().len(), 1);
        assert_eq!(device_entries(json!({"devices": [{}, {}]})).unwrap().len(), 2);
        assert!(matches!(
            device_entries(json!({"foo": []})),
            Err(IngestError::UnexpectedSchema(_))
        ));
        assert!(device_entries(json!("devices")).is_err());
    }

    #[test]
    fn test_link_entries_rejects_objects() {
        assert!(link_entries(json!({"links": []})).is_err());
        assert!(link_entries(json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_remap_or_prefix() {
        let mut table = HashMap::new();
        table.insert("1".to_string(), "ap1".to_string());
        assert_eq!(remap_or_prefix(&table, "1", "s"), "ap1");
        assert_eq!(remap_or_prefix(&table, "2", "s"), "s2");
    }
}
