//! Response envelope shared by the student and institution registries.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{ClientError, REQUEST_TIMEOUT};

/// The `{success, message, data}` envelope both registries answer with.
///
/// `data` is sometimes a single object and sometimes an array; it is
/// decoded into an explicit union and always normalized to a list.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct ServiceEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<EnvelopeData<T>>,
}

/// `data` payload: one object or many.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeData<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> ServiceEnvelope<T> {
    /// Normalize the payload to a list. A missing `data` key is an
    /// empty list, not an error.
    pub fn into_list(self) -> Vec<T> {
        match self.data {
            Some(EnvelopeData::Many(items)) => items,
            Some(EnvelopeData::One(item)) => vec![item],
            None => Vec::new(),
        }
    }
}

/// Issue a GET against a registry endpoint and normalize the enveloped
/// payload to a list.
pub(crate) async fn fetch_list<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<T>, ClientError> {
    let response = client.get(url).timeout(REQUEST_TIMEOUT).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let envelope: ServiceEnvelope<T> = response.json().await?;
    Ok(envelope.into_list())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn array_data_becomes_list() {
        let envelope: ServiceEnvelope<Item> = serde_json::from_str(
            r#"{"success": true, "message": "ok", "data": [{"id": "a"}, {"id": "b"}]}"#,
        )
        .unwrap();
        let items = envelope.into_list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a");
    }

    #[test]
    fn single_object_data_becomes_one_element_list() {
        let envelope: ServiceEnvelope<Item> =
            serde_json::from_str(r#"{"success": true, "message": "ok", "data": {"id": "a"}}"#)
                .unwrap();
        let items = envelope.into_list();
        assert_eq!(items, vec![Item { id: "a".into() }]);
    }

    #[test]
    fn missing_data_is_empty_list() {
        let envelope: ServiceEnvelope<Item> =
            serde_json::from_str(r#"{"success": false, "message": "nothing"}"#).unwrap();
        assert!(envelope.into_list().is_empty());
    }

    #[test]
    fn null_data_is_empty_list() {
        let envelope: ServiceEnvelope<Item> =
            serde_json::from_str(r#"{"success": true, "message": "ok", "data": null}"#).unwrap();
        assert!(envelope.into_list().is_empty());
    }
}
