use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{PhotoInfo, PhotoSource, PhotoStub, RemoteEvent, RevisionMarker, SourceError};
use crate::config::SourceConfig;

/// Remote source adapter for the Flickr REST API.
///
/// All calls use `format=json&nojsoncallback=1`. A transport failure,
/// a non-2xx status, or a `stat: fail` envelope all map to
/// `SourceError::Unavailable`; only structurally broken payloads map
/// to `Malformed`.
pub struct FlickrSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    group_id: String,
}

impl FlickrSource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            group_id: config.group_id.clone(),
        }
    }

    async fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<Value, SourceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("method", method),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("nojsoncallback", "1"),
            ])
            .query(params)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "{method} returned status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        debug!(method, bytes = body.len(), "Source call completed");
        parse_envelope(&body)
    }
}

#[async_trait]
impl PhotoSource for FlickrSource {
    async fn fetch_group_listing(&self) -> Result<Vec<PhotoStub>, SourceError> {
        let value = self
            .call(
                "flickr.groups.pools.getPhotos",
                &[("group_id", self.group_id.as_str()), ("extras", "owner_name")],
            )
            .await?;
        parse_group_listing(&value)
    }

    async fn fetch_photo_info(&self, uid: &str) -> Result<PhotoInfo, SourceError> {
        let value = self
            .call("flickr.photos.getInfo", &[("photo_id", uid)])
            .await?;
        parse_photo_info(&value)
    }

    async fn fetch_comments(&self, uid: &str) -> Result<Vec<RemoteEvent>, SourceError> {
        let value = self
            .call("flickr.photos.comments.getList", &[("photo_id", uid)])
            .await?;
        parse_comments(&value)
    }
}

#[derive(Deserialize)]
struct WireListingPhoto {
    id: String,
    owner: String,
    secret: String,
    server: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    ownername: String,
}

#[derive(Deserialize)]
struct WireEvent {
    id: String,
    #[serde(default)]
    author: String,
    #[serde(rename = "_content", default)]
    content: String,
}

impl From<WireEvent> for RemoteEvent {
    fn from(e: WireEvent) -> Self {
        RemoteEvent {
            id: e.id,
            author: e.author,
            text: e.content,
        }
    }
}

/// Check the `stat` envelope every REST response carries.
fn parse_envelope(body: &str) -> Result<Value, SourceError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::Malformed(format!("invalid JSON: {e}")))?;

    match value.get("stat").and_then(Value::as_str) {
        Some("ok") => Ok(value),
        Some(_) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown failure");
            Err(SourceError::Unavailable(format!(
                "source reported failure: {message}"
            )))
        }
        None => Err(SourceError::Malformed("missing stat field".into())),
    }
}

fn parse_group_listing(value: &Value) -> Result<Vec<PhotoStub>, SourceError> {
    let photos = value
        .pointer("/photos/photo")
        .cloned()
        .ok_or_else(|| SourceError::Malformed("missing photos.photo array".into()))?;

    let wire: Vec<WireListingPhoto> = serde_json::from_value(photos)
        .map_err(|e| SourceError::Malformed(format!("bad group listing: {e}")))?;

    Ok(wire
        .into_iter()
        .map(|p| PhotoStub {
            page_url: page_url(&p.owner, &p.id),
            image_url: static_url(&p.server, &p.id, &p.secret, "m"),
            thumb_url: static_url(&p.server, &p.id, &p.secret, "t"),
            uid: p.id,
            owner_id: p.owner,
            owner_name: p.ownername,
            title: p.title,
        })
        .collect())
}

fn parse_photo_info(value: &Value) -> Result<PhotoInfo, SourceError> {
    let last_modified = match value.pointer("/photo/dates/lastupdate") {
        Some(Value::String(s)) => RevisionMarker::parse(s)?,
        Some(Value::Number(n)) => RevisionMarker(
            n.as_i64()
                .ok_or_else(|| SourceError::Malformed("non-integer lastupdate".into()))?,
        ),
        _ => return Err(SourceError::Malformed("missing dates.lastupdate".into())),
    };

    Ok(PhotoInfo {
        last_modified,
        tags: parse_event_list(value, "/photo/tags/tag")?,
        notes: parse_event_list(value, "/photo/notes/note")?,
    })
}

fn parse_comments(value: &Value) -> Result<Vec<RemoteEvent>, SourceError> {
    parse_event_list(value, "/comments/comment")
}

/// Event arrays are omitted entirely when empty; absence is not an error.
fn parse_event_list(value: &Value, pointer: &str) -> Result<Vec<RemoteEvent>, SourceError> {
    match value.pointer(pointer) {
        None | Some(Value::Null) => Ok(vec![]),
        Some(list) => {
            let wire: Vec<WireEvent> = serde_json::from_value(list.clone())
                .map_err(|e| SourceError::Malformed(format!("bad event list {pointer}: {e}")))?;
            Ok(wire.into_iter().map(RemoteEvent::from).collect())
        }
    }
}

fn page_url(owner: &str, uid: &str) -> String {
    format!("https://www.flickr.com/photos/{owner}/{uid}")
}

fn static_url(server: &str, uid: &str, secret: &str, size: &str) -> String {
    format!("https://live.staticflickr.com/{server}/{uid}_{secret}_{size}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_fail_is_unavailable() {
        let body = r#"{"stat":"fail","code":1,"message":"Photo not found"}"#;
        match parse_envelope(body) {
            Err(SourceError::Unavailable(msg)) => assert!(msg.contains("Photo not found")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn envelope_garbage_is_malformed() {
        assert!(matches!(
            parse_envelope("<rsp>not json</rsp>"),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn group_listing_builds_locators() {
        let body = r#"{
            "photos": {"page": 1, "photo": [
                {"id": "101", "owner": "11111@N00", "secret": "abc", "server": "65535",
                 "title": "sunset", "ownername": "ana"}
            ]},
            "stat": "ok"
        }"#;
        let value = parse_envelope(body).unwrap();
        let stubs = parse_group_listing(&value).unwrap();
        assert_eq!(stubs.len(), 1);
        let stub = &stubs[0];
        assert_eq!(stub.uid, "101");
        assert_eq!(stub.owner_name, "ana");
        assert_eq!(stub.page_url, "https://www.flickr.com/photos/11111@N00/101");
        assert_eq!(
            stub.image_url,
            "https://live.staticflickr.com/65535/101_abc_m.jpg"
        );
        assert_eq!(
            stub.thumb_url,
            "https://live.staticflickr.com/65535/101_abc_t.jpg"
        );
    }

    #[test]
    fn photo_info_parses_marker_and_events() {
        let body = r#"{
            "photo": {
                "dates": {"lastupdate": "150"},
                "tags": {"tag": [
                    {"id": "t1", "author": "ana", "_content": "sunset"},
                    {"id": "t2", "author": "bo", "_content": "beach"}
                ]},
                "notes": {"note": []}
            },
            "stat": "ok"
        }"#;
        let value = parse_envelope(body).unwrap();
        let info = parse_photo_info(&value).unwrap();
        assert_eq!(info.last_modified, RevisionMarker(150));
        assert_eq!(info.tags.len(), 2);
        assert_eq!(info.tags[0].author, "ana");
        assert_eq!(info.tags[1].text, "beach");
        assert!(info.notes.is_empty());
    }

    #[test]
    fn photo_info_without_marker_is_malformed() {
        let value = parse_envelope(r#"{"photo": {"dates": {}}, "stat": "ok"}"#).unwrap();
        assert!(matches!(
            parse_photo_info(&value),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn absent_comment_list_is_empty_not_error() {
        let value = parse_envelope(r#"{"comments": {"photo_id": "101"}, "stat": "ok"}"#).unwrap();
        assert_eq!(parse_comments(&value).unwrap(), vec![]);
    }

    #[test]
    fn comments_parse_into_events() {
        let body = r#"{
            "comments": {"comment": [
                {"id": "c9", "author": "cy", "_content": "lovely light"}
            ]},
            "stat": "ok"
        }"#;
        let value = parse_envelope(body).unwrap();
        let comments = parse_comments(&value).unwrap();
        assert_eq!(
            comments,
            vec![RemoteEvent {
                id: "c9".into(),
                author: "cy".into(),
                text: "lovely light".into(),
            }]
        );
    }
}
