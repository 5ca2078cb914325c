//! 聊天消息载荷
//!
//! 文本或媒体内容，构造后不可变。媒体数据对核心而言是
//! 不透明的二进制块，编解码与尺寸限制属于传输层的事。

use data_encoding::BASE64;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// 媒体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Voice,
}

impl MediaKind {
    /// 发送方未提供说明文字时使用的展示标签
    pub fn default_label(&self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Voice => "Voice note",
        }
    }
}

/// 不透明媒体数据，线上以 base64 文本传输。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob(Vec<u8>);

impl MediaBlob {
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for MediaBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for MediaBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let data = BASE64
            .decode(text.as_bytes())
            .map_err(|err| de::Error::custom(format!("invalid base64 media data: {err}")))?;
        Ok(Self(data))
    }
}

/// 一条聊天消息的内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// 纯文本
    Text { content: String },
    /// 图片或语音
    Media {
        media: MediaKind,
        data: MediaBlob,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

impl Payload {
    pub fn text(content: impl Into<String>) -> Self {
        Payload::Text {
            content: content.into(),
        }
    }

    pub fn media(kind: MediaKind, data: Vec<u8>, caption: Option<String>) -> Self {
        Payload::Media {
            media: kind,
            data: MediaBlob::new(data),
            caption,
        }
    }

    /// 展示用文字：文本内容，或媒体的说明文字/默认标签
    pub fn display_content(&self) -> &str {
        match self {
            Payload::Text { content } => content,
            Payload::Media { media, caption, .. } => {
                caption.as_deref().unwrap_or_else(|| media.default_label())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_without_caption_falls_back_to_label() {
        let image = Payload::media(MediaKind::Image, vec![1, 2, 3], None);
        assert_eq!(image.display_content(), "Image");

        let voice = Payload::media(MediaKind::Voice, vec![1, 2, 3], None);
        assert_eq!(voice.display_content(), "Voice note");

        let captioned = Payload::media(MediaKind::Image, vec![1, 2, 3], Some("cat".into()));
        assert_eq!(captioned.display_content(), "cat");
    }

    #[test]
    fn media_blob_is_base64_on_the_wire() {
        let payload = Payload::media(MediaKind::Voice, b"opaque-bytes".to_vec(), None);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "media");
        assert_eq!(json["media"], "voice");
        assert_eq!(json["data"], BASE64.encode(b"opaque-bytes"));

        let back: Payload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn rejects_malformed_media_data() {
        let result: Result<Payload, _> = serde_json::from_str(
            r#"{"kind":"media","media":"image","data":"not base64!!"}"#,
        );
        assert!(result.is_err());
    }
}
