use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

/// 拡張子ベースの分類ルール。大文字小文字は区別しない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifyRules {
    pub photo_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
}

impl Default for ClassifyRules {
    fn default() -> Self {
        Self {
            photo_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "heic".to_string(),
            ],
            video_extensions: vec!["mov".to_string(), "mp4".to_string()],
        }
    }
}

impl ClassifyRules {
    /// 未対応の拡張子(拡張子なしを含む)は `None`。
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
        if self
            .photo_extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(&ext))
        {
            return Some(MediaKind::Photo);
        }
        if self
            .video_extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(&ext))
        {
            return Some(MediaKind::Video);
        }
        None
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NamingStyle {
    Prefixed,
    Bare,
}

impl Default for NamingStyle {
    fn default() -> Self {
        Self::Prefixed
    }
}

impl NamingStyle {
    pub fn base_name(&self, kind: MediaKind, token: &str) -> String {
        match self {
            Self::Bare => token.to_string(),
            Self::Prefixed => match kind {
                MediaKind::Photo => format!("IMG_{token}"),
                MediaKind::Video => format!("VID_{token}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassifyRules, MediaKind, NamingStyle};
    use std::path::Path;

    #[test]
    fn classify_is_case_insensitive() {
        let rules = ClassifyRules::default();
        assert_eq!(
            rules.classify(Path::new("a/IMG_0001.JPG")),
            Some(MediaKind::Photo)
        );
        assert_eq!(
            rules.classify(Path::new("a/IMG_0001.jpg")),
            Some(MediaKind::Photo)
        );
        assert_eq!(
            rules.classify(Path::new("a/IMG_0001.JPEG")),
            Some(MediaKind::Photo)
        );
        assert_eq!(
            rules.classify(Path::new("b/clip.mov")),
            Some(MediaKind::Video)
        );
        assert_eq!(
            rules.classify(Path::new("b/clip.MP4")),
            Some(MediaKind::Video)
        );
    }

    #[test]
    fn classify_rejects_unknown_extensions() {
        let rules = ClassifyRules::default();
        assert_eq!(rules.classify(Path::new("note.txt")), None);
        assert_eq!(rules.classify(Path::new("anim.gif")), None);
        assert_eq!(rules.classify(Path::new("no_extension")), None);
    }

    #[test]
    fn classify_uses_configured_extensions_only() {
        let rules = ClassifyRules {
            photo_extensions: vec!["jpg".to_string()],
            video_extensions: vec!["mov".to_string()],
        };
        assert_eq!(rules.classify(Path::new("a.png")), None);
        assert_eq!(rules.classify(Path::new("a.mp4")), None);
        assert_eq!(rules.classify(Path::new("a.jpg")), Some(MediaKind::Photo));
    }

    #[test]
    fn prefixed_naming_adds_kind_prefix() {
        let token = "20230704_101530";
        assert_eq!(
            NamingStyle::Prefixed.base_name(MediaKind::Photo, token),
            "IMG_20230704_101530"
        );
        assert_eq!(
            NamingStyle::Prefixed.base_name(MediaKind::Video, token),
            "VID_20230704_101530"
        );
    }

    #[test]
    fn bare_naming_keeps_token_as_is() {
        assert_eq!(
            NamingStyle::Bare.base_name(MediaKind::Video, "20230704_101530"),
            "20230704_101530"
        );
    }
}
