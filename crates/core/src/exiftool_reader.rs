use crate::classify::MediaKind;
use anyhow::{Context, Result};
use exiftool::ExifTool;
use serde_json::Value;
use std::path::Path;

/// exiftoolが返す1ファイル分のタグ名→値のマッピング。
/// タグ名は `-G` 指定によりグループ付き(例: `EXIF:DateTimeOriginal`)。
pub type TagMap = serde_json::Map<String, Value>;

const PHOTO_DATETIME_TAGS: &[&str] = &["EXIF:DateTimeOriginal"];
const VIDEO_DATETIME_TAGS: &[&str] = &["QuickTime:CreationDate", "QuickTime:CreateDate"];

/// メタデータ取得の境界。本番はexiftoolセッション、テストはインメモリ実装。
pub trait MetadataProvider {
    fn tags(&mut self, path: &Path) -> Result<TagMap>;
}

/// 実行全体で1つだけ持つexiftoolの常駐セッション。
/// dropで子プロセスごと解放される。
pub struct ExifToolSession {
    inner: ExifTool,
}

impl ExifToolSession {
    pub fn new() -> Result<Self> {
        let inner = ExifTool::new()
            .context("exiftoolを起動できませんでした。インストールされているか確認してください")?;
        Ok(Self { inner })
    }
}

impl MetadataProvider for ExifToolSession {
    fn tags(&mut self, path: &Path) -> Result<TagMap> {
        let value = self
            .inner
            .json(path, &["-G"])
            .with_context(|| format!("メタデータを取得できませんでした: {}", path.display()))?;
        match value {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!(
                "exiftoolの出力がオブジェクトではありません: {} ({})",
                path.display(),
                other
            ),
        }
    }
}

pub fn datetime_tag_candidates(kind: MediaKind) -> &'static [&'static str] {
    match kind {
        MediaKind::Photo => PHOTO_DATETIME_TAGS,
        MediaKind::Video => VIDEO_DATETIME_TAGS,
    }
}

/// 候補タグを順に走査し、最初に見つかった値を文字列化して返す。
/// どの候補も無ければ `None`(欠落は正常系)。
pub fn resolve_datetime(tags: &TagMap, candidates: &[&str]) -> Option<String> {
    for name in candidates {
        match tags.get(*name) {
            Some(Value::String(raw)) => return Some(raw.clone()),
            Some(Value::Number(raw)) => return Some(raw.to_string()),
            _ => continue,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{datetime_tag_candidates, resolve_datetime, TagMap};
    use crate::classify::MediaKind;
    use serde_json::json;

    fn tag_map(entries: &[(&str, serde_json::Value)]) -> TagMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn photo_uses_datetime_original_only() {
        let tags = tag_map(&[
            ("EXIF:DateTimeOriginal", json!("2023:07:04 10:15:30")),
            ("EXIF:CreateDate", json!("2020:01:01 00:00:00")),
        ]);
        let candidates = datetime_tag_candidates(MediaKind::Photo);
        assert_eq!(
            resolve_datetime(&tags, candidates).as_deref(),
            Some("2023:07:04 10:15:30")
        );

        let without = tag_map(&[("EXIF:CreateDate", json!("2020:01:01 00:00:00"))]);
        assert_eq!(resolve_datetime(&without, candidates), None);
    }

    #[test]
    fn video_prefers_creation_date_over_create_date() {
        let tags = tag_map(&[
            ("QuickTime:CreateDate", json!("2023:01:01 00:00:00")),
            ("QuickTime:CreationDate", json!("2023:01:01 09:00:00+09:00")),
        ]);
        let candidates = datetime_tag_candidates(MediaKind::Video);
        assert_eq!(
            resolve_datetime(&tags, candidates).as_deref(),
            Some("2023:01:01 09:00:00+09:00")
        );
    }

    #[test]
    fn video_falls_back_to_create_date() {
        let tags = tag_map(&[("QuickTime:CreateDate", json!("2023:01:01 00:00:00"))]);
        let candidates = datetime_tag_candidates(MediaKind::Video);
        assert_eq!(
            resolve_datetime(&tags, candidates).as_deref(),
            Some("2023:01:01 00:00:00")
        );
    }

    #[test]
    fn numeric_values_are_stringified() {
        let tags = tag_map(&[("EXIF:DateTimeOriginal", json!(20230704))]);
        assert_eq!(
            resolve_datetime(&tags, &["EXIF:DateTimeOriginal"]).as_deref(),
            Some("20230704")
        );
    }

    #[test]
    fn empty_map_resolves_to_none() {
        let tags = TagMap::new();
        assert_eq!(
            resolve_datetime(&tags, datetime_tag_candidates(MediaKind::Video)),
            None
        );
    }
}
