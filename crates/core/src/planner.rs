use crate::classify::{ClassifyRules, MediaKind, NamingStyle};
use crate::exiftool_reader::{datetime_tag_candidates, resolve_datetime, MetadataProvider, TagMap};
use crate::timestamp::canonical_token;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub root: PathBuf,
    pub rules: ClassifyRules,
    pub naming: NamingStyle,
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameCandidate {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub kind: MediaKind,
    pub datetime_raw: String,
    pub rendered_base: String,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    Unclassified,
    NoDateTime,
    MalformedDateTime(String),
    MetadataError(String),
    TraversalError(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclassified => write!(f, "対象外の拡張子です"),
            Self::NoDateTime => write!(f, "日時タグがありません"),
            Self::MalformedDateTime(raw) => write!(f, "日時の形式が不正です: {raw}"),
            Self::MetadataError(message) => {
                write!(f, "メタデータ取得に失敗しました: {message}")
            }
            Self::TraversalError(message) => {
                write!(f, "フォルダを走査できませんでした: {message}")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenameStats {
    pub scanned_files: usize,
    pub photo_files: usize,
    pub video_files: usize,
    pub skipped: usize,
    pub planned: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub root: PathBuf,
    pub naming: NamingStyle,
    pub candidates: Vec<RenameCandidate>,
    pub skipped: Vec<SkippedFile>,
    pub stats: RenameStats,
}

/// ルート以下を再帰的に走査し、ファイルごとに
/// 分類→日時解決→正規化→採番を行ってリネーム計画を作る。
/// ファイル単位の失敗はスキップとして記録し、走査は続行する。
pub fn generate_plan(
    options: &PlanOptions,
    provider: &mut dyn MetadataProvider,
) -> Result<RenamePlan> {
    if !options.root.is_dir() {
        anyhow::bail!("ディレクトリではありません: {}", options.root.display());
    }

    let mut stats = RenameStats::default();
    let mut candidates = Vec::new();
    let mut skipped = Vec::new();
    let mut reserved = HashSet::<PathBuf>::new();

    for entry in WalkDir::new(&options.root).sort_by_file_name() {
        // 読めないサブディレクトリ等はスキップ扱いにして走査を続ける
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| options.root.clone());
                stats.skipped += 1;
                skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::TraversalError(err.to_string()),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        stats.scanned_files += 1;
        let path = entry.path();

        let Some(kind) = options.rules.classify(path) else {
            stats.skipped += 1;
            skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: SkipReason::Unclassified,
            });
            continue;
        };
        match kind {
            MediaKind::Photo => stats.photo_files += 1,
            MediaKind::Video => stats.video_files += 1,
        }

        let tags = match provider.tags(path) {
            Ok(tags) => tags,
            Err(err) => {
                stats.skipped += 1;
                skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: SkipReason::MetadataError(format!("{err:#}")),
                });
                continue;
            }
        };
        if options.debug {
            dump_tags(path, &tags);
        }

        let Some(raw) = resolve_datetime(&tags, datetime_tag_candidates(kind)) else {
            stats.skipped += 1;
            skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: SkipReason::NoDateTime,
            });
            continue;
        };

        let token = match canonical_token(&raw) {
            Ok(token) => token,
            Err(_) => {
                stats.skipped += 1;
                skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: SkipReason::MalformedDateTime(raw),
                });
                continue;
            }
        };

        let base = options.naming.base_name(kind, &token);
        let extension = path
            .extension()
            .map(|v| format!(".{}", v.to_string_lossy()))
            .unwrap_or_default();
        let target = resolve_collision(path, &base, &extension, &mut reserved)?;

        let changed = target != path;
        if !changed {
            stats.unchanged += 1;
        }
        stats.planned += 1;
        candidates.push(RenameCandidate {
            original_path: path.to_path_buf(),
            target_path: target,
            kind,
            datetime_raw: raw,
            rendered_base: base,
            changed,
        });
    }

    Ok(RenamePlan {
        root: options.root.clone(),
        naming: options.naming,
        candidates,
        skipped,
        stats,
    })
}

/// 同じ親ディレクトリ内で衝突しない名前を採番する。
/// 候補0は `{base}{ext}`、以降は `{base}_{n}{ext}` を n=1 から昇順で試す。
/// ディスク上の既存名に加えて、同じ計画内で予約済みの名前も衝突とみなす。
pub(crate) fn resolve_collision(
    original_path: &Path,
    base: &str,
    extension: &str,
    reserved: &mut HashSet<PathBuf>,
) -> Result<PathBuf> {
    let parent = original_path
        .parent()
        .context("親ディレクトリを取得できませんでした")?;

    let mut candidate = parent.join(format!("{base}{extension}"));
    let mut n = 0usize;
    loop {
        if is_available(&candidate, original_path, reserved) {
            reserved.insert(candidate.clone());
            return Ok(candidate);
        }
        n += 1;
        candidate = parent.join(format!("{base}_{n}{extension}"));
    }
}

fn is_available(candidate: &Path, original_path: &Path, reserved: &HashSet<PathBuf>) -> bool {
    if reserved.contains(candidate) {
        return false;
    }
    if candidate == original_path {
        return true;
    }
    !candidate.exists()
}

fn dump_tags(path: &Path, tags: &TagMap) {
    eprintln!("--- メタデータ: {} ---", path.display());
    for (name, value) in tags {
        eprintln!("{name} = {value}");
    }
    eprintln!("--- ここまで ---");
}
