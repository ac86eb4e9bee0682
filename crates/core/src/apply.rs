use crate::config::app_paths;
use crate::planner::{resolve_collision, RenameCandidate, RenamePlan};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UndoLog {
    operations: Vec<RenameOperation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RenameOperation {
    from: PathBuf,
    to: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    pub applied: usize,
    pub unchanged: usize,
    pub failures: Vec<ApplyFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoResult {
    pub restored: usize,
}

/// 計画の順にリネームを実行する。ファイル単位の失敗は記録して続行し、
/// 成功分は取り消しログとして保存する。
pub fn apply_plan(plan: &RenamePlan) -> Result<ApplyResult> {
    let (operations, result) = perform_renames(plan);
    if !operations.is_empty() {
        persist_undo(&operations)?;
    }
    Ok(result)
}

fn perform_renames(plan: &RenamePlan) -> (Vec<RenameOperation>, ApplyResult) {
    let mut operations = Vec::new();
    let mut failures = Vec::new();
    let mut unchanged = 0usize;

    for candidate in &plan.candidates {
        if !candidate.changed {
            unchanged += 1;
            continue;
        }
        match rename_candidate(candidate) {
            Ok(target) => operations.push(RenameOperation {
                from: candidate.original_path.clone(),
                to: target,
            }),
            Err(err) => failures.push(ApplyFailure {
                path: candidate.original_path.clone(),
                message: format!("{err:#}"),
            }),
        }
    }

    let result = ApplyResult {
        applied: operations.len(),
        unchanged,
        failures,
    };
    (operations, result)
}

fn rename_candidate(candidate: &RenameCandidate) -> Result<PathBuf> {
    // 計画から適用までの間に同名ファイルが作られていたら一度だけ採番し直す
    let target = if candidate.target_path.exists() {
        let extension = candidate
            .original_path
            .extension()
            .map(|v| format!(".{}", v.to_string_lossy()))
            .unwrap_or_default();
        let mut reserved = HashSet::new();
        resolve_collision(
            &candidate.original_path,
            &candidate.rendered_base,
            &extension,
            &mut reserved,
        )?
    } else {
        candidate.target_path.clone()
    };

    fs::rename(&candidate.original_path, &target).with_context(|| {
        format!(
            "リネームに失敗しました: {} -> {}",
            candidate.original_path.display(),
            target.display()
        )
    })?;
    Ok(target)
}

pub fn undo_last() -> Result<UndoResult> {
    let paths = app_paths()?;
    if !paths.undo_path.exists() {
        anyhow::bail!("取り消し可能な履歴がありません");
    }

    let raw = fs::read_to_string(&paths.undo_path).with_context(|| {
        format!(
            "取り消しログを読めませんでした: {}",
            paths.undo_path.display()
        )
    })?;
    let log = serde_json::from_str::<UndoLog>(&raw).context("取り消しログが壊れています")?;

    let restored = restore_operations(&log)?;

    fs::remove_file(&paths.undo_path).with_context(|| {
        format!(
            "取り消しログ削除に失敗しました: {}",
            paths.undo_path.display()
        )
    })?;

    Ok(UndoResult { restored })
}

fn restore_operations(log: &UndoLog) -> Result<usize> {
    let mut restored = 0usize;
    for op in log.operations.iter().rev() {
        if !op.to.exists() {
            continue;
        }
        fs::rename(&op.to, &op.from).with_context(|| {
            format!(
                "取り消しに失敗しました: {} -> {}",
                op.to.display(),
                op.from.display()
            )
        })?;
        restored += 1;
    }
    Ok(restored)
}

fn persist_undo(operations: &[RenameOperation]) -> Result<()> {
    let paths = app_paths()?;
    fs::create_dir_all(&paths.config_dir).with_context(|| {
        format!(
            "設定ディレクトリ作成に失敗しました: {}",
            paths.config_dir.display()
        )
    })?;

    let log = UndoLog {
        operations: operations.to_vec(),
    };
    let body =
        serde_json::to_string_pretty(&log).context("取り消しログのシリアライズに失敗しました")?;
    fs::write(&paths.undo_path, body).with_context(|| {
        format!(
            "取り消しログ書き込みに失敗しました: {}",
            paths.undo_path.display()
        )
    })?;
    Ok(())
}
