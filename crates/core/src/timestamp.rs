use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("日時文字列の形式が不正です: {0}")]
    Malformed(String),
}

/// exiftoolの日時文字列 `"YYYY:MM:DD HH:MM:SS"` を `YYYYMMDD_HHMMSS` に正規化する。
///
/// QuickTime系タグではタイムゾーン(`+09:00`や`Z`)やサブ秒(`.123`)が
/// 付くことがあるため、時刻部分から取り除いてから連結する。
pub fn canonical_token(raw: &str) -> Result<String, TimestampError> {
    let segments: Vec<&str> = raw.split_whitespace().collect();
    let &[date_part, time_part] = segments.as_slice() else {
        return Err(TimestampError::Malformed(raw.to_string()));
    };

    let time_part = strip_time_suffixes(time_part);

    let date = date_part.replace(':', "");
    let time = time_part.replace(':', "");
    Ok(format!("{date}_{time}"))
}

// 時刻部分は `HH:MM:SS` のみを残す。`.` 以降(サブ秒)、`+`/`-` 以降
// (オフセット)、`Z`/`z` 以降(UTC表記)は最初に現れた位置で切り捨てる。
fn strip_time_suffixes(time_part: &str) -> &str {
    let mut out = time_part;
    for marker in ['.', '+', 'Z', 'z'] {
        if let Some(pos) = out.find(marker) {
            out = &out[..pos];
        }
    }
    // `-` はオフセットの符号としてしか現れないが、先頭だけは残す
    if let Some(pos) = out.find('-') {
        if pos > 0 {
            out = &out[..pos];
        }
    }
    out
}
