//! 逐行解析带表头的 CSV 输入。
//!
//! 坏行（缺字段、数值非法）只记 warn 日志后跳过，不影响整个文件的加载。

use std::io::Read;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;
use tracing::warn;

use crate::error::Result;

/// 单行解析失败的原因
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("invalid value {value:?} for field `{field}`")]
    Invalid { field: &'static str, value: String },
}

/// 对一行记录按列号取字段
pub(crate) struct Row<'a> {
    rec: &'a StringRecord,
}

impl<'a> Row<'a> {
    pub(crate) fn new(rec: &'a StringRecord) -> Self {
        Self { rec }
    }

    /// 必填文本字段（空串视为缺失）
    pub(crate) fn text(&self, idx: usize, field: &'static str) -> Result<&'a str, RowError> {
        match self.rec.get(idx) {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(RowError::Missing(field)),
        }
    }

    /// 必填数值字段
    pub(crate) fn num<T: FromStr>(&self, idx: usize, field: &'static str) -> Result<T, RowError> {
        let s = self.text(idx, field)?;
        s.parse().map_err(|_| RowError::Invalid {
            field,
            value: s.to_string(),
        })
    }

    /// 可选数值字段：列不存在或为空时返回 None，存在但非法时报错
    pub(crate) fn opt_num<T: FromStr>(
        &self,
        idx: usize,
        field: &'static str,
    ) -> Result<Option<T>, RowError> {
        match self.rec.get(idx) {
            None | Some("") => Ok(None),
            Some(_) => self.num(idx, field).map(Some),
        }
    }

    /// 非负整数字段，兼容导出脚本写出的 `50000000.0` 这类浮点表示。
    ///
    /// 负数读成 0，交给调用方按下限修正；只有非数值文本才算非法。
    pub(crate) fn integral(&self, idx: usize, field: &'static str) -> Result<u64, RowError> {
        let s = self.text(idx, field)?;
        if let Ok(v) = s.parse::<u64>() {
            return Ok(v);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_nan() => Err(RowError::Invalid {
                field,
                value: s.to_string(),
            }),
            // `as` 对超出 u64 的值饱和
            Ok(v) => Ok(if v <= 0.0 { 0 } else { v as u64 }),
            _ => Err(RowError::Invalid {
                field,
                value: s.to_string(),
            }),
        }
    }
}

/// 读取所有数据行：第一行是表头，空行跳过，坏行跳过。
///
/// 只有底层 IO 错误会中断读取。
pub(crate) fn parse_rows<R, T, F>(reader: R, kind: &str, mut parse: F) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&Row<'_>) -> Result<T, RowError>,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        // 表头占第 1 行
        let line = idx + 2;
        let rec = match rec {
            Ok(rec) => rec,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(kind, line, error = %e, "跳过无法解析的行");
                continue;
            }
        };
        if rec.iter().all(str::is_empty) {
            continue;
        }
        match parse(&Row::new(&rec)) {
            Ok(v) => out.push(v),
            Err(e) => warn!(kind, line, error = %e, "跳过格式错误的行"),
        }
    }
    Ok(out)
}
