//! 配置校验模块
//!
//! 校验规则：
//! - 字段取值范围 (frame_rate > 0, slope_window >= 1, ...)
//! - 候选速度非负且有限
//! - series 名称唯一

use std::collections::HashSet;

use contracts::{ContractError, SessionBlueprint};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 SessionBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    validate_field_ranges(blueprint)?;
    validate_plausible_speeds(blueprint)?;
    validate_series_names(blueprint)?;
    Ok(())
}

/// 校验字段取值范围 (derive 规则)
fn validate_field_ranges(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    match blueprint.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let (field, message) = first_violation("", &errors)
                .unwrap_or_else(|| (String::from("<root>"), errors.to_string()));
            Err(ContractError::config_validation(field, message))
        }
    }
}

/// 展开嵌套错误，取第一个字段路径
fn first_violation(prefix: &str, errors: &ValidationErrors) -> Option<(String, String)> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (name, kind) in fields {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    let message = match &err.message {
                        Some(msg) => msg.to_string(),
                        None => format!("failed '{}' check", err.code),
                    };
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_violation(&path, inner) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    if let Some(found) = first_violation(&format!("{path}[{idx}]"), inner) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

/// 校验候选速度
fn validate_plausible_speeds(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    for (idx, speed) in blueprint
        .reconstruction
        .plausible_speeds_kmh
        .iter()
        .enumerate()
    {
        if !speed.is_finite() || *speed < 0.0 {
            return Err(ContractError::config_validation(
                format!("reconstruction.plausible_speeds_kmh[{idx}]"),
                format!("plausible speed must be finite and >= 0, got {speed}"),
            ));
        }
    }
    Ok(())
}

/// 校验 series 名称唯一性
fn validate_series_names(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for series in &blueprint.series {
        if !seen.insert(series.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("series[name={}]", series.name),
                "duplicate series name",
            ));
        }
    }
    Ok(())
}
