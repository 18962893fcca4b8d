//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use contracts::{ContractError, SessionBlueprint};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式（大小写不敏感）
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// 错误信息中使用的格式名
    pub fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }
}

/// 解析 TOML 格式会话
pub fn parse_toml(content: &str) -> Result<SessionBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::config_parse(ConfigFormat::Toml.name(), e))
}

/// 解析 JSON 格式会话
pub fn parse_json(content: &str) -> Result<SessionBlueprint, ContractError> {
    serde_json::from_str(content)
        .map_err(|e| ContractError::config_parse(ConfigFormat::Json.name(), e))
}

/// 根据格式解析会话
pub fn parse(content: &str, format: ConfigFormat) -> Result<SessionBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

/// 按格式序列化会话
pub fn serialize(
    blueprint: &SessionBlueprint,
    format: ConfigFormat,
) -> Result<String, ContractError> {
    let result = match format {
        ConfigFormat::Toml => toml::to_string_pretty(blueprint).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::to_string_pretty(blueprint).map_err(|e| e.to_string()),
    };
    result.map_err(|message| ContractError::config_serialize(format.name(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
version = "V1"

[reconstruction]
frame_rate = 30.0
outlier_threshold_kmh = 40.0
plausible_speeds_kmh = [65.0, 115.0]
slope_window = 3

[analysis]
nudge_step_m = 0.5

[[series]]
name = "u9x"
path = "data/u9x_database.csv"
offset_m = 1.5
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.reconstruction.outlier_threshold_kmh, 40.0);
        assert_eq!(bp.reconstruction.plausible_speeds_kmh, vec![65.0, 115.0]);
        assert_eq!(bp.reconstruction.slope_window, 3);
        assert_eq!(bp.analysis.nudge_step_m, 0.5);
        assert_eq!(bp.series[0].name, "u9x");
        assert_eq!(bp.series[0].offset_m, 1.5);
    }

    #[test]
    fn test_parse_empty_toml_uses_defaults() {
        let bp = parse_toml("").unwrap();
        assert_eq!(bp.reconstruction.frame_rate, 30.0);
        assert_eq!(bp.reconstruction.plausible_speeds_kmh.len(), 9);
        assert_eq!(bp.analysis.nudge_step_m, 1.0);
        assert!(bp.series.is_empty());
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "reconstruction": { "frame_rate": 25.0 },
            "series": [
                { "name": "a", "path": "a.csv" },
                { "name": "b", "path": "b.csv", "offset_m": -2.0 }
            ]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.reconstruction.frame_rate, 25.0);
        assert_eq!(bp.reconstruction.slope_window, 5);
        assert_eq!(bp.series[0].offset_m, 0.0);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { format: "TOML", .. }));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[test]
    fn test_parse_toml_missing_series_path() {
        let content = r#"
[[series]]
name = "a"
"#;
        assert!(matches!(
            parse_toml(content),
            Err(ContractError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_format_from_extension() {
        for (ext, expected) in [
            ("toml", Some(ConfigFormat::Toml)),
            ("TOML", Some(ConfigFormat::Toml)),
            ("Json", Some(ConfigFormat::Json)),
            ("yaml", None),
            ("", None),
        ] {
            assert_eq!(ConfigFormat::from_extension(ext), expected, "extension {ext:?}");
        }
    }
}
