use serde::Deserialize;
use ts_rs::TS;

use super::entities::{GradeLiteral, MAX_SCORE};
use crate::models::common::PaginationQuery;
use crate::models::evaluations::entities::EvaluationScale;
use crate::utils::validate::validate_max_length;

/// 成绩输入：数值，或字母等级（仅字母制评估）
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeInput {
    Score(f64),
    Literal(String),
}

impl GradeInput {
    /// 按评估的计分方式解析为二十分制分数
    pub fn resolve(&self, scale: EvaluationScale) -> Result<f64, String> {
        let value = match self {
            GradeInput::Score(score) => *score,
            GradeInput::Literal(text) => {
                if scale != EvaluationScale::Literal {
                    return Err("只有字母制评估可以使用字母等级".to_string());
                }
                text.parse::<GradeLiteral>()?.to_score()
            }
        };
        if !value.is_finite() || !(0.0..=MAX_SCORE).contains(&value) {
            return Err(format!("成绩必须在 0 到 {MAX_SCORE} 之间"));
        }
        Ok(value)
    }
}

/// 校验评语，描述制评估必须填写评语
pub fn validate_comment(scale: EvaluationScale, comment: Option<&str>) -> Result<(), String> {
    validate_max_length("评语", comment, 500)?;
    if scale == EvaluationScale::Descriptive && comment.is_none_or(|c| c.trim().is_empty()) {
        return Err("描述制评估必须填写评语".to_string());
    }
    Ok(())
}

/// 录入成绩（按学生 + 评估新增或覆盖）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct RecordGradeRequest {
    pub student_id: i64,
    pub evaluation_id: i64,
    pub value: GradeInput,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct BulkGradeItem {
    pub student_id: i64,
    pub value: GradeInput,
    pub comment: Option<String>,
}

/// 批量录入同一评估的成绩
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct BulkGradeRequest {
    pub grades: Vec<BulkGradeItem>,
}

impl BulkGradeRequest {
    pub const MAX_ITEMS: usize = 500;

    pub fn validate_shape(&self) -> Result<(), String> {
        if self.grades.is_empty() {
            return Err("成绩列表不能为空".to_string());
        }
        if self.grades.len() > Self::MAX_ITEMS {
            return Err(format!("单次最多录入 {} 条成绩", Self::MAX_ITEMS));
        }
        let mut seen = std::collections::HashSet::new();
        for item in &self.grades {
            if !seen.insert(item.student_id) {
                return Err(format!("学生 {} 重复出现", item.student_id));
            }
        }
        Ok(())
    }
}

/// 更新成绩请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRequest {
    pub value: Option<GradeInput>,
    pub comment: Option<String>,
}

/// 成绩列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}

/// 课程成绩结果查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CourseResultsParams {
    pub period_id: i64,
}

/// 学生成绩单查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentReportParams {
    pub period_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_input() {
        let input = GradeInput::Score(15.0);
        assert_eq!(input.resolve(EvaluationScale::Numeric), Ok(15.0));
        assert!(GradeInput::Score(20.5).resolve(EvaluationScale::Numeric).is_err());
        assert!(GradeInput::Score(-1.0).resolve(EvaluationScale::Numeric).is_err());
    }

    #[test]
    fn test_literal_input() {
        let input = GradeInput::Literal("AD".to_string());
        assert_eq!(input.resolve(EvaluationScale::Literal), Ok(19.0));
        assert!(input.resolve(EvaluationScale::Numeric).is_err());
        assert!(
            GradeInput::Literal("Z".to_string())
                .resolve(EvaluationScale::Literal)
                .is_err()
        );
    }

    #[test]
    fn test_untagged_deserialize() {
        let req: RecordGradeRequest =
            serde_json::from_str(r#"{"student_id":3,"evaluation_id":7,"value":"B"}"#).unwrap();
        assert!(matches!(req.value, GradeInput::Literal(ref s) if s == "B"));
        let req: RecordGradeRequest =
            serde_json::from_str(r#"{"student_id":3,"evaluation_id":7,"value":14.5}"#).unwrap();
        assert!(matches!(req.value, GradeInput::Score(v) if v == 14.5));
    }

    #[test]
    fn test_descriptive_requires_comment() {
        assert!(validate_comment(EvaluationScale::Descriptive, None).is_err());
        assert!(validate_comment(EvaluationScale::Descriptive, Some("  ")).is_err());
        assert!(validate_comment(EvaluationScale::Descriptive, Some("Buen avance")).is_ok());
        assert!(validate_comment(EvaluationScale::Numeric, None).is_ok());
        let long = "x".repeat(501);
        assert!(validate_comment(EvaluationScale::Numeric, Some(&long)).is_err());
    }

    #[test]
    fn test_bulk_rejects_duplicates() {
        let item = |id| BulkGradeItem {
            student_id: id,
            value: GradeInput::Score(12.0),
            comment: None,
        };
        let ok = BulkGradeRequest {
            grades: vec![item(1), item(2)],
        };
        assert!(ok.validate_shape().is_ok());
        let dup = BulkGradeRequest {
            grades: vec![item(1), item(1)],
        };
        assert!(dup.validate_shape().is_err());
        assert!(BulkGradeRequest { grades: vec![] }.validate_shape().is_err());
    }
}
