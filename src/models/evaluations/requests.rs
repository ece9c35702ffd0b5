use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{EvaluationScale, EvaluationType, MAX_TOTAL_WEIGHT};
use crate::models::common::PaginationQuery;
use crate::utils::validate::{validate_length, validate_max_length};

fn validate_weight(weight: f64) -> Result<(), String> {
    if !weight.is_finite() || weight <= 0.0 || weight > MAX_TOTAL_WEIGHT {
        return Err(format!("权重必须大于 0 且不超过 {MAX_TOTAL_WEIGHT}"));
    }
    Ok(())
}

/// 创建评估请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CreateEvaluationRequest {
    pub name: String,
    pub description: Option<String>,
    pub evaluation_type: EvaluationType,
    #[serde(default = "default_scale")]
    pub scale: EvaluationScale,
    pub weight: f64,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub course_id: i64,
    pub period_id: i64,
}

fn default_scale() -> EvaluationScale {
    EvaluationScale::Numeric
}

impl CreateEvaluationRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_length("评估名称", &self.name, 3, 150)?;
        validate_max_length("描述", self.description.as_deref(), 2000)?;
        validate_weight(self.weight)
    }
}

/// 更新评估请求（课程与学期不可修改）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct UpdateEvaluationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub evaluation_type: Option<EvaluationType>,
    pub scale: Option<EvaluationScale>,
    pub weight: Option<f64>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl UpdateEvaluationRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref name) = self.name {
            validate_length("评估名称", name, 3, 150)?;
        }
        validate_max_length("描述", self.description.as_deref(), 2000)?;
        if let Some(weight) = self.weight {
            validate_weight(weight)?;
        }
        Ok(())
    }
}

/// 评估列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub course_id: Option<i64>,
    pub period_id: Option<i64>,
    pub evaluation_type: Option<EvaluationType>,
    pub scale: Option<EvaluationScale>,
    pub search: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct EvaluationListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub course_id: Option<i64>,
    pub period_id: Option<i64>,
    pub evaluation_type: Option<EvaluationType>,
    pub scale: Option<EvaluationScale>,
    pub search: Option<String>,
}

impl From<EvaluationListParams> for EvaluationListQuery {
    fn from(params: EvaluationListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            course_id: params.course_id,
            period_id: params.period_id,
            evaluation_type: params.evaluation_type,
            scale: params.scale,
            search: params.search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(weight: f64) -> CreateEvaluationRequest {
        CreateEvaluationRequest {
            name: "Examen parcial".to_string(),
            description: None,
            evaluation_type: EvaluationType::Exam,
            scale: EvaluationScale::Numeric,
            weight,
            scheduled_at: None,
            course_id: 1,
            period_id: 1,
        }
    }

    #[test]
    fn test_weight_bounds() {
        assert!(request(30.0).validate().is_ok());
        assert!(request(100.0).validate().is_ok());
        assert!(request(0.0).validate().is_err());
        assert!(request(-5.0).validate().is_err());
        assert!(request(100.5).validate().is_err());
        assert!(request(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_name_length() {
        let mut req = request(20.0);
        req.name = "Ex".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_partial() {
        assert!(UpdateEvaluationRequest::default().validate().is_ok());
        let req = UpdateEvaluationRequest {
            weight: Some(0.0),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
