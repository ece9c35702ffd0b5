use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 二十分制的满分
pub const MAX_SCORE: f64 = 20.0;
/// 及格线
pub const PASSING_SCORE: f64 = 11.0;

/// 成绩
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub evaluation_id: i64,
    pub value: f64,
    pub comment: Option<String>,
    pub graded_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 成绩等级（二十分制）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeLevel {
    Excelente,
    Bueno,
    Aprobado,
    Desaprobado,
}

impl GradeLevel {
    /// 从高到低的固定顺序，分布统计按此输出
    pub const ALL: [GradeLevel; 4] = [
        GradeLevel::Excelente,
        GradeLevel::Bueno,
        GradeLevel::Aprobado,
        GradeLevel::Desaprobado,
    ];

    pub fn from_score(score: f64) -> Self {
        if score >= 18.0 {
            GradeLevel::Excelente
        } else if score >= 14.0 {
            GradeLevel::Bueno
        } else if score >= PASSING_SCORE {
            GradeLevel::Aprobado
        } else {
            GradeLevel::Desaprobado
        }
    }

    /// 分布区间标签
    pub fn range(&self) -> &'static str {
        match self {
            GradeLevel::Excelente => "18-20",
            GradeLevel::Bueno => "14-17",
            GradeLevel::Aprobado => "11-13",
            GradeLevel::Desaprobado => "0-10",
        }
    }

    pub fn literal(&self) -> GradeLiteral {
        match self {
            GradeLevel::Excelente => GradeLiteral::AD,
            GradeLevel::Bueno => GradeLiteral::A,
            GradeLevel::Aprobado => GradeLiteral::B,
            GradeLevel::Desaprobado => GradeLiteral::C,
        }
    }

    pub fn is_passing(&self) -> bool {
        !matches!(self, GradeLevel::Desaprobado)
    }
}

impl std::fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GradeLevel::Excelente => "Excelente",
            GradeLevel::Bueno => "Bueno",
            GradeLevel::Aprobado => "Aprobado",
            GradeLevel::Desaprobado => "Desaprobado",
        };
        write!(f, "{label}")
    }
}

/// 字母等级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeLiteral {
    AD,
    A,
    B,
    C,
}

impl GradeLiteral {
    /// 字母等级换算为二十分制分数
    pub fn to_score(&self) -> f64 {
        match self {
            GradeLiteral::AD => 19.0,
            GradeLiteral::A => 15.5,
            GradeLiteral::B => 12.0,
            GradeLiteral::C => 5.0,
        }
    }
}

impl std::str::FromStr for GradeLiteral {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AD" => Ok(GradeLiteral::AD),
            "A" => Ok(GradeLiteral::A),
            "B" => Ok(GradeLiteral::B),
            "C" => Ok(GradeLiteral::C),
            _ => Err(format!("无效的字母等级: '{s}'. 支持: AD, A, B, C")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(GradeLevel::from_score(20.0), GradeLevel::Excelente);
        assert_eq!(GradeLevel::from_score(18.0), GradeLevel::Excelente);
        assert_eq!(GradeLevel::from_score(17.9), GradeLevel::Bueno);
        assert_eq!(GradeLevel::from_score(14.0), GradeLevel::Bueno);
        assert_eq!(GradeLevel::from_score(13.99), GradeLevel::Aprobado);
        assert_eq!(GradeLevel::from_score(11.0), GradeLevel::Aprobado);
        assert_eq!(GradeLevel::from_score(10.9), GradeLevel::Desaprobado);
        assert_eq!(GradeLevel::from_score(0.0), GradeLevel::Desaprobado);
    }

    #[test]
    fn test_literal_mapping_lands_in_its_band() {
        for level in GradeLevel::ALL {
            let literal = level.literal();
            assert_eq!(GradeLevel::from_score(literal.to_score()), level);
        }
        assert_eq!(GradeLiteral::A.to_score(), 15.5);
    }

    #[test]
    fn test_literal_parse() {
        assert_eq!("ad".parse::<GradeLiteral>(), Ok(GradeLiteral::AD));
        assert_eq!(" B ".parse::<GradeLiteral>(), Ok(GradeLiteral::B));
        assert!("D".parse::<GradeLiteral>().is_err());
    }

    #[test]
    fn test_level_serializes_as_label() {
        let json = serde_json::to_string(&GradeLevel::Bueno).unwrap();
        assert_eq!(json, "\"Bueno\"");
        assert_eq!(GradeLevel::Desaprobado.to_string(), "Desaprobado");
    }
}
