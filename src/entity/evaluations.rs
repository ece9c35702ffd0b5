//! 评估实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub evaluation_type: String,
    pub scale: String,
    pub weight: f64,
    pub scheduled_at: Option<i64>,
    pub course_id: i64,
    pub period_id: i64,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::periods::Entity",
        from = "Column::PeriodId",
        to = "super::periods::Column::Id"
    )]
    Period,
    #[sea_orm(has_many = "super::grades::Entity")]
    Grades,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use crate::models::evaluations::entities::{Evaluation, EvaluationScale, EvaluationType};

        Evaluation {
            id: self.id,
            name: self.name,
            description: self.description,
            evaluation_type: self
                .evaluation_type
                .parse::<EvaluationType>()
                .unwrap_or(EvaluationType::Exam),
            scale: self
                .scale
                .parse::<EvaluationScale>()
                .unwrap_or(EvaluationScale::Numeric),
            weight: self.weight,
            scheduled_at: self.scheduled_at.map(super::to_datetime),
            course_id: self.course_id,
            period_id: self.period_id,
            created_by: self.created_by,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
