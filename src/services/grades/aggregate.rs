//! 加权成绩汇总
//!
//! 学生在某学期某课程的平均分 = Σ 成绩·权重 / Σ 权重，
//! 未录入成绩的评估不参与计算；没有成绩或权重和为 0 时结果为 0。

use std::collections::HashMap;

use crate::models::academic::entities::Course;
use crate::models::evaluations::entities::Evaluation;
use crate::models::grades::entities::{Grade, GradeLevel};
use crate::models::grades::responses::{
    DistributionBucket, GradeSummary, ReportCourseRow, StudentResult,
};
use crate::models::users::entities::{User, UserSummary};

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 加权平均，输入为 (成绩, 权重)
pub fn weighted_average<I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (sum, weights) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(sum, weights), (value, weight)| {
            (sum + value * weight, weights + weight)
        });
    if weights > 0.0 { sum / weights } else { 0.0 }
}

/// 单个学生在一组评估上的加权平均和已评分数量
pub fn student_average(evaluations: &[Evaluation], grades: &[&Grade]) -> (f64, i64) {
    let weights: HashMap<i64, f64> = evaluations.iter().map(|e| (e.id, e.weight)).collect();
    let pairs: Vec<(f64, f64)> = grades
        .iter()
        .filter_map(|g| weights.get(&g.evaluation_id).map(|w| (g.value, *w)))
        .collect();
    let graded = pairs.len() as i64;
    (weighted_average(pairs), graded)
}

/// 课程结果：每个学生一行，按平均分降序（并列按学生 ID 升序），密集排名
///
/// 汇总统计基于未取整的平均分，与每行的等级一致。
pub fn course_results(
    students: &[UserSummary],
    evaluations: &[Evaluation],
    grades: &[Grade],
) -> (Vec<StudentResult>, GradeSummary) {
    let mut by_student: HashMap<i64, Vec<&Grade>> = HashMap::new();
    for grade in grades {
        by_student.entry(grade.student_id).or_default().push(grade);
    }

    let total_evaluations = evaluations.len() as i64;
    let mut rows: Vec<(f64, StudentResult)> = students
        .iter()
        .map(|student| {
            let own = by_student.get(&student.id).map(Vec::as_slice).unwrap_or(&[]);
            let (average, graded_count) = student_average(evaluations, own);
            let classification = GradeLevel::from_score(average);
            let row = StudentResult {
                student: student.clone(),
                average: round2(average),
                classification,
                literal: classification.literal(),
                graded_count,
                total_evaluations,
                rank: 0,
            };
            (average, row)
        })
        .collect();

    rows.sort_by(|(a, ra), (b, rb)| {
        b.total_cmp(a)
            .then_with(|| ra.student.id.cmp(&rb.student.id))
    });

    let averages: Vec<f64> = rows.iter().map(|(average, _)| *average).collect();
    let summary = summarize(&averages);

    let mut rank = 0;
    let mut previous: Option<f64> = None;
    let rows = rows
        .into_iter()
        .map(|(average, mut row)| {
            if previous != Some(average) {
                rank += 1;
                previous = Some(average);
            }
            row.rank = rank;
            row
        })
        .collect();
    (rows, summary)
}

/// 汇总统计；空输入时各项为 0
pub fn summarize(values: &[f64]) -> GradeSummary {
    if values.is_empty() {
        return GradeSummary {
            count: 0,
            average: 0.0,
            max: 0.0,
            min: 0.0,
            approved_count: 0,
            approval_rate: 0.0,
        };
    }
    let count = values.len() as i64;
    let sum: f64 = values.iter().sum();
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let approved_count = values
        .iter()
        .filter(|v| GradeLevel::from_score(**v).is_passing())
        .count() as i64;

    GradeSummary {
        count,
        average: round2(sum / count as f64),
        max: round2(max),
        min: round2(min),
        approved_count,
        approval_rate: round2(approved_count as f64 / count as f64 * 100.0),
    }
}

/// 按等级区间计数，固定顺序 18-20, 14-17, 11-13, 0-10
pub fn distribution(values: &[f64]) -> Vec<DistributionBucket> {
    level_distribution(values.iter().map(|v| GradeLevel::from_score(*v)))
}

/// 按已知等级计数（课程结果按未取整的平均分定级）
pub fn level_distribution<I>(levels: I) -> Vec<DistributionBucket>
where
    I: IntoIterator<Item = GradeLevel>,
{
    let mut counts: HashMap<GradeLevel, i64> = HashMap::new();
    for level in levels {
        *counts.entry(level).or_default() += 1;
    }
    GradeLevel::ALL
        .iter()
        .map(|level| DistributionBucket {
            range: level.range().to_string(),
            classification: *level,
            count: counts.get(level).copied().unwrap_or(0),
        })
        .collect()
}

/// 学生成绩单：每门在该学期有评估的课程一行，返回各行与未取整的总平均
///
/// `grades` 应只包含该学生的成绩。没有评估的课程不出现在成绩单中。
pub fn student_report(
    courses: &[Course],
    evaluations: &[Evaluation],
    grades: &[Grade],
) -> (Vec<ReportCourseRow>, f64) {
    let grade_refs: Vec<&Grade> = grades.iter().collect();
    let mut averages = Vec::new();
    let rows = courses
        .iter()
        .filter_map(|course| {
            let own: Vec<Evaluation> = evaluations
                .iter()
                .filter(|e| e.course_id == course.id)
                .cloned()
                .collect();
            if own.is_empty() {
                return None;
            }
            let (average, graded_count) = student_average(&own, &grade_refs);
            averages.push(average);
            let classification = GradeLevel::from_score(average);
            Some(ReportCourseRow {
                course_id: course.id,
                course_code: course.code.clone(),
                course_name: course.name.clone(),
                average: round2(average),
                classification,
                literal: classification.literal(),
                graded_count,
                total_evaluations: own.len() as i64,
            })
        })
        .collect();

    let overall = if averages.is_empty() {
        0.0
    } else {
        averages.iter().sum::<f64>() / averages.len() as f64
    };
    (rows, overall)
}

/// 成绩单中对查看者可见的课程：管理员可见全部，其他人只可见自己任教的课程
pub fn courses_visible_to(courses: Vec<Course>, viewer: &User) -> Vec<Course> {
    if viewer.is_admin() {
        return courses;
    }
    courses
        .into_iter()
        .filter(|c| c.teacher_id == viewer.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::{EvaluationScale, EvaluationType};
    use chrono::Utc;

    fn evaluation(id: i64, weight: f64) -> Evaluation {
        Evaluation {
            id,
            name: format!("Eval {id}"),
            description: None,
            evaluation_type: EvaluationType::Exam,
            scale: EvaluationScale::Numeric,
            weight,
            scheduled_at: None,
            course_id: 1,
            period_id: 1,
            created_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn grade(student_id: i64, evaluation_id: i64, value: f64) -> Grade {
        Grade {
            id: student_id * 100 + evaluation_id,
            student_id,
            evaluation_id,
            value,
            comment: None,
            graded_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn student(id: i64) -> UserSummary {
        UserSummary {
            id,
            username: format!("alumno{id}"),
            display_name: None,
        }
    }

    #[test]
    fn test_weighted_average_example() {
        let avg = weighted_average([(15.0, 30.0), (18.0, 70.0)]);
        assert!((avg - 17.1).abs() < 1e-9);
        assert_eq!(GradeLevel::from_score(avg), GradeLevel::Bueno);
    }

    #[test]
    fn test_weighted_average_empty_and_zero_weight() {
        let avg = weighted_average(Vec::new());
        assert_eq!(avg, 0.0);
        assert_eq!(GradeLevel::from_score(avg), GradeLevel::Desaprobado);
        assert_eq!(weighted_average([(20.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_missing_grades_are_excluded() {
        let evaluations = vec![evaluation(1, 30.0), evaluation(2, 70.0)];
        let g = grade(5, 1, 15.0);
        let (avg, graded) = student_average(&evaluations, &[&g]);
        assert_eq!(avg, 15.0);
        assert_eq!(graded, 1);
    }

    #[test]
    fn test_grades_outside_evaluations_are_ignored() {
        let evaluations = vec![evaluation(1, 50.0)];
        let inside = grade(5, 1, 12.0);
        let outside = grade(5, 9, 20.0);
        let (avg, graded) = student_average(&evaluations, &[&inside, &outside]);
        assert_eq!(avg, 12.0);
        assert_eq!(graded, 1);
    }

    #[test]
    fn test_course_results_rank_dense_with_ties() {
        let evaluations = vec![evaluation(1, 40.0), evaluation(2, 60.0)];
        let grades = vec![
            grade(3, 1, 14.0),
            grade(3, 2, 14.0),
            grade(1, 1, 18.0),
            grade(1, 2, 19.0),
            grade(2, 1, 14.0),
            grade(2, 2, 14.0),
        ];
        let students = vec![student(1), student(2), student(3), student(4)];
        let (rows, summary) = course_results(&students, &evaluations, &grades);

        let order: Vec<(i64, i64)> = rows.iter().map(|r| (r.student.id, r.rank)).collect();
        assert_eq!(order, vec![(1, 1), (2, 2), (3, 2), (4, 3)]);
        assert_eq!(rows[0].average, 18.6);
        assert_eq!(rows[0].classification, GradeLevel::Excelente);
        assert_eq!(rows[3].average, 0.0);
        assert_eq!(rows[3].graded_count, 0);
        assert_eq!(rows[3].total_evaluations, 2);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.approved_count, 3);
    }

    #[test]
    fn test_course_summary_agrees_with_classification_near_boundary() {
        let evaluations = vec![evaluation(1, 100.0)];
        let grades = vec![grade(1, 1, 10.996), grade(2, 1, 11.0)];
        let (rows, summary) = course_results(&[student(1), student(2)], &evaluations, &grades);

        let below = rows.iter().find(|r| r.student.id == 1).unwrap();
        assert_eq!(below.average, 11.0);
        assert_eq!(below.classification, GradeLevel::Desaprobado);

        assert_eq!(summary.approved_count, 1);
        assert_eq!(summary.approval_rate, 50.0);
        let buckets = level_distribution(rows.iter().map(|r| r.classification));
        let failed = buckets.iter().find(|b| b.range == "0-10").unwrap();
        assert_eq!(failed.count, rows.len() as i64 - summary.approved_count);
    }

    #[test]
    fn test_summary() {
        let s = summarize(&[18.0, 12.0, 9.0, 10.5]);
        assert_eq!(s.count, 4);
        assert_eq!(s.average, 12.38);
        assert_eq!(s.max, 18.0);
        assert_eq!(s.min, 9.0);
        assert_eq!(s.approved_count, 2);
        assert_eq!(s.approval_rate, 50.0);

        let empty = summarize(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.approval_rate, 0.0);
    }

    #[test]
    fn test_distribution_order_and_bands() {
        let buckets = distribution(&[20.0, 18.0, 17.5, 14.0, 13.9, 11.0, 10.9, 0.0]);
        let ranges: Vec<&str> = buckets.iter().map(|b| b.range.as_str()).collect();
        assert_eq!(ranges, vec!["18-20", "14-17", "11-13", "0-10"]);
        let counts: Vec<i64> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_distribution_empty_keeps_all_buckets() {
        let buckets = distribution(&[]);
        assert_eq!(buckets.len(), 4);
        assert!(buckets.iter().all(|b| b.count == 0));
    }

    fn course(id: i64, code: &str) -> Course {
        Course {
            id,
            code: code.to_string(),
            name: format!("Curso {code}"),
            description: None,
            teacher_id: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_level_distribution_uses_given_levels() {
        // 17.996 取整后为 18.0，但按未取整结果定级为 Bueno
        let buckets = level_distribution([GradeLevel::from_score(17.996)]);
        assert_eq!(buckets[0].count, 0);
        assert_eq!(buckets[1].count, 1);
    }

    #[test]
    fn test_student_report_rows() {
        let courses = vec![course(1, "MAT-101"), course(2, "COM-101"), course(3, "ART-101")];
        let mut e3 = evaluation(3, 100.0);
        e3.course_id = 2;
        let evaluations = vec![evaluation(1, 30.0), evaluation(2, 70.0), e3];
        let grades = vec![grade(5, 1, 15.0), grade(5, 2, 18.0), grade(5, 3, 10.0)];

        let (rows, overall) = student_report(&courses, &evaluations, &grades);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].course_code, "MAT-101");
        assert_eq!(rows[0].average, 17.1);
        assert_eq!(rows[0].classification, GradeLevel::Bueno);
        assert_eq!(rows[0].total_evaluations, 2);
        assert_eq!(rows[1].average, 10.0);
        assert_eq!(rows[1].classification, GradeLevel::Desaprobado);
        assert!((overall - 13.55).abs() < 1e-9);
    }

    #[test]
    fn test_courses_visible_to_teacher_only_own() {
        use crate::models::users::entities::{UserRole, UserStatus};

        let viewer = |id: i64, role: UserRole| User {
            id,
            username: format!("u{id}"),
            email: format!("u{id}@colegio.edu.pe"),
            display_name: None,
            role,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut other = course(2, "COM-101");
        other.teacher_id = 7;
        let courses = vec![course(1, "MAT-101"), other];

        let own = courses_visible_to(courses.clone(), &viewer(1, UserRole::Teacher));
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].code, "MAT-101");

        assert!(courses_visible_to(courses.clone(), &viewer(9, UserRole::Teacher)).is_empty());
        assert_eq!(courses_visible_to(courses, &viewer(9, UserRole::Admin)).len(), 2);
    }
}
