use chrono::{Duration, Utc};

use crate::models::common::apply_filter;

use super::SeaOrmStorage;
use crate::models::{
    academic::requests::{CourseListQuery, CreateCourseRequest, CreatePeriodRequest},
    announcements::{
        entities::{AnnouncementFilter, Audience},
        requests::{
            AnnouncementListQuery, CreateAnnouncementRequest, UpdateAnnouncementRequest,
        },
    },
    evaluations::{
        entities::{EvaluationScale, EvaluationType},
        requests::CreateEvaluationRequest,
    },
    events::{
        entities::{EventModality, EventType, RegistrationRejection},
        requests::CreateEventRequest,
    },
    permissions::{
        defaults::codes,
        entities::ValidityWindow,
        requests::{CreatePermissionRequest, CreateRoleRequest},
    },
    users::{entities::{User, UserRole}, requests::CreateUserRequest},
};
use crate::storage::{GradeWrite, Storage};

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::new_in_memory().await.unwrap()
}

async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@colegio.edu.pe"),
            role,
            display_name: None,
        })
        .await
        .unwrap()
}

/// 返回 (教师, 课程 ID, 学期 ID)
async fn course_setup(storage: &SeaOrmStorage) -> (User, i64, i64) {
    let teacher = user(storage, "docente", UserRole::Teacher).await;
    let now = Utc::now();
    let period = storage
        .create_period(CreatePeriodRequest {
            name: "2025-I".to_string(),
            starts_on: now - Duration::days(30),
            ends_on: now + Duration::days(90),
            is_current: Some(true),
        })
        .await
        .unwrap();
    let course = storage
        .create_course(CreateCourseRequest {
            code: "MAT-101".to_string(),
            name: "Matemática".to_string(),
            description: None,
            teacher_id: teacher.id,
        })
        .await
        .unwrap();
    (teacher, course.id, period.id)
}

fn event_request(capacity: Option<i32>) -> CreateEventRequest {
    let start = Utc::now() + Duration::days(7);
    CreateEventRequest {
        title: "Feria de ciencias".to_string(),
        description: None,
        event_type: EventType::Academic,
        start_at: start,
        end_at: start + Duration::hours(3),
        all_day: false,
        location: Some("Patio central".to_string()),
        modality: EventModality::InPerson,
        meeting_url: None,
        requires_registration: true,
        capacity,
        registration_deadline: None,
    }
}

fn evaluation_request(course_id: i64, period_id: i64, weight: f64) -> CreateEvaluationRequest {
    CreateEvaluationRequest {
        name: "Examen parcial".to_string(),
        description: None,
        evaluation_type: EvaluationType::Exam,
        scale: EvaluationScale::Numeric,
        weight,
        scheduled_at: None,
        course_id,
        period_id,
    }
}

#[tokio::test]
async fn test_enrollment_round_trip() {
    let storage = storage().await;
    let (_, course_id, _) = course_setup(&storage).await;
    let student = user(&storage, "alumno1", UserRole::Student).await;

    storage.enroll_student(course_id, student.id).await.unwrap();
    assert!(storage.is_student_enrolled(course_id, student.id).await.unwrap());

    let students = storage.list_course_students(course_id).await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].student.id, student.id);

    let courses = storage.list_student_courses(student.id).await.unwrap();
    assert_eq!(courses[0].id, course_id);

    assert!(storage.unenroll_student(course_id, student.id).await.unwrap());
    assert!(!storage.is_student_enrolled(course_id, student.id).await.unwrap());
}

#[tokio::test]
async fn test_announcements_newest_first_with_audience() {
    let storage = storage().await;
    let author = user(&storage, "direccion", UserRole::Admin).await;
    let now = Utc::now();

    for (title, offset, for_parents) in [("Primero", 2, false), ("Segundo", 1, true)] {
        storage
            .create_announcement(
                author.id,
                CreateAnnouncementRequest {
                    title: title.to_string(),
                    content: "Contenido del comunicado".to_string(),
                    summary: None,
                    image_url: None,
                    publish_at: Some(now - Duration::hours(offset)),
                    expires_at: None,
                    for_students: true,
                    for_teachers: false,
                    for_parents,
                },
            )
            .await
            .unwrap();
    }

    let all = storage
        .list_announcements(AnnouncementListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "Segundo");
    assert_eq!(all[0].summary, "Contenido del comunicado");

    let parents = storage
        .list_announcements(AnnouncementListQuery {
            audience: Some(Audience::Parents),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].title, "Segundo");
}

#[tokio::test]
async fn test_announcement_search_accents_and_wildcards() {
    let storage = storage().await;
    let author = user(&storage, "direccion", UserRole::Admin).await;
    let now = Utc::now();

    for title in ["Reunión de padres", "Descuento 50% matrícula", "Descuento 5 útiles"] {
        storage
            .create_announcement(
                author.id,
                CreateAnnouncementRequest {
                    title: title.to_string(),
                    content: "Detalles en secretaría".to_string(),
                    summary: None,
                    image_url: None,
                    publish_at: Some(now - Duration::hours(1)),
                    expires_at: None,
                    for_students: true,
                    for_teachers: false,
                    for_parents: true,
                },
            )
            .await
            .unwrap();
    }

    let search = |term: &str| AnnouncementFilter {
        search: Some(term.to_string()),
        audience: None,
        status: None,
        author_id: None,
        now,
    };
    let all = storage
        .list_announcements(AnnouncementListQuery::default())
        .await
        .unwrap();

    let found = apply_filter(all.clone(), &search("REUNIÓN"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Reunión de padres");

    let found = apply_filter(all.clone(), &search("50%"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Descuento 50% matrícula");

    assert!(apply_filter(all, &search("5%")).is_empty());
}

#[tokio::test]
async fn test_course_search_ignores_case_and_escapes_wildcards() {
    let storage = storage().await;
    let (teacher, _, _) = course_setup(&storage).await;

    for (code, name) in [("TAL-100", "Taller 100% práctico"), ("NIV-10", "Nivel 10 avanzado")] {
        storage
            .create_course(CreateCourseRequest {
                code: code.to_string(),
                name: name.to_string(),
                description: None,
                teacher_id: teacher.id,
            })
            .await
            .unwrap();
    }

    let search = |term: &str| CourseListQuery {
        page: Some(1),
        size: Some(20),
        teacher_id: None,
        search: Some(term.to_string()),
    };

    // course_setup 创建了 "Matemática"
    let found = storage
        .list_courses_with_pagination(search("MATEMÁTICA"))
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].code, "MAT-101");

    let found = storage
        .list_courses_with_pagination(search("100%"))
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].code, "TAL-100");

    // "%" 按字面匹配，不能当作通配符命中 "Nivel 10 avanzado"
    let found = storage
        .list_courses_with_pagination(search("10%"))
        .await
        .unwrap();
    assert!(found.items.is_empty());

    let found = storage
        .list_courses_with_pagination(search("l_1"))
        .await
        .unwrap();
    assert!(found.items.is_empty());
}

#[tokio::test]
async fn test_event_registration_rules() {
    let storage = storage().await;
    let organizer = user(&storage, "organiza", UserRole::Teacher).await;
    let first = user(&storage, "alumno1", UserRole::Student).await;
    let second = user(&storage, "alumno2", UserRole::Student).await;

    let event = storage
        .create_event(organizer.id, event_request(Some(1)))
        .await
        .unwrap();

    let registration = storage
        .register_for_event(event.id, first.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(registration.user_id, first.id);

    let duplicate = storage.register_for_event(event.id, first.id).await.unwrap();
    assert_eq!(duplicate.unwrap_err(), RegistrationRejection::AlreadyRegistered);

    let full = storage.register_for_event(event.id, second.id).await.unwrap();
    assert_eq!(full.unwrap_err(), RegistrationRejection::Full);

    let counts = storage.count_event_registrations(&[event.id]).await.unwrap();
    assert_eq!(counts.get(&event.id), Some(&1));

    let attendees = storage.list_event_attendees(event.id).await.unwrap();
    assert_eq!(attendees[0].user.username, "alumno1");

    assert!(storage.cancel_event_registration(event.id, first.id).await.unwrap());
    assert!(
        storage
            .register_for_event(event.id, second.id)
            .await
            .unwrap()
            .is_ok()
    );
}

#[tokio::test]
async fn test_evaluation_weight_total() {
    let storage = storage().await;
    let (teacher, course_id, period_id) = course_setup(&storage).await;

    let first = storage
        .create_evaluation(teacher.id, evaluation_request(course_id, period_id, 40.0))
        .await
        .unwrap();
    storage
        .create_evaluation(teacher.id, evaluation_request(course_id, period_id, 35.0))
        .await
        .unwrap();

    let total = storage
        .total_evaluation_weight(course_id, period_id, None)
        .await
        .unwrap();
    assert!((total - 75.0).abs() < 1e-9);

    let without_first = storage
        .total_evaluation_weight(course_id, period_id, Some(first.id))
        .await
        .unwrap();
    assert!((without_first - 35.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_upsert_grades_overwrites() {
    let storage = storage().await;
    let (teacher, course_id, period_id) = course_setup(&storage).await;
    let student = user(&storage, "alumno1", UserRole::Student).await;
    let evaluation = storage
        .create_evaluation(teacher.id, evaluation_request(course_id, period_id, 50.0))
        .await
        .unwrap();

    let write = |value: f64| GradeWrite {
        student_id: student.id,
        value,
        comment: None,
    };

    let first = storage
        .upsert_grades(evaluation.id, teacher.id, vec![write(12.0)])
        .await
        .unwrap();
    let second = storage
        .upsert_grades(evaluation.id, teacher.id, vec![write(17.5)])
        .await
        .unwrap();
    assert_eq!(first[0].id, second[0].id);

    let grades = storage
        .list_grades_for_evaluations(&[evaluation.id], Some(student.id))
        .await
        .unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].value, 17.5);

    let page = storage
        .list_grades_by_evaluation(evaluation.id, 1, 10)
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn test_seed_runs_once() {
    let storage = storage().await;
    assert!(storage.seed_default_permissions().await.unwrap());
    assert!(!storage.seed_default_permissions().await.unwrap());

    let teacher_role = storage.get_role_by_code("TEACHER").await.unwrap().unwrap();
    let permissions = storage.list_role_permissions(teacher_role.id).await.unwrap();
    assert!(permissions.iter().any(|p| p.code == codes::GRADES_RECORD));
    assert!(!permissions.iter().any(|p| p.code == codes::PERMISSIONS_MANAGE));
}

#[tokio::test]
async fn test_permission_sources_respect_windows() {
    let storage = storage().await;
    storage.seed_default_permissions().await.unwrap();
    let student = user(&storage, "alumno1", UserRole::Student).await;
    let now = Utc::now();

    let extra = storage
        .create_permission(CreatePermissionRequest {
            code: "library.borrow".to_string(),
            name: "Préstamo de libros".to_string(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(extra.module, "library");

    let expired = storage
        .get_permission_by_code(codes::GRADES_READ)
        .await
        .unwrap()
        .unwrap();
    storage
        .grant_user_permission(
            student.id,
            expired.id,
            ValidityWindow {
                valid_from: Some(now - Duration::days(10)),
                valid_until: Some(now - Duration::days(1)),
            },
        )
        .await
        .unwrap();

    let role = storage
        .create_role(CreateRoleRequest {
            code: "LIBRARY_HELPER".to_string(),
            name: "Ayudante de biblioteca".to_string(),
            description: None,
            permission_ids: vec![extra.id],
        })
        .await
        .unwrap();
    storage
        .assign_user_role(student.id, role.id, ValidityWindow::default())
        .await
        .unwrap();

    let effective = storage
        .load_permission_sources(&student)
        .await
        .unwrap()
        .effective_at(now);

    assert_eq!(
        effective,
        vec![
            codes::EVENTS_REGISTER.to_string(),
            codes::GRADES_VIEW_OWN.to_string(),
            "library.borrow".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_cached_permission_sources_honor_window_expiry() {
    use crate::cache::MokaCacheWrapper;
    use crate::middlewares::require_permission::permission_sources;

    let storage = storage().await;
    storage.seed_default_permissions().await.unwrap();
    let student = user(&storage, "alumno2", UserRole::Student).await;
    let cache = MokaCacheWrapper::new(100, 300);
    let now = Utc::now();

    let grades_read = storage
        .get_permission_by_code(codes::GRADES_READ)
        .await
        .unwrap()
        .unwrap();
    storage
        .grant_user_permission(
            student.id,
            grades_read.id,
            ValidityWindow {
                valid_from: None,
                valid_until: Some(now + Duration::seconds(10)),
            },
        )
        .await
        .unwrap();

    let first = permission_sources(&storage, &cache, &student, 300).await.unwrap();
    assert!(first.effective_at(now).contains(&codes::GRADES_READ.to_string()));

    // 绕过失效直接写库：第二次读取必须命中缓存
    let manage = storage
        .get_permission_by_code(codes::PERMISSIONS_MANAGE)
        .await
        .unwrap()
        .unwrap();
    storage
        .grant_user_permission(student.id, manage.id, ValidityWindow::default())
        .await
        .unwrap();

    let cached = permission_sources(&storage, &cache, &student, 300).await.unwrap();
    let later = cached.effective_at(now + Duration::seconds(20));
    assert!(!later.contains(&codes::PERMISSIONS_MANAGE.to_string()));
    assert!(!later.contains(&codes::GRADES_READ.to_string()));
    assert!(later.contains(&codes::EVENTS_REGISTER.to_string()));
}

#[tokio::test]
async fn test_update_announcement_clears_expiry() {
    let storage = storage().await;
    let author = user(&storage, "direccion", UserRole::Admin).await;
    let now = Utc::now();

    let created = storage
        .create_announcement(
            author.id,
            CreateAnnouncementRequest {
                title: "Simulacro".to_string(),
                content: "Simulacro de sismo el viernes".to_string(),
                summary: None,
                image_url: None,
                publish_at: Some(now - Duration::hours(1)),
                expires_at: Some(now + Duration::days(2)),
                for_students: true,
                for_teachers: true,
                for_parents: false,
            },
        )
        .await
        .unwrap();
    assert!(created.expires_at.is_some());

    let update = |expires_at| UpdateAnnouncementRequest {
        title: None,
        content: None,
        summary: None,
        image_url: None,
        publish_at: None,
        expires_at,
        for_students: None,
        for_teachers: None,
        for_parents: None,
    };

    // 缺省不修改
    let kept = storage
        .update_announcement(created.id, update(None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.expires_at, created.expires_at);

    let cleared = storage
        .update_announcement(created.id, update(Some(None)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.expires_at, None);
}
