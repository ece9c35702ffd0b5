pub mod academic;

pub mod announcements;

pub mod evaluations;

pub mod events;

pub mod grades;

pub mod permissions;

pub mod users;

pub mod frontend;

pub use academic::configure_academic_routes;
pub use announcements::configure_announcement_routes;
pub use evaluations::configure_evaluation_routes;
pub use events::configure_event_routes;
pub use frontend::configure_frontend_routes;
pub use grades::configure_grade_routes;
pub use permissions::configure_permission_routes;
pub use users::configure_user_routes;
