//! Enrollment Repositories

mod enrollments;
mod links;

pub(crate) use enrollments::PgEnrollmentsRepository;
pub(crate) use links::PgEnrollmentLinksRepository;
