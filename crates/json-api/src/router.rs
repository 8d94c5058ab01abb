//! App Router
//!
//! Every route sits behind a [`Gate`] naming the roles it admits.

use salvo::Router;

use crate::{auth, auth::Gate, enrollments, healthcheck, offerings};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(auth_router())
        .push(offerings_router())
        .push(enrollments_router())
}

fn auth_router() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("register").post(auth::register::handler))
        .push(Router::with_path("login").post(auth::login::handler))
        .push(
            Router::with_path("logout")
                .hoop(Gate::authenticated())
                .post(auth::logout::handler),
        )
}

fn offerings_router() -> Router {
    Router::with_path("offerings")
        .push(
            Router::new()
                .hoop(Gate::public())
                .get(offerings::index::handler)
                .push(Router::with_path("{offering}").get(offerings::get::handler)),
        )
        .push(
            Router::new()
                .hoop(Gate::staff())
                .post(offerings::create::handler)
                .push(
                    Router::with_path("{offering}")
                        .put(offerings::update::handler)
                        .delete(offerings::delete::handler)
                        .push(Router::with_path("status").put(offerings::status::handler)),
                ),
        )
        .push(
            Router::with_path("{offering}/enroll")
                .hoop(Gate::members())
                .post(enrollments::add_offering::handler),
        )
}

fn enrollments_router() -> Router {
    Router::with_path("enrollments")
        .push(
            Router::new()
                .hoop(Gate::members())
                .get(enrollments::index::handler)
                .post(enrollments::create::handler)
                .push(
                    Router::with_path("{enrollment}")
                        .get(enrollments::get::handler)
                        .delete(enrollments::delete::handler)
                        .push(Router::with_path("status").put(enrollments::status::handler))
                        .push(
                            Router::with_path("offerings")
                                .get(enrollments::links::index::handler)
                                .put(enrollments::links::update::handler)
                                .push(
                                    Router::with_path("{offering}")
                                        .delete(enrollments::links::delete::handler),
                                ),
                        ),
                ),
        )
        .push(
            Router::with_path("{enrollment}")
                .hoop(Gate::staff())
                .push(Router::with_path("decision").put(enrollments::decision::handler))
                .push(
                    Router::with_path("offerings/{offering}/availability")
                        .put(enrollments::links::availability::handler),
                ),
        )
}
