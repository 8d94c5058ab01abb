//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use courses_app::{
    auth::{Identity, MockAccessGate, MockAccountsService, Role, UserUuid},
    context::AppContext,
    domain::{enrollments::MockEnrollmentsService, offerings::MockOfferingsService},
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_USER: Identity = Identity::new(TEST_USER_UUID, Role::User);

pub(crate) const TEST_MODERATOR: Identity = Identity::new(
    UserUuid::from_uuid(Uuid::from_u128(0x0195_0000_0000_7000_8000_0000_0000_0001)),
    Role::Moderator,
);

/// Stands in for the access gate by admitting a fixed identity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InjectIdentity(pub(crate) Identity);

#[salvo::handler]
impl InjectIdentity {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_identity(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

fn strict_access_mock() -> MockAccessGate {
    let mut access = MockAccessGate::new();

    access.expect_authorize().never();

    access
}

fn strict_accounts_mock() -> MockAccountsService {
    let mut accounts = MockAccountsService::new();

    accounts.expect_register().never();
    accounts.expect_login().never();
    accounts.expect_logout().never();

    accounts
}

fn strict_offerings_mock() -> MockOfferingsService {
    let mut offerings = MockOfferingsService::new();

    offerings.expect_list_offerings().never();
    offerings.expect_get_offering().never();
    offerings.expect_create_offering().never();
    offerings.expect_update_offering().never();
    offerings.expect_deactivate_offering().never();
    offerings.expect_toggle_offering_status().never();

    offerings
}

pub(crate) fn strict_enrollments_mock() -> MockEnrollmentsService {
    let mut enrollments = MockEnrollmentsService::new();

    enrollments.expect_draft_enrollment().never();
    enrollments.expect_enroll().never();
    enrollments.expect_add_offering().never();
    enrollments.expect_get_enrollment().never();
    enrollments.expect_list_enrollments().never();
    enrollments.expect_change_status().never();
    enrollments.expect_moderator_decision().never();
    enrollments.expect_delete_enrollment().never();
    enrollments.expect_set_offerings().never();
    enrollments.expect_remove_offering().never();
    enrollments.expect_list_links().never();
    enrollments.expect_set_link_availability().never();

    enrollments
}

fn make_state(
    access: MockAccessGate,
    accounts: MockAccountsService,
    offerings: MockOfferingsService,
    enrollments: MockEnrollmentsService,
) -> Arc<State> {
    State::from_app_context(AppContext {
        access: Arc::new(access),
        accounts: Arc::new(accounts),
        offerings: Arc::new(offerings),
        enrollments: Arc::new(enrollments),
    })
}

pub(crate) fn state_with_access(access: MockAccessGate) -> Arc<State> {
    make_state(
        access,
        strict_accounts_mock(),
        strict_offerings_mock(),
        strict_enrollments_mock(),
    )
}

pub(crate) fn accounts_service(accounts: MockAccountsService, route: Router) -> Service {
    let state = make_state(
        strict_access_mock(),
        accounts,
        strict_offerings_mock(),
        strict_enrollments_mock(),
    );

    Service::new(Router::new().hoop(inject(state)).push(route))
}

/// Enrollments mock for catalog routes: signed-in callers have no draft.
fn catalog_enrollments_mock() -> MockEnrollmentsService {
    let mut enrollments = MockEnrollmentsService::new();

    enrollments.expect_draft_enrollment().returning(|_| Ok(None));
    enrollments.expect_enroll().never();
    enrollments.expect_add_offering().never();
    enrollments.expect_get_enrollment().never();
    enrollments.expect_list_enrollments().never();
    enrollments.expect_change_status().never();
    enrollments.expect_moderator_decision().never();
    enrollments.expect_delete_enrollment().never();
    enrollments.expect_set_offerings().never();
    enrollments.expect_remove_offering().never();
    enrollments.expect_list_links().never();
    enrollments.expect_set_link_availability().never();

    enrollments
}

/// Catalog routes, called anonymously unless `identity` is given.
pub(crate) fn offerings_service(
    offerings: MockOfferingsService,
    identity: Option<Identity>,
    route: Router,
) -> Service {
    catalog_service(offerings, catalog_enrollments_mock(), identity, route)
}

/// Catalog routes that also consult the caller's enrollments.
pub(crate) fn catalog_service(
    offerings: MockOfferingsService,
    enrollments: MockEnrollmentsService,
    identity: Option<Identity>,
    route: Router,
) -> Service {
    let state = make_state(
        strict_access_mock(),
        strict_accounts_mock(),
        offerings,
        enrollments,
    );

    let router = Router::new().hoop(inject(state));

    let router = match identity {
        Some(identity) => router.hoop(InjectIdentity(identity)),
        None => router,
    };

    Service::new(router.push(route))
}

pub(crate) fn enrollments_service(
    enrollments: MockEnrollmentsService,
    identity: Identity,
    route: Router,
) -> Service {
    let state = make_state(
        strict_access_mock(),
        strict_accounts_mock(),
        strict_offerings_mock(),
        enrollments,
    );

    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(InjectIdentity(identity))
            .push(route),
    )
}
