//! Test Helpers

use crate::{
    auth::{AccountsServiceError, Identity, Role},
    domain::offerings::{
        OfferingsService, OfferingsServiceError,
        data::{NewOffering, OfferingDetails},
        records::{OfferingRecord, OfferingUuid},
    },
    test::TestContext,
};

/// Store an account and return the identity its tokens would carry.
pub(crate) async fn create_identity(
    ctx: &TestContext,
    name: &str,
    role: Role,
) -> Result<Identity, AccountsServiceError> {
    let user = ctx.accounts.create_user(name, "password", role).await?;

    Ok(Identity::new(user.uuid, user.role))
}

pub(crate) async fn create_offering(
    ctx: &TestContext,
    title: &str,
) -> Result<OfferingRecord, OfferingsServiceError> {
    ctx.offerings
        .create_offering(NewOffering {
            uuid: OfferingUuid::new(),
            details: OfferingDetails {
                title: title.to_string(),
                location: "Main Hall".to_string(),
                capacity: 10,
                ..OfferingDetails::default()
            },
        })
        .await
}
