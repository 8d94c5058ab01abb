//! Enrollments service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    auth::{Identity, Role},
    clock::Clock,
    database::Db,
    domain::{
        enrollments::{
            data::EnrollmentFilter,
            errors::EnrollmentsServiceError,
            reconcile::{LinkChanges, plan_reconciliation},
            records::{
                EnrollmentDetails, EnrollmentLinkRecord, EnrollmentRecord, EnrollmentStatus,
                EnrollmentUuid,
            },
            repositories::{PgEnrollmentLinksRepository, PgEnrollmentsRepository},
            workflow::{
                WorkflowError, authorize_link_edit, authorize_staff, authorize_view,
                plan_transition,
            },
        },
        offerings::{records::OfferingUuid, repository::PgOfferingsRepository},
    },
};

#[derive(Clone)]
pub struct PgEnrollmentsService {
    db: Db,
    clock: Arc<dyn Clock>,
    enrollments: PgEnrollmentsRepository,
    links: PgEnrollmentLinksRepository,
    offerings: PgOfferingsRepository,
}

impl fmt::Debug for PgEnrollmentsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgEnrollmentsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgEnrollmentsService {
    #[must_use]
    pub fn new(db: Db, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            enrollments: PgEnrollmentsRepository::new(),
            links: PgEnrollmentLinksRepository::new(),
            offerings: PgOfferingsRepository::new(),
        }
    }

    /// Resolve every title before anything is written.
    async fn resolve_titles(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        titles: &[String],
    ) -> Result<Vec<OfferingUuid>, EnrollmentsServiceError> {
        let mut resolved = Vec::with_capacity(titles.len());

        for title in titles {
            let offering = self
                .offerings
                .find_offering_id_by_title(tx, title.trim())
                .await?
                .ok_or_else(|| EnrollmentsServiceError::OfferingNotFound(title.clone()))?;

            resolved.push(offering);
        }

        Ok(resolved)
    }

    /// Make the enrollment's links exactly `target`.
    async fn reconcile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        enrollment: EnrollmentUuid,
        target: &[OfferingUuid],
    ) -> Result<LinkChanges, EnrollmentsServiceError> {
        let existing: Vec<OfferingUuid> = self
            .links
            .list_links(tx, enrollment)
            .await?
            .into_iter()
            .map(|link| link.offering)
            .collect();

        let changes = plan_reconciliation(&existing, target);

        for offering in &changes.deleted {
            self.links.delete_link(tx, enrollment, *offering).await?;
        }

        for offering in &changes.inserted {
            self.links.insert_link(tx, enrollment, *offering).await?;
        }

        Ok(changes)
    }

    async fn apply_transition(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        requested: EnrollmentStatus,
    ) -> Result<EnrollmentRecord, EnrollmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.enrollments.find_enrollment(&mut tx, enrollment).await?;

        let change = plan_transition(actor, &current, requested, self.clock.now())
            .inspect_err(|error| {
                warn!(
                    enrollment_uuid = %enrollment,
                    user_uuid = %actor.user,
                    %error,
                    "refused status change"
                );
            })?;

        if change.status == EnrollmentStatus::Draft {
            let draft = self
                .enrollments
                .find_draft_for_user(&mut tx, current.user)
                .await?;

            if draft.is_some_and(|draft| draft.uuid != enrollment) {
                return Err(WorkflowError::DraftAlreadyExists.into());
            }
        }

        let updated = self
            .enrollments
            .update_enrollment_status(&mut tx, enrollment, current.version, &change)
            .await?
            .ok_or(EnrollmentsServiceError::Conflict)?;

        tx.commit().await?;

        info!(
            enrollment_uuid = %enrollment,
            user_uuid = %actor.user,
            from = %current.status,
            to = %updated.status,
            "changed enrollment status"
        );

        Ok(updated)
    }

    /// The actor's draft, created on first use. The row stays locked until
    /// the transaction ends.
    async fn draft_for(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: Identity,
    ) -> Result<EnrollmentRecord, EnrollmentsServiceError> {
        if actor.role == Role::Undefined {
            return Err(WorkflowError::RoleNotPermitted(actor.role).into());
        }

        if let Some(draft) = self.enrollments.find_draft_for_user(tx, actor.user).await? {
            return Ok(draft);
        }

        let created = self
            .enrollments
            .create_enrollment(tx, EnrollmentUuid::new(), actor.user, self.clock.now())
            .await?;

        info!(enrollment_uuid = %created.uuid, user_uuid = %actor.user, "opened draft enrollment");

        Ok(created)
    }

    async fn locked_for_link_edit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: Identity,
        enrollment: EnrollmentUuid,
    ) -> Result<EnrollmentRecord, EnrollmentsServiceError> {
        let record = self.enrollments.lock_enrollment(tx, enrollment).await?;

        authorize_link_edit(actor, &record)?;

        Ok(record)
    }
}

#[async_trait]
impl EnrollmentsService for PgEnrollmentsService {
    async fn enroll(
        &self,
        actor: Identity,
        titles: Vec<String>,
    ) -> Result<EnrollmentDetails, EnrollmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let draft = self.draft_for(&mut tx, actor).await?;

        let target = self.resolve_titles(&mut tx, &titles).await?;
        let changes = self.reconcile(&mut tx, draft.uuid, &target).await?;
        let links = self.links.list_links(&mut tx, draft.uuid).await?;

        tx.commit().await?;

        info!(
            enrollment_uuid = %draft.uuid,
            user_uuid = %actor.user,
            inserted = changes.inserted.len(),
            deleted = changes.deleted.len(),
            "updated draft enrollment"
        );

        Ok(EnrollmentDetails {
            enrollment: draft,
            links,
        })
    }

    async fn add_offering(
        &self,
        actor: Identity,
        offering: OfferingUuid,
    ) -> Result<EnrollmentDetails, EnrollmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let draft = self.draft_for(&mut tx, actor).await?;

        self.offerings
            .get_offering(&mut tx, offering)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => {
                    EnrollmentsServiceError::OfferingNotFound(offering.to_string())
                }
                other => other.into(),
            })?;

        let mut target: Vec<OfferingUuid> = self
            .links
            .list_links(&mut tx, draft.uuid)
            .await?
            .into_iter()
            .map(|link| link.offering)
            .collect();

        target.push(offering);

        let changes = self.reconcile(&mut tx, draft.uuid, &target).await?;
        let links = self.links.list_links(&mut tx, draft.uuid).await?;

        tx.commit().await?;

        info!(
            enrollment_uuid = %draft.uuid,
            user_uuid = %actor.user,
            offering_uuid = %offering,
            inserted = changes.inserted.len(),
            "added offering to draft enrollment"
        );

        Ok(EnrollmentDetails {
            enrollment: draft,
            links,
        })
    }

    async fn draft_enrollment(
        &self,
        actor: Identity,
    ) -> Result<Option<EnrollmentRecord>, EnrollmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let draft = self
            .enrollments
            .find_draft_for_user(&mut tx, actor.user)
            .await?;

        tx.commit().await?;

        Ok(draft)
    }

    async fn get_enrollment(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
    ) -> Result<EnrollmentDetails, EnrollmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.enrollments.find_enrollment(&mut tx, enrollment).await?;

        authorize_view(actor, &record)?;

        let links = self.links.list_links(&mut tx, enrollment).await?;

        tx.commit().await?;

        Ok(EnrollmentDetails {
            enrollment: record,
            links,
        })
    }

    async fn list_enrollments(
        &self,
        actor: Identity,
        filter: EnrollmentFilter,
    ) -> Result<Vec<EnrollmentRecord>, EnrollmentsServiceError> {
        let owner = match actor.role {
            Role::Undefined => return Err(WorkflowError::RoleNotPermitted(actor.role).into()),
            Role::User => Some(actor.user),
            Role::Moderator | Role::Admin => None,
        };

        let mut tx = self.db.begin().await?;

        let enrollments = self
            .enrollments
            .list_enrollments(&mut tx, owner, filter)
            .await?;

        tx.commit().await?;

        Ok(enrollments)
    }

    async fn change_status(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        status: EnrollmentStatus,
    ) -> Result<EnrollmentRecord, EnrollmentsServiceError> {
        self.apply_transition(actor, enrollment, status).await
    }

    async fn moderator_decision(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        approve: bool,
    ) -> Result<EnrollmentRecord, EnrollmentsServiceError> {
        authorize_staff(actor)?;

        let status = if approve {
            EnrollmentStatus::Completed
        } else {
            EnrollmentStatus::Rejected
        };

        self.apply_transition(actor, enrollment, status).await
    }

    async fn delete_enrollment(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
    ) -> Result<EnrollmentRecord, EnrollmentsServiceError> {
        self.apply_transition(actor, enrollment, EnrollmentStatus::Deleted)
            .await
    }

    async fn set_offerings(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        titles: Vec<String>,
    ) -> Result<LinkChanges, EnrollmentsServiceError> {
        let mut tx = self.db.begin().await?;

        self.locked_for_link_edit(&mut tx, actor, enrollment).await?;

        let target = self.resolve_titles(&mut tx, &titles).await?;
        let changes = self.reconcile(&mut tx, enrollment, &target).await?;

        tx.commit().await?;

        info!(
            enrollment_uuid = %enrollment,
            user_uuid = %actor.user,
            inserted = changes.inserted.len(),
            deleted = changes.deleted.len(),
            "reconciled enrollment offerings"
        );

        Ok(changes)
    }

    async fn remove_offering(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        offering: OfferingUuid,
    ) -> Result<LinkChanges, EnrollmentsServiceError> {
        let mut tx = self.db.begin().await?;

        self.locked_for_link_edit(&mut tx, actor, enrollment).await?;

        let existing = self.links.list_links(&mut tx, enrollment).await?;

        if !existing.iter().any(|link| link.offering == offering) {
            return Err(EnrollmentsServiceError::LinkNotFound);
        }

        let target: Vec<OfferingUuid> = existing
            .iter()
            .map(|link| link.offering)
            .filter(|linked| *linked != offering)
            .collect();

        let changes = self.reconcile(&mut tx, enrollment, &target).await?;

        tx.commit().await?;

        info!(
            enrollment_uuid = %enrollment,
            offering_uuid = %offering,
            "removed offering from enrollment"
        );

        Ok(changes)
    }

    async fn list_links(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
    ) -> Result<Vec<EnrollmentLinkRecord>, EnrollmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.enrollments.find_enrollment(&mut tx, enrollment).await?;

        authorize_view(actor, &record)?;

        let links = self.links.list_links(&mut tx, enrollment).await?;

        tx.commit().await?;

        Ok(links)
    }

    async fn set_link_availability(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        offering: OfferingUuid,
        availability: Option<bool>,
    ) -> Result<EnrollmentLinkRecord, EnrollmentsServiceError> {
        authorize_staff(actor)?;

        let mut tx = self.db.begin().await?;

        let link = self
            .links
            .set_link_availability(&mut tx, enrollment, offering, availability)
            .await?
            .ok_or(EnrollmentsServiceError::LinkNotFound)?;

        tx.commit().await?;

        info!(
            enrollment_uuid = %enrollment,
            offering_uuid = %offering,
            ?availability,
            "set link availability"
        );

        Ok(link)
    }
}

#[automock]
#[async_trait]
pub trait EnrollmentsService: Send + Sync {
    /// Put the given offerings on the actor's draft, creating the draft when
    /// there is none.
    async fn enroll(
        &self,
        actor: Identity,
        titles: Vec<String>,
    ) -> Result<EnrollmentDetails, EnrollmentsServiceError>;

    /// Attach one offering to the actor's draft, creating the draft when
    /// there is none. Offerings already on the draft stay.
    async fn add_offering(
        &self,
        actor: Identity,
        offering: OfferingUuid,
    ) -> Result<EnrollmentDetails, EnrollmentsServiceError>;

    /// The actor's open draft, if any.
    async fn draft_enrollment(
        &self,
        actor: Identity,
    ) -> Result<Option<EnrollmentRecord>, EnrollmentsServiceError>;

    /// Retrieve an enrollment with its offerings.
    async fn get_enrollment(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
    ) -> Result<EnrollmentDetails, EnrollmentsServiceError>;

    /// Users see their own enrollments, staff see everyone's.
    async fn list_enrollments(
        &self,
        actor: Identity,
        filter: EnrollmentFilter,
    ) -> Result<Vec<EnrollmentRecord>, EnrollmentsServiceError>;

    /// Move an enrollment to another status.
    async fn change_status(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        status: EnrollmentStatus,
    ) -> Result<EnrollmentRecord, EnrollmentsServiceError>;

    /// Complete or reject an enrollment.
    async fn moderator_decision(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        approve: bool,
    ) -> Result<EnrollmentRecord, EnrollmentsServiceError>;

    /// Logically delete an enrollment.
    async fn delete_enrollment(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
    ) -> Result<EnrollmentRecord, EnrollmentsServiceError>;

    /// Replace the set of offerings attached to an enrollment.
    async fn set_offerings(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        titles: Vec<String>,
    ) -> Result<LinkChanges, EnrollmentsServiceError>;

    /// Detach a single offering.
    async fn remove_offering(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        offering: OfferingUuid,
    ) -> Result<LinkChanges, EnrollmentsServiceError>;

    /// Offerings attached to an enrollment.
    async fn list_links(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
    ) -> Result<Vec<EnrollmentLinkRecord>, EnrollmentsServiceError>;

    /// Record whether an attached offering can take the enrollee.
    async fn set_link_availability(
        &self,
        actor: Identity,
        enrollment: EnrollmentUuid,
        offering: OfferingUuid,
        availability: Option<bool>,
    ) -> Result<EnrollmentLinkRecord, EnrollmentsServiceError>;
}
