//! Provisioning service boundary
//!
//! This module handles:
//! - Enrollment and attestation domain types
//! - The provisioning collaborator trait (individual and group enrollment CRUD)
//! - The error-policy facade that collapses provisioning faults

use crate::error::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Attestation mechanism for an enrollment.
///
/// Always branch on the tag; the mechanism is part of the enrollment data,
/// never something to infer from a runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AttestationKind {
    SymmetricKey { primary_key: String },
    X509 { certificate: String },
    Tpm { endorsement_key: String },
}

impl AttestationKind {
    /// Wire label for the mechanism, used in logs and listings
    pub fn mechanism(&self) -> &'static str {
        match self {
            AttestationKind::SymmetricKey { .. } => "symmetricKey",
            AttestationKind::X509 { .. } => "x509",
            AttestationKind::Tpm { .. } => "tpm",
        }
    }
}

/// An individual or group enrollment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub registration_id: String,
    /// Group enrollments provision any device presenting the group credential
    pub group: bool,
    pub attestation: AttestationKind,
    /// Device id assigned on provisioning, if any
    pub device_id: Option<String>,
}

/// Provisioning collaborator: enrollment CRUD and attestation lookup
#[async_trait]
pub trait ProvisioningService: Send + Sync {
    /// List all enrollments
    async fn query_enrollments(&self) -> Result<Vec<Enrollment>, TransportError>;

    /// Fetch one enrollment, `None` if unknown
    async fn get_enrollment(
        &self,
        registration_id: &str,
    ) -> Result<Option<Enrollment>, TransportError>;

    /// Create or replace an enrollment, returning the stored record
    async fn create_or_update_enrollment(
        &self,
        enrollment: Enrollment,
    ) -> Result<Enrollment, TransportError>;

    /// Delete an enrollment
    async fn delete_enrollment(&self, registration_id: &str) -> Result<(), TransportError>;

    /// Fetch the attestation mechanism of an enrollment, `None` if unknown
    async fn get_attestation(
        &self,
        registration_id: &str,
    ) -> Result<Option<AttestationKind>, TransportError>;

    /// Create or replace a group enrollment keyed by a signing certificate
    async fn create_or_update_group_enrollment(
        &self,
        certificate: &str,
    ) -> Result<Enrollment, TransportError>;
}

/// Wraps a [`ProvisioningService`] and applies the boundary error policy:
/// faults are logged and collapsed to absent/empty/false results.
pub struct ProvisioningClient<P> {
    service: P,
}

impl<P: ProvisioningService> ProvisioningClient<P> {
    pub fn new(service: P) -> Self {
        Self { service }
    }

    /// List enrollments for UI population; empty on fault
    pub async fn enrollments(&self) -> Vec<Enrollment> {
        match self.service.query_enrollments().await {
            Ok(enrollments) => enrollments,
            Err(e) => {
                warn!("query_enrollments failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch one enrollment; faults and unknown ids both yield `None`
    pub async fn enrollment(&self, registration_id: &str) -> Option<Enrollment> {
        match self.service.get_enrollment(registration_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("get_enrollment {} failed: {}", registration_id, e);
                None
            }
        }
    }

    /// Create or replace an enrollment; `None` on fault
    pub async fn upsert_enrollment(&self, enrollment: Enrollment) -> Option<Enrollment> {
        let registration_id = enrollment.registration_id.clone();
        match self.service.create_or_update_enrollment(enrollment).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!("create_or_update_enrollment {} failed: {}", registration_id, e);
                None
            }
        }
    }

    /// Delete an enrollment; `false` on fault
    pub async fn delete_enrollment(&self, registration_id: &str) -> bool {
        match self.service.delete_enrollment(registration_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("delete_enrollment {} failed: {}", registration_id, e);
                false
            }
        }
    }

    /// Fetch an enrollment's attestation mechanism; `None` on fault
    pub async fn attestation(&self, registration_id: &str) -> Option<AttestationKind> {
        match self.service.get_attestation(registration_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("get_attestation {} failed: {}", registration_id, e);
                None
            }
        }
    }

    /// Create or replace a group enrollment; `None` on fault
    pub async fn upsert_group_enrollment(&self, certificate: &str) -> Option<Enrollment> {
        match self
            .service
            .create_or_update_group_enrollment(certificate)
            .await
        {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!("create_or_update_group_enrollment failed: {}", e);
                None
            }
        }
    }
}
