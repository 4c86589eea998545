//! Patient profile
//!
//! The medical profile behind the dashboard: who is being monitored,
//! who to call in an emergency, and what they take. Single-patient by
//! design, held in memory behind an RwLock.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by profile validation and the store
#[derive(Error, Debug, PartialEq)]
pub enum ProfileError {
    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    #[error("age must be between 1 and 120, got {0}")]
    AgeOutOfRange(u32),

    #[error("no patient profile registered")]
    NotRegistered,

    #[error("no medication at index {0}")]
    MedicationNotFound(usize),
}

/// Contact to notify when a reading goes critical
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// A medication the patient takes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
}

impl Medication {
    /// All three fields must be filled in for a medication to be listed.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::MissingField("medication.name"));
        }
        if self.dosage.trim().is_empty() {
            return Err(ProfileError::MissingField("medication.dosage"));
        }
        if self.frequency.trim().is_empty() {
            return Err(ProfileError::MissingField("medication.frequency"));
        }
        Ok(())
    }
}

/// The monitored patient's medical profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub phone: String,
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub medications: Vec<Medication>,
    /// Free text: diagnosed conditions relevant to glucose management
    #[serde(default)]
    pub medical_conditions: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl PatientProfile {
    /// Check the registration constraints before a profile is accepted.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.first_name.trim().is_empty() {
            return Err(ProfileError::MissingField("first_name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ProfileError::MissingField("last_name"));
        }
        if self.age < 1 || self.age > 120 {
            return Err(ProfileError::AgeOutOfRange(self.age));
        }
        if self.phone.trim().is_empty() {
            return Err(ProfileError::MissingField("phone"));
        }
        if self.emergency_contact.name.trim().is_empty() {
            return Err(ProfileError::MissingField("emergency_contact.name"));
        }
        if self.emergency_contact.phone.trim().is_empty() {
            return Err(ProfileError::MissingField("emergency_contact.phone"));
        }
        for medication in &self.medications {
            medication.validate()?;
        }
        Ok(())
    }

    /// Full display name, "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// In-memory store for the single patient profile
pub struct ProfileStore {
    profile: RwLock<Option<PatientProfile>>,
}

impl ProfileStore {
    /// Create an empty store with no profile registered
    pub fn new() -> Self {
        Self {
            profile: RwLock::new(None),
        }
    }

    /// Create a store pre-loaded with a profile, validating it first
    pub fn with_profile(profile: PatientProfile) -> Result<Self, ProfileError> {
        profile.validate()?;
        Ok(Self {
            profile: RwLock::new(Some(profile)),
        })
    }

    /// Get a copy of the registered profile, if any
    pub async fn get(&self) -> Option<PatientProfile> {
        self.profile.read().await.clone()
    }

    /// Replace the profile after validating it
    pub async fn set(&self, profile: PatientProfile) -> Result<(), ProfileError> {
        profile.validate()?;
        tracing::info!(patient = %profile.full_name(), "Patient profile updated");
        *self.profile.write().await = Some(profile);
        Ok(())
    }

    /// Remove the registered profile
    pub async fn clear(&self) {
        *self.profile.write().await = None;
    }

    /// Emergency contact of the registered profile, if one exists
    pub async fn emergency_contact(&self) -> Option<EmergencyContact> {
        self.profile
            .read()
            .await
            .as_ref()
            .map(|p| p.emergency_contact.clone())
    }

    /// Append a medication to the registered profile.
    ///
    /// Returns the new medication count.
    pub async fn add_medication(&self, medication: Medication) -> Result<usize, ProfileError> {
        medication.validate()?;
        let mut guard = self.profile.write().await;
        let profile = guard.as_mut().ok_or(ProfileError::NotRegistered)?;
        profile.medications.push(medication);
        Ok(profile.medications.len())
    }

    /// Remove the medication at `index`, returning it
    pub async fn remove_medication(&self, index: usize) -> Result<Medication, ProfileError> {
        let mut guard = self.profile.write().await;
        let profile = guard.as_mut().ok_or(ProfileError::NotRegistered)?;
        if index >= profile.medications.len() {
            return Err(ProfileError::MedicationNotFound(index));
        }
        Ok(profile.medications.remove(index))
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}
