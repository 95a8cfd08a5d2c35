//! # Registry Services
//!
//! Application services for trial setup, enrollment, and user management.
//! Every mutating operation checks the policy table first, then the
//! ownership rule where one applies (study managers operate only on studies
//! they created). Uses dependency injection for all stores and the clock.

use shared_types::{
    is_allowed, Actor, Operation, Patient, PatientId, PatientVariableValue, RandomizationConfig,
    Role, Site, SiteId, Study, StudyId, StudySiteLink, StudyVariable, TreatmentArm, User, UserId,
};
use tracing::info;

use crate::domain::errors::RegistryError;
use crate::domain::payloads::{
    NewArm, NewPatient, NewSite, NewStudy, NewUser, NewVariable, PatientDetail,
    PatientVariableDetail, SitePatch, StudyPatch,
};
use crate::ports::{Clock, PatientStore, SiteStore, StudyStore, UserDirectory, VariableStore};


fn require(actor: Actor, operation: Operation, name: &'static str) -> Result<(), RegistryError> {
    if is_allowed(actor.role, operation) {
        Ok(())
    } else {
        Err(RegistryError::AccessDenied { operation: name })
    }
}

/// The Trial Registry service: studies, arms, sites, links, and variables.
pub struct RegistryService<ST, SI, VA, C>
where
    ST: StudyStore,
    SI: SiteStore,
    VA: VariableStore,
    C: Clock,
{
    studies: ST,
    sites: SI,
    variables: VA,
    clock: C,
}

impl<ST, SI, VA, C> RegistryService<ST, SI, VA, C>
where
    ST: StudyStore,
    SI: SiteStore,
    VA: VariableStore,
    C: Clock,
{
    pub fn new(studies: ST, sites: SI, variables: VA, clock: C) -> Self {
        Self {
            studies,
            sites,
            variables,
            clock,
        }
    }

    // =========================================================================
    // RANDOMIZATION VIEW
    // =========================================================================

    /// Resolves a study's randomization configuration and arm list.
    ///
    /// Side-effect-free: calling twice without interleaved mutation returns
    /// identical results.
    ///
    /// ## Errors
    ///
    /// - `StudyNotFound`: no study with this id
    /// - `NotRandomized`: the study is not flagged for randomization
    /// - `NoArmsDefined`: the study has no treatment arms
    pub fn resolve(
        &self,
        study_id: StudyId,
    ) -> Result<(RandomizationConfig, Vec<TreatmentArm>), RegistryError> {
        let study = self
            .studies
            .study(study_id)?
            .ok_or(RegistryError::StudyNotFound { study_id })?;

        if !study.is_randomized {
            return Err(RegistryError::NotRandomized { study_id });
        }

        let arms = self.studies.arms_for_study(study_id)?;
        if arms.is_empty() {
            return Err(RegistryError::NoArmsDefined { study_id });
        }

        let config = RandomizationConfig {
            study_id,
            randomization_type: study.randomization_type.clone(),
            block_size: study.block_size,
            stratification_factors: study.stratification_factors.clone(),
        };
        Ok((config, arms))
    }

    // =========================================================================
    // STUDIES
    // =========================================================================

    pub fn create_study(&self, actor: Actor, new: NewStudy) -> Result<Study, RegistryError> {
        require(actor, Operation::CreateStudy, "create study")?;

        if new.name.trim().is_empty() {
            return Err(RegistryError::Validation {
                message: "Study name is required".to_string(),
            });
        }
        if new.block_size == Some(0) {
            return Err(RegistryError::Validation {
                message: "block_size must be at least 1".to_string(),
            });
        }

        let now = self.clock.now();
        let study = self.studies.insert_study(Study {
            id: StudyId(0),
            name: new.name,
            protocol_number: new.protocol_number,
            irb_number: new.irb_number,
            start_date: new.start_date,
            end_date: new.end_date,
            randomization_type: new.randomization_type,
            is_randomized: new.is_randomized,
            block_size: new.block_size,
            stratification_factors: new.stratification_factors,
            created_by: actor.user_id,
            updated_by: None,
            created_at: now,
            updated_at: now,
        })?;

        info!(study_id = %study.id, name = %study.name, "study created");
        Ok(study)
    }

    pub fn update_study(
        &self,
        actor: Actor,
        study_id: StudyId,
        patch: StudyPatch,
    ) -> Result<Study, RegistryError> {
        let mut study = self
            .studies
            .study(study_id)?
            .ok_or(RegistryError::StudyNotFound { study_id })?;
        self.require_study_access(actor, &study, Operation::UpdateStudy, "update study")?;

        if let Some(name) = patch.name {
            study.name = name;
        }
        if let Some(protocol_number) = patch.protocol_number {
            study.protocol_number = Some(protocol_number);
        }
        if let Some(irb_number) = patch.irb_number {
            study.irb_number = Some(irb_number);
        }
        if let Some(start_date) = patch.start_date {
            study.start_date = Some(start_date);
        }
        if let Some(end_date) = patch.end_date {
            study.end_date = Some(end_date);
        }
        if let Some(randomization_type) = patch.randomization_type {
            study.randomization_type = randomization_type;
        }
        if let Some(is_randomized) = patch.is_randomized {
            study.is_randomized = is_randomized;
        }
        if let Some(block_size) = patch.block_size {
            if block_size == 0 {
                return Err(RegistryError::Validation {
                    message: "block_size must be at least 1".to_string(),
                });
            }
            study.block_size = Some(block_size);
        }
        if let Some(factors) = patch.stratification_factors {
            study.stratification_factors = factors;
        }

        study.updated_by = Some(actor.user_id);
        study.updated_at = self.clock.now();
        self.studies.update_study(study.clone())?;

        info!(study_id = %study.id, "study updated");
        Ok(study)
    }

    /// Lists studies visible to the caller. Study managers see only their
    /// own studies.
    pub fn list_studies(&self, actor: Actor) -> Result<Vec<Study>, RegistryError> {
        require(actor, Operation::ListStudies, "list studies")?;
        let mut studies = self.studies.studies()?;
        if actor.role == Role::StudyManager {
            studies.retain(|study| study.created_by == actor.user_id);
        }
        Ok(studies)
    }

    pub fn get_study(&self, actor: Actor, study_id: StudyId) -> Result<Study, RegistryError> {
        require(actor, Operation::ListStudies, "get study")?;
        let study = self
            .studies
            .study(study_id)?
            .ok_or(RegistryError::StudyNotFound { study_id })?;
        if actor.role == Role::StudyManager && study.created_by != actor.user_id {
            return Err(RegistryError::AccessDenied {
                operation: "get study",
            });
        }
        Ok(study)
    }

    /// Deletes a study together with its arms and site links.
    pub fn delete_study(&self, actor: Actor, study_id: StudyId) -> Result<(), RegistryError> {
        let study = self
            .studies
            .study(study_id)?
            .ok_or(RegistryError::StudyNotFound { study_id })?;
        self.require_study_access(actor, &study, Operation::UpdateStudy, "delete study")?;

        self.studies.delete_study(study_id)?;
        info!(study_id = %study_id, "study deleted");
        Ok(())
    }

    // =========================================================================
    // TREATMENT ARMS
    // =========================================================================

    /// Adds a treatment arm to a study.
    ///
    /// ## Errors
    ///
    /// - `Validation`: allocation ratio below 1 or empty name
    /// - `DuplicateName`: an arm with this name already exists in the study
    pub fn add_arm(
        &self,
        actor: Actor,
        study_id: StudyId,
        new: NewArm,
    ) -> Result<TreatmentArm, RegistryError> {
        let study = self
            .studies
            .study(study_id)?
            .ok_or(RegistryError::StudyNotFound { study_id })?;
        self.require_study_access(actor, &study, Operation::ManageArms, "add arm")?;

        if new.name.trim().is_empty() {
            return Err(RegistryError::Validation {
                message: "Arm name is required".to_string(),
            });
        }
        let allocation_ratio = new.allocation_ratio.unwrap_or(1);
        if allocation_ratio < 1 {
            return Err(RegistryError::Validation {
                message: "allocation_ratio must be at least 1".to_string(),
            });
        }
        let existing = self.studies.arms_for_study(study_id)?;
        if existing.iter().any(|arm| arm.name == new.name) {
            return Err(RegistryError::DuplicateName {
                entity: "treatment arm",
                name: new.name,
            });
        }

        let arm = self.studies.insert_arm(TreatmentArm {
            id: shared_types::ArmId(0),
            study_id,
            name: new.name,
            allocation_ratio,
        })?;

        info!(study_id = %study_id, arm = %arm.name, ratio = arm.allocation_ratio, "arm added");
        Ok(arm)
    }

    pub fn arms(&self, study_id: StudyId) -> Result<Vec<TreatmentArm>, RegistryError> {
        if self.studies.study(study_id)?.is_none() {
            return Err(RegistryError::StudyNotFound { study_id });
        }
        Ok(self.studies.arms_for_study(study_id)?)
    }

    // =========================================================================
    // SITES
    // =========================================================================

    pub fn create_site(&self, actor: Actor, new: NewSite) -> Result<Site, RegistryError> {
        require(actor, Operation::ManageSites, "create site")?;

        if new.name.trim().is_empty() || new.location.trim().is_empty() {
            return Err(RegistryError::Validation {
                message: "Name and location are required".to_string(),
            });
        }
        if self.sites.site_by_name(&new.name)?.is_some() {
            return Err(RegistryError::DuplicateName {
                entity: "site",
                name: new.name,
            });
        }

        let site = self.sites.insert_site(Site {
            id: SiteId(0),
            name: new.name,
            location: Some(new.location),
            created_at: self.clock.now(),
            updated_at: None,
        })?;

        info!(site_id = %site.id, name = %site.name, "site created");
        Ok(site)
    }

    pub fn list_sites(&self, actor: Actor) -> Result<Vec<Site>, RegistryError> {
        require(actor, Operation::ManageSites, "list sites")?;
        Ok(self.sites.sites()?)
    }

    pub fn update_site(
        &self,
        actor: Actor,
        site_id: SiteId,
        patch: SitePatch,
    ) -> Result<Site, RegistryError> {
        require(actor, Operation::ManageSites, "update site")?;
        let mut site = self
            .sites
            .site(site_id)?
            .ok_or(RegistryError::SiteNotFound { site_id })?;

        if let Some(name) = patch.name {
            if let Some(other) = self.sites.site_by_name(&name)? {
                if other.id != site_id {
                    return Err(RegistryError::DuplicateName {
                        entity: "site",
                        name,
                    });
                }
            }
            site.name = name;
        }
        if let Some(location) = patch.location {
            site.location = Some(location);
        }
        site.updated_at = Some(self.clock.now());
        self.sites.update_site(site.clone())?;
        Ok(site)
    }

    /// Deletes a site, refusing while any study links to it.
    pub fn delete_site(&self, actor: Actor, site_id: SiteId) -> Result<(), RegistryError> {
        require(actor, Operation::ManageSites, "delete site")?;
        if self.sites.site(site_id)?.is_none() {
            return Err(RegistryError::SiteNotFound { site_id });
        }
        if self.studies.site_linked(site_id)? {
            return Err(RegistryError::SiteInUse { site_id });
        }
        self.sites.delete_site(site_id)?;
        info!(site_id = %site_id, "site deleted");
        Ok(())
    }

    /// Links a site to a study.
    pub fn assign_site(
        &self,
        actor: Actor,
        study_id: StudyId,
        site_id: SiteId,
    ) -> Result<StudySiteLink, RegistryError> {
        let study = self
            .studies
            .study(study_id)?
            .ok_or(RegistryError::StudyNotFound { study_id })?;
        self.require_study_access(actor, &study, Operation::AssignSite, "assign site")?;

        if self.sites.site(site_id)?.is_none() {
            return Err(RegistryError::SiteNotFound { site_id });
        }
        if self.studies.link_exists(study_id, site_id)? {
            return Err(RegistryError::DuplicateSiteAssignment { study_id, site_id });
        }

        let link = StudySiteLink {
            study_id,
            site_id,
            created_by: actor.user_id,
            created_at: self.clock.now(),
        };
        self.studies.insert_link(link.clone())?;

        info!(study_id = %study_id, site_id = %site_id, "site assigned to study");
        Ok(link)
    }

    // =========================================================================
    // VARIABLES
    // =========================================================================

    pub fn define_variable(
        &self,
        actor: Actor,
        study_id: StudyId,
        new: NewVariable,
    ) -> Result<StudyVariable, RegistryError> {
        let study = self
            .studies
            .study(study_id)?
            .ok_or(RegistryError::StudyNotFound { study_id })?;
        self.require_study_access(actor, &study, Operation::ManageVariables, "define variable")?;

        if new.name.trim().is_empty() || new.variable_type.trim().is_empty() {
            return Err(RegistryError::Validation {
                message: "Variable name and type are required".to_string(),
            });
        }

        let variable = self.variables.insert_variable(StudyVariable {
            id: shared_types::VariableId(0),
            study_id,
            name: new.name,
            description: new.description,
            variable_type: new.variable_type,
            required: new.required,
        })?;
        Ok(variable)
    }

    pub fn variables(&self, study_id: StudyId) -> Result<Vec<StudyVariable>, RegistryError> {
        if self.studies.study(study_id)?.is_none() {
            return Err(RegistryError::StudyNotFound { study_id });
        }
        Ok(self.variables.variables_for_study(study_id)?)
    }

    fn require_study_access(
        &self,
        actor: Actor,
        study: &Study,
        operation: Operation,
        name: &'static str,
    ) -> Result<(), RegistryError> {
        require(actor, operation, name)?;
        if actor.role != Role::Admin && study.created_by != actor.user_id {
            return Err(RegistryError::AccessDenied { operation: name });
        }
        Ok(())
    }
}

/// Enrollment service: patients and their captured variable values.
pub struct PatientService<PA, ST, VA, C>
where
    PA: PatientStore,
    ST: StudyStore,
    VA: VariableStore,
    C: Clock,
{
    patients: PA,
    studies: ST,
    variables: VA,
    clock: C,
}

impl<PA, ST, VA, C> PatientService<PA, ST, VA, C>
where
    PA: PatientStore,
    ST: StudyStore,
    VA: VariableStore,
    C: Clock,
{
    pub fn new(patients: PA, studies: ST, variables: VA, clock: C) -> Self {
        Self {
            patients,
            studies,
            variables,
            clock,
        }
    }

    /// Enrolls a patient, capturing variable values in the same step.
    ///
    /// ## Errors
    ///
    /// - `StudyNotFound`: `study_id` set but unknown
    /// - `UnknownVariable`: a value references a variable not defined for
    ///   the study
    /// - `Validation`: values submitted without a study
    pub fn enroll(&self, actor: Actor, new: NewPatient) -> Result<Patient, RegistryError> {
        require(actor, Operation::EnrollPatient, "enroll patient")?;

        if let Some(study_id) = new.study_id {
            if self.studies.study(study_id)?.is_none() {
                return Err(RegistryError::StudyNotFound { study_id });
            }
            let defined = self.variables.variables_for_study(study_id)?;
            for value in &new.study_variables {
                if !defined.iter().any(|v| v.id == value.variable_id) {
                    return Err(RegistryError::UnknownVariable {
                        variable_id: value.variable_id,
                    });
                }
            }
        } else if !new.study_variables.is_empty() {
            return Err(RegistryError::Validation {
                message: "study_variables require a study_id".to_string(),
            });
        }

        let now = self.clock.now();
        let values: Vec<PatientVariableValue> = new
            .study_variables
            .iter()
            .map(|value| PatientVariableValue {
                patient_id: PatientId(0),
                variable_id: value.variable_id,
                value: value.value.clone(),
            })
            .collect();

        let patient = self.patients.insert_patient(
            Patient {
                id: PatientId(0),
                name: new.name,
                dob: new.dob,
                sex: new.sex,
                para: new.para,
                phone: new.phone,
                email: new.email,
                ethnicity: new.ethnicity,
                notes: new.notes,
                consent_date: new.consent_date,
                enrollment_status: new.enrollment_status,
                is_active: new.is_active,
                study_id: new.study_id,
                site_id: new.site_id,
                entered_by: actor.user_id,
                created_at: now,
                updated_at: now,
            },
            values,
        )?;

        info!(patient_id = %patient.id, study_id = ?patient.study_id, "patient enrolled");
        Ok(patient)
    }

    /// Fetches a patient with their variable values joined to definitions.
    pub fn patient_detail(
        &self,
        actor: Actor,
        patient_id: PatientId,
    ) -> Result<PatientDetail, RegistryError> {
        require(actor, Operation::ViewPatient, "view patient")?;

        let patient = self
            .patients
            .patient(patient_id)?
            .ok_or(RegistryError::PatientNotFound { patient_id })?;
        let values = self.patients.values_for_patient(patient_id)?;

        let mut variables = Vec::with_capacity(values.len());
        for value in values {
            if let Some(definition) = self.variables.variable(value.variable_id)? {
                variables.push(PatientVariableDetail {
                    variable_id: definition.id,
                    variable_name: definition.name,
                    variable_description: definition.description,
                    value: value.value,
                    variable_type: definition.variable_type,
                    required: definition.required,
                });
            }
        }

        Ok(PatientDetail { patient, variables })
    }

    pub fn list_for_study(
        &self,
        actor: Actor,
        study_id: StudyId,
    ) -> Result<Vec<Patient>, RegistryError> {
        require(actor, Operation::ViewPatient, "list patients")?;
        if self.studies.study(study_id)?.is_none() {
            return Err(RegistryError::StudyNotFound { study_id });
        }
        Ok(self.patients.patients_for_study(study_id)?)
    }
}

/// User account service.
pub struct UserService<UD>
where
    UD: UserDirectory,
{
    directory: UD,
}

impl<UD> UserService<UD>
where
    UD: UserDirectory,
{
    pub fn new(directory: UD) -> Self {
        Self { directory }
    }

    /// Verifies a username/secret pair. Returns `None` on any mismatch so
    /// callers cannot distinguish unknown users from bad secrets.
    pub fn authenticate(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<Option<User>, RegistryError> {
        Ok(self.directory.verify_credentials(username, secret)?)
    }

    pub fn create_user(&self, actor: Actor, new: NewUser) -> Result<User, RegistryError> {
        require(actor, Operation::ManageUsers, "create user")?;

        if new.username.trim().is_empty() || new.secret.is_empty() {
            return Err(RegistryError::Validation {
                message: "Username and secret are required".to_string(),
            });
        }
        if self.directory.user_by_username(&new.username)?.is_some() {
            return Err(RegistryError::DuplicateName {
                entity: "user",
                name: new.username,
            });
        }

        let user = self.directory.insert_user(
            User {
                id: UserId(0),
                username: new.username,
                role: new.role,
            },
            &new.secret,
        )?;

        info!(user_id = %user.id, username = %user.username, role = user.role.as_str(), "user created");
        Ok(user)
    }

    pub fn list_users(&self, actor: Actor) -> Result<Vec<User>, RegistryError> {
        require(actor, Operation::ManageUsers, "list users")?;
        Ok(self.directory.users()?)
    }

    pub fn reset_secret(
        &self,
        actor: Actor,
        user_id: UserId,
        secret: &str,
    ) -> Result<(), RegistryError> {
        require(actor, Operation::ManageUsers, "reset secret")?;
        if secret.is_empty() {
            return Err(RegistryError::Validation {
                message: "Secret is required".to_string(),
            });
        }
        if self.directory.user(user_id)?.is_none() {
            return Err(RegistryError::UserNotFound { user_id });
        }
        self.directory.set_secret(user_id, secret)?;
        info!(user_id = %user_id, "secret reset");
        Ok(())
    }

    pub fn user(&self, user_id: UserId) -> Result<Option<User>, RegistryError> {
        Ok(self.directory.user(user_id)?)
    }
}
