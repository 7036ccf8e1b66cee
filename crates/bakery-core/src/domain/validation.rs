use crate::domain::{
    entities::{ProjectStructure, Template},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Services call these before handing anything to a port.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_template(template: &Template) -> Result<(), DomainError> {
        template.validate()
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }
}
