//! Applicability gate evaluated before a check body runs.

use ffc_model::FlatFile;
use ffc_standards::TestCaseConfig;

use crate::error::TestExecError;

/// Reject a check that its configuration does not allow on `file`.
///
/// Conditions are tested in order: structure name, file type, structure
/// attributes, then the attributes of every row structure.
pub fn check_applicability(
    config: &TestCaseConfig,
    test_name: &str,
    file: &FlatFile<'_>,
) -> Result<(), TestExecError> {
    let structure = file.structure();

    if !config.allowed_structures.allows(&structure.name) {
        return Err(TestExecError::StructureNotAllowed {
            test_name: test_name.to_string(),
            file_name: file.file_name(),
            structure: structure.name.clone(),
        });
    }

    let conf_type = structure.conf_type();
    let file_types = &config.allowed_file_types;
    if !file_types.allows(conf_type.as_str()) && !file_types.allows(conf_type.label()) {
        return Err(TestExecError::FileTypeNotAllowed {
            test_name: test_name.to_string(),
            file_name: file.file_name(),
            conf_type,
        });
    }

    let missing = config
        .required_structure_fields
        .missing(|field| structure.has_attribute(field));
    if !missing.is_empty() {
        return Err(TestExecError::MissingStructureFields {
            test_name: test_name.to_string(),
            file_name: file.file_name(),
            missing,
        });
    }

    for row_structure in &structure.row_structures {
        let missing = config
            .required_row_fields
            .missing(|field| row_structure.has_attribute(field));
        if !missing.is_empty() {
            return Err(TestExecError::MissingRowFields {
                test_name: test_name.to_string(),
                file_name: file.file_name(),
                structure: structure.name.clone(),
                row_type: row_structure.type_name().to_string(),
                missing,
            });
        }
    }

    Ok(())
}
