use serde::Serialize;

use crate::models::resume::ResumeInput;

/// A single failed form constraint, addressed by its field path
/// (e.g. `experience[0].company`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: &str) -> Self {
        Self {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

/// Validates a resume form submission, collecting every failure at once so the
/// client can mark all offending fields inline.
///
/// Required: name, title, summary, at least one skill, at least one experience
/// entry, and every field of each experience, education and project entry
/// except the project link. Whitespace-only values count as missing.
pub fn validate_resume_input(input: &ResumeInput) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    require(&mut errors, "fullName", &input.full_name, "Full name is required");
    require(&mut errors, "jobTitle", &input.job_title, "Job title is required");
    require(&mut errors, "summary", &input.summary, "Summary is required");

    if input.skills.is_empty() {
        errors.push(FieldError::new("skills", "At least one skill is required"));
    }
    for (i, skill) in input.skills.iter().enumerate() {
        require(&mut errors, format!("skills[{i}]"), skill, "Skill cannot be blank");
    }

    if input.experience.is_empty() {
        errors.push(FieldError::new(
            "experience",
            "At least one experience entry is required",
        ));
    }
    for (i, exp) in input.experience.iter().enumerate() {
        let at = |f: &str| format!("experience[{i}].{f}");
        require(&mut errors, at("company"), &exp.company, "Company name is required");
        require(&mut errors, at("position"), &exp.position, "Position is required");
        require(&mut errors, at("startDate"), &exp.start_date, "Start date is required");
        require(&mut errors, at("endDate"), &exp.end_date, "End date is required");
        require(&mut errors, at("description"), &exp.description, "Description is required");
    }

    for (i, edu) in input.education.iter().enumerate() {
        let at = |f: &str| format!("education[{i}].{f}");
        require(&mut errors, at("institution"), &edu.institution, "Institution is required");
        require(&mut errors, at("degree"), &edu.degree, "Degree is required");
        require(&mut errors, at("startDate"), &edu.start_date, "Start date is required");
        require(&mut errors, at("endDate"), &edu.end_date, "End date is required");
    }

    for (i, cert) in input.certifications.iter().enumerate() {
        require(
            &mut errors,
            format!("certifications[{i}]"),
            cert,
            "Certification cannot be blank",
        );
    }

    for (i, proj) in input.projects.iter().enumerate() {
        let at = |f: &str| format!("projects[{i}].{f}");
        require(&mut errors, at("name"), &proj.name, "Project name is required");
        require(&mut errors, at("description"), &proj.description, "Description is required");
        require(
            &mut errors,
            at("technologies"),
            &proj.technologies,
            "Technologies are required",
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn require(errors: &mut Vec<FieldError>, field: impl Into<String>, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}
