//! Deterministic resume templating: the local path used whenever the
//! completion endpoint is unconfigured or fails.

use crate::models::resume::{EducationEntry, ExperienceEntry, ProjectEntry, ResumeInput};

pub const SKILL_SEPARATOR: &str = " • ";

/// Renders a plain-text resume from form input.
///
/// Section order is fixed: heading, summary, skills, experience, education,
/// certifications, projects. Summary and skills always render; the remaining
/// sections are omitted entirely when their source list is empty.
pub fn render_template(input: &ResumeInput) -> String {
    let mut sections: Vec<String> = Vec::with_capacity(7);

    sections.push(format!(
        "{}\n{}",
        input.full_name.trim().to_uppercase(),
        input.job_title.trim()
    ));

    sections.push(format!("PROFESSIONAL SUMMARY\n{}", input.summary.trim()));

    let skills = if input.skills.is_empty() {
        "No skills listed".to_string()
    } else {
        input.skills.join(SKILL_SEPARATOR)
    };
    sections.push(format!("CORE COMPETENCIES\n{skills}"));

    if !input.experience.is_empty() {
        sections.push(section(
            "PROFESSIONAL EXPERIENCE",
            input.experience.iter().map(render_experience),
        ));
    }

    if !input.education.is_empty() {
        sections.push(section(
            "EDUCATION",
            input.education.iter().map(render_education),
        ));
    }

    if !input.certifications.is_empty() {
        sections.push(format!(
            "CERTIFICATIONS\n{}",
            input.certifications.join("\n")
        ));
    }

    if !input.projects.is_empty() {
        sections.push(section(
            "PROJECTS",
            input.projects.iter().map(render_project),
        ));
    }

    sections.join("\n\n").trim().to_string()
}

fn section(header: &str, entries: impl Iterator<Item = String>) -> String {
    let body: Vec<String> = entries.collect();
    format!("{header}\n{}", body.join("\n\n"))
}

fn render_experience(exp: &ExperienceEntry) -> String {
    format!(
        "{} | {}\n{} - {}\n{}",
        exp.position, exp.company, exp.start_date, exp.end_date, exp.description
    )
}

fn render_education(edu: &EducationEntry) -> String {
    format!(
        "{}\n{}\n{} - {}",
        edu.degree, edu.institution, edu.start_date, edu.end_date
    )
}

fn render_project(proj: &ProjectEntry) -> String {
    let mut block = format!(
        "{}\n{}\nTechnologies: {}",
        proj.name, proj.description, proj.technologies
    );
    if let Some(link) = proj.link() {
        block.push_str("\nLink: ");
        block.push_str(link);
    }
    block
}
