use std::fmt::Write;

use crate::catalog::UniversityView;

use super::advisor::AdvisorRequest;

/// The passthrough prompt: template first, then the user's text.
pub fn ask_prompt(template: &str, text: &str) -> String {
    format!("{template}\n{text}")
}

pub fn advisor_prompt(profile: &AdvisorRequest, candidates: &[UniversityView]) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are a university admissions advisor. Recommend exactly one university for the \
         applicant below.\n\n",
    );

    prompt.push_str("Rules:\n");
    prompt.push_str("1. Choose ONLY from the universities listed under \"Universities\".\n");
    prompt.push_str("2. Copy the university name exactly as it is written in the list.\n");
    prompt.push_str(
        "3. Prefer universities whose minimum ENT score does not exceed the applicant's score.\n",
    );
    prompt.push_str("4. Prefer the applicant's city when the other factors are comparable.\n");
    prompt.push_str(
        "5. Answer with a single JSON object and nothing else: \
         {\"university_name\": \"...\", \"short_reason\": \"...\"}\n",
    );
    prompt.push_str("6. Keep short_reason to one or two sentences.\n\n");

    prompt.push_str("Universities:\n");
    for view in candidates {
        let university = &view.university;
        let _ = write!(
            prompt,
            "- {} | city: {} | min ENT: {} | price: {} | rating: {:.1} | dormitory: {}",
            university.name,
            university.city,
            university.min_ent_score,
            university.price,
            university.rating,
            if university.has_dormitory { "yes" } else { "no" },
        );
        if !view.programs.is_empty() {
            let programs: Vec<&str> = view
                .programs
                .iter()
                .map(|program| program.name.as_str())
                .collect();
            let _ = write!(prompt, " | programs: {}", programs.join(", "));
        }
        prompt.push('\n');
    }

    prompt.push_str("\nApplicant:\n");
    let _ = writeln!(prompt, "- ENT score: {}", profile.ent_score);
    let _ = writeln!(prompt, "- Profile subjects: {}", profile.profile_subjects);
    let _ = writeln!(prompt, "- Interests: {}", profile.interests);
    let _ = writeln!(prompt, "- Preferred city: {}", profile.preferred_city);
    let _ = writeln!(prompt, "- Career goal: {}", profile.career_goal);

    prompt
}
