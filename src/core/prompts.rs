use crate::models::{UserProfile, UserResult};

/// Prompt asking the model for a single people-search phrase
pub fn query_prompt(profile: &UserProfile, objective: &str) -> String {
    format!(
        r#"You write search queries for a people-search engine that indexes LinkedIn profiles.

STUDENT:
- University: {university}
- Name: {name}
- Year: {year}
- Clubs: {clubs}
- Societies: {societies}
- Location: {location}

OBJECTIVE:
{objective}

TASK: Write ONE natural-language search phrase that finds the people this student should contact.
Describe the people (role, company or industry, seniority, location when relevant), not the student.
Return only the phrase, with no quotes, labels or explanation."#,
        university = profile.university_name,
        name = profile.full_name,
        year = profile.grade_year,
        clubs = join_or_none(&profile.clubs),
        societies = join_or_none(&profile.societies),
        location = profile.location,
        objective = objective.trim(),
    )
}

/// Prompt asking the model for one personalized outreach message
pub fn message_prompt(profile: &UserProfile, objective: &str, target: &UserResult) -> String {
    let recipient = &target.profile;

    let experience = target
        .experience
        .iter()
        .take(2)
        .map(|exp| format!("{} at {}", exp.title, exp.company_name))
        .collect::<Vec<_>>();

    let education = target
        .education
        .iter()
        .take(2)
        .map(|edu| {
            if edu.degree.is_empty() {
                edu.school_name.clone()
            } else {
                format!("{} in {}, {}", edu.degree, edu.field_of_study, edu.school_name)
            }
        })
        .collect::<Vec<_>>();

    let shared_school = target
        .education
        .iter()
        .any(|edu| same_school(&edu.school_name, &profile.university_name));

    format!(
        r#"Write a LinkedIn message from a student to a professional.

SENDER:
- Name: {sender}
- {year} at {university}
- Clubs: {clubs}
- Societies: {societies}
- Based in {location}

RECIPIENT:
- Name: {name}
- Headline: {headline}
- Current: {title}
- Experience: {experience}
- Education: {education}
- Location: {recipient_location}
{alumni_line}
SENDER'S OBJECTIVE:
{objective}

Rules: first person, warm and specific to the recipient's background, under 120 words,
one concrete ask, no subject line, no placeholders in brackets, sign with the sender's first name."#,
        sender = profile.full_name,
        year = profile.grade_year,
        university = profile.university_name,
        clubs = join_or_none(&profile.clubs),
        societies = join_or_none(&profile.societies),
        location = profile.location,
        name = recipient.name,
        headline = recipient.headline,
        title = recipient.title,
        experience = join_or_none(&experience),
        education = join_or_none(&education),
        recipient_location = recipient.location,
        alumni_line = if shared_school {
            "- Both attended the same university\n"
        } else {
            ""
        },
        objective = objective.trim(),
    )
}

/// Normalize model output into a bare search phrase
pub fn clean_query(raw: &str) -> String {
    let mut text = raw.trim();

    for label in ["Query:", "query:", "Search query:", "Search:"] {
        if let Some(rest) = text.strip_prefix(label) {
            text = rest.trim();
        }
    }

    let text = text.trim_matches(|c| c == '"' || c == '\'' || c == '`').trim();

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn same_school(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}
