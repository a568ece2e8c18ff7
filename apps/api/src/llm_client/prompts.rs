// Prompt templates for the two model calls. All prompts are defined here.

pub const RESUME_PARSE_SYSTEM: &str =
    "You are a helpful assistant that extracts structured information from resumes.";

pub const RESUME_PARSE_PROMPT: &str = r#"Extract the following information from the resume text in JSON format:
- Full Name
- Email Address
- Phone Number
- Skills (as a list)
- Work Experience (as a list of dictionaries with company, position, duration, and responsibilities)
- Education (as a list of dictionaries with institution, degree, and graduation year)

Resume text:
{resume_text}

Provide the information in the following JSON structure:
{
    "full_name": "",
    "email": "",
    "phone": "",
    "skills": [],
    "work_experience": [
        {
            "company": "",
            "position": "",
            "duration": "",
            "responsibilities": []
        }
    ],
    "education": [
        {
            "institution": "",
            "degree": "",
            "graduation_year": ""
        }
    ]
}"#;

pub const FIT_SCORE_SYSTEM: &str = "You are an expert recruiter.";

pub const FIT_SCORE_PROMPT: &str = r#"Given the following job description and candidate details, determine if the candidate is a strong fit for the role. Respond in JSON with fields: is_best_fit (true/false), reason (string).

Job Description:
{job_description}

Candidate:
{candidate}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt_has_resume_placeholder() {
        assert!(RESUME_PARSE_PROMPT.contains("{resume_text}"));
    }

    #[test]
    fn test_fit_prompt_has_both_placeholders() {
        assert!(FIT_SCORE_PROMPT.contains("{job_description}"));
        assert!(FIT_SCORE_PROMPT.contains("{candidate}"));
    }
}
