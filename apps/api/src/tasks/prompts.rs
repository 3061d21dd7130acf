// Prompt templates for every task kind.
// Placeholders are `{field_name}`; `{json_rules}` expands to the shared
// JSON-only output rules from llm_client::prompts.

/// Replace: {json_rules}, {resume_text}
pub const EXTRACT_SKILLS_TEMPLATE: &str = r#"Extract all technical and soft skills from the following resume text.
{json_rules}
The JSON object MUST be wrapped in a 'skills_analysis' key as shown below.

Resume text:
{resume_text}

Return format:
{
    "skills_analysis": {
        "technical_skills": [],
        "soft_skills": [],
        "tools_and_technologies": []
    }
}"#;

/// Replace: {json_rules}, {resume_text}
pub const EXTRACT_EXPERIENCE_TEMPLATE: &str = r#"Extract work experience from the following resume text.
{json_rules}
The JSON object MUST be wrapped in an 'experience_analysis' key as shown below.

Resume text:
{resume_text}

Return format:
{
    "experience_analysis": [
        {
            "company": "",
            "title": "",
            "dates": "",
            "responsibilities": []
        }
    ]
}"#;

/// Replace: {json_rules}, {job_description}
pub const ANALYZE_JOB_REQUIREMENTS_TEMPLATE: &str = r#"Analyze the following job description and extract key requirements.
{json_rules}
The JSON object MUST be wrapped in a 'job_requirements' key as shown below.

Job description:
{job_description}

Return format:
{
    "job_requirements": {
        "required_skills": [],
        "preferred_skills": [],
        "responsibilities": [],
        "qualifications": []
    }
}"#;

/// Replace: {json_rules}, {resume_text}, {job_description}
pub const GENERATE_TAILORED_BULLETS_TEMPLATE: &str = r#"Generate tailored bullet points for the resume based on the job description.
Use ATS-friendly wording: mirror the job description's keywords where the resume supports them. Do NOT invent experience.
{json_rules}
The JSON object MUST be wrapped in a 'tailored_bullets' key as shown below.

Resume text:
{resume_text}

Job description:
{job_description}

Return format:
{
    "tailored_bullets": [
        "Bullet point 1",
        "Bullet point 2"
    ]
}"#;

/// Replace: {json_rules}, {resume_text}, {job_description}
pub const CALCULATE_FIT_SCORE_TEMPLATE: &str = r#"Calculate a fit score between the resume and job description.
Scores are integers from 0 to 100.
{json_rules}
The JSON object MUST be wrapped in a 'fit_analysis' key as shown below.

Resume text:
{resume_text}

Job description:
{job_description}

Return format:
{
    "fit_analysis": {
        "overall_score": 0,
        "skills_match": 0,
        "experience_match": 0,
        "missing_requirements": [],
        "strengths": [],
        "areas_for_improvement": []
    }
}"#;

/// Replace: {json_rules}, {analysis_results}, {job_description}
pub const REFINE_ANALYSIS_TEMPLATE: &str = r#"Refine the following resume analysis results to better match the job description.
{json_rules}
The JSON object MUST contain all of the top-level keys shown below.

Analysis results:
{analysis_results}

Job description:
{job_description}

Return format:
{
    "skills_analysis": {
        "technical_skills": [],
        "soft_skills": [],
        "tools_and_technologies": []
    },
    "experience_analysis": [
        {
            "company": "",
            "title": "",
            "dates": "",
            "responsibilities": []
        }
    ],
    "job_requirements": {
        "required_skills": [],
        "preferred_skills": [],
        "responsibilities": [],
        "qualifications": []
    },
    "tailored_bullets": [],
    "fit_analysis": {
        "overall_score": 0,
        "skills_match": 0,
        "experience_match": 0,
        "missing_requirements": [],
        "strengths": [],
        "areas_for_improvement": []
    }
}"#;

/// Replace: {json_rules}, {resume_text}, {job_description}
pub const GENERATE_COVER_LETTER_TEMPLATE: &str = r#"Generate a professional cover letter based on the resume and job description.
The cover letter should be personalized, highlight relevant experience, and demonstrate enthusiasm for the position.
{json_rules}

Resume text:
{resume_text}

Job description:
{job_description}

Return format:
{
    "cover_letter": "Full cover letter text",
    "key_points": [
        "Key point 1",
        "Key point 2"
    ],
    "tone": "Professional and enthusiastic",
    "length": "Number of words"
}"#;

/// Replace: {json_rules}, {cover_letter}, {job_description}
pub const OPTIMIZE_COVER_LETTER_TEMPLATE: &str = r#"Optimize the following cover letter for ATS systems and readability.
Ensure it includes relevant keywords from the job description while maintaining a natural flow and professional tone.
{json_rules}

Cover letter:
{cover_letter}

Job description:
{job_description}

Return format:
{
    "optimized_letter": "Optimized cover letter text",
    "keywords_used": [
        "Keyword 1",
        "Keyword 2"
    ],
    "readability_score": "Score out of 100",
    "improvements_made": [
        "Improvement 1",
        "Improvement 2"
    ]
}"#;

/// Replace: {json_rules}, {cover_letter}, {job_description}
pub const REFINE_TONE_TEMPLATE: &str = r#"Refine the tone and style of the following cover letter to better match the company culture and job requirements.
Make it more engaging and professional while maintaining authenticity.
{json_rules}

Cover letter:
{cover_letter}

Job description:
{job_description}

Return format:
{
    "refined_letter": "Refined cover letter text",
    "tone_analysis": {
        "formality_level": "Formal/Semi-formal/Casual",
        "enthusiasm_level": "High/Medium/Low",
        "confidence_level": "High/Medium/Low"
    },
    "style_improvements": [
        "Improvement 1",
        "Improvement 2"
    ]
}"#;

/// Replace: {json_rules}, {cover_letter}, {resume_text}
pub const ENHANCE_IMPACT_TEMPLATE: &str = r#"Enhance the impact of key achievements and qualifications in the cover letter by making them more specific, measurable, and relevant to the position.
{json_rules}

Cover letter:
{cover_letter}

Resume:
{resume_text}

Return format:
{
    "enhanced_letter": "Enhanced cover letter text",
    "key_achievements": [
        {
            "achievement": "",
            "impact": "",
            "relevance": ""
        }
    ],
    "improvements_made": [
        "Improvement 1",
        "Improvement 2"
    ]
}"#;
