// Resume assistant prompt templates.

pub const ENHANCE_SYSTEM: &str = "\
You are an experienced resume editor. \
Reply with the rewritten description only, as plain text: \
no quotes, no headings, no bullet characters, no commentary.";

pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"Rewrite and enhance the following {section} description for a resume, making it more impactful, professional, and concise.
Focus on action verbs and quantifiable results where the text supports them.
{no_new_facts}
Keep the response as a single paragraph.

Original description: "{description}""#;

pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Parse the following resume text and structure it strictly according to this JSON format.

JSON STRUCTURE (field names and nesting must match exactly; the values are only an example):
{schema}

INSTRUCTIONS:
1. Extract name, degree, gender, date of birth, email and contact into "personalDetails".
2. Map every education row, internship, achievement, project, skill group, position of responsibility and extracurricular activity to its array.
3. Create as many array items as the text contains. Leave an array empty when the section is absent.
4. Preserve dates and descriptions as written. Use "\n" to separate distinct points inside one description.
5. Leave "photo" and "logo" as empty strings.
{no_new_facts}

RESUME TEXT:
{resume_text}"#;
