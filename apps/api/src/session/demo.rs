// Sample inputs for trying the pipeline without an upload.

use crate::extraction::ExtractionOutcome;
use crate::models::resume::{FileStats, ResumeDocument};

pub const DEMO_FILE_NAME: &str = "demo_resume.txt";

pub const DEMO_JOB_DESCRIPTION: &str = "Python Developer

Requirements:
- 3+ years Python experience
- Django/Flask framework knowledge
- REST API development
- SQL databases (PostgreSQL/MySQL)
- Git version control
- AWS/Azure cloud experience
- Docker containerization
- Unit testing (pytest)
- Agile/Scrum methodology
- Problem-solving skills

Responsibilities:
- Develop scalable web applications
- Write clean, maintainable code
- Collaborate with cross-functional teams
- Participate in code reviews
- Debug and optimize performance";

pub const DEMO_RESUME: &str = "John Doe
Senior Python Developer
john.doe@email.com | (123) 456-7890 | linkedin.com/in/johndoe

SUMMARY
5+ years experience in Python development with expertise in Django, Flask, and cloud technologies. Proven track record of delivering scalable web applications.

EXPERIENCE
Senior Python Developer | Tech Solutions Inc. | 2020-Present
- Developed REST APIs using Django REST Framework serving 10,000+ requests/day
- Implemented microservices architecture reducing latency by 40%
- Led migration from monolithic to microservices architecture
- Mentored 3 junior developers

Python Developer | Startup XYZ | 2018-2020
- Built full-stack web applications using Flask and React
- Implemented CI/CD pipeline reducing deployment time by 60%
- Developed automated testing suite with 95% code coverage

SKILLS
Programming: Python, JavaScript, SQL
Frameworks: Django, Flask, React
Databases: PostgreSQL, MySQL, MongoDB
Cloud: AWS (EC2, S3, Lambda), Docker, Kubernetes
Tools: Git, Jenkins, JIRA, pytest

EDUCATION
BS Computer Science | University of Technology | 2014-2018";

/// The demo resume as if it had been uploaded and extracted.
pub fn demo_resume() -> ResumeDocument {
    ResumeDocument {
        stats: FileStats {
            file_name: DEMO_FILE_NAME.to_string(),
            size_mb: DEMO_RESUME.len() as f64 / (1024.0 * 1024.0),
            page_count: None,
        },
        extraction: ExtractionOutcome::Text(DEMO_RESUME.to_string()),
    }
}
