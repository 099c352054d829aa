//! In-memory PDF builder for extraction tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Builds a PDF with one page per entry, drawing each line as its own text
/// object in Helvetica.
pub fn build_pdf(pages: &[Vec<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let y = 780 - (i as i64) * 14;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![40.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

/// Two pages of a plain-text resume, roughly 400 words.
pub fn jane_doe_pages() -> Vec<Vec<&'static str>> {
    let page_one = vec![
        "Jane Doe",
        "Python Developer",
        "jane.doe@example.com | (555) 010-2030 | github.com/janedoe",
        "SUMMARY",
        "Backend engineer with seven years of experience designing and shipping Python services.",
        "Comfortable owning features from design review through production monitoring.",
        "Strong background in REST API design, relational data modelling and test automation.",
        "EXPERIENCE",
        "Senior Python Developer, Northwind Analytics, 2021 to present",
        "Built a Django REST Framework platform serving two million requests per day.",
        "Cut p95 latency by forty percent by introducing Redis caching and query tuning.",
        "Led the migration of a monolith into six services deployed on Kubernetes.",
        "Mentored four engineers and ran the weekly backend architecture review.",
        "Python Developer, Contoso Labs, 2018 to 2021",
        "Developed Flask microservices for billing, invoicing and customer notifications.",
        "Introduced pytest based contract tests raising coverage from sixty to ninety percent.",
        "Automated deployments with GitHub Actions and Docker, reducing release time to minutes.",
    ];
    let page_two = vec![
        "SKILLS",
        "Languages: Python, SQL, Bash, a little Rust and TypeScript.",
        "Frameworks: Django, Django REST Framework, Flask, FastAPI, Celery.",
        "Data: PostgreSQL, MySQL, Redis, Elasticsearch, Kafka.",
        "Cloud and tooling: AWS EC2, S3, Lambda, Docker, Kubernetes, Terraform, Git.",
        "PROJECTS",
        "Open source maintainer of a small library for validating JSON API payloads.",
        "Speaker at the regional Python meetup on structured logging in production.",
        "EDUCATION",
        "BSc Computer Science, University of Springfield, 2014 to 2018",
        "Thesis on query planning for time series databases, graded with distinction.",
        "CERTIFICATIONS",
        "AWS Certified Developer Associate, Certified Kubernetes Application Developer.",
        "INTERESTS",
        "Trail running, community teaching, and contributing to documentation sprints.",
    ];
    vec![page_one, page_two]
}
