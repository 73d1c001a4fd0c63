//! # Folio CLI
//!
//! Usage:
//!   folio template.json --script steps.json -o edited.json
//!   cat template.json | folio --layout
//!   folio template.json --config builder.json --script steps.json
//!   folio --example > diploma.json
//!   folio --catalog

use std::env;
use std::fs;
use std::io::{self, Read};

use tracing_subscriber::EnvFilter;

use folio::script::Step;
use folio::store::JsonFile;
use folio::{BuilderConfig, BuilderError, StaticCatalog, TemplateEditor};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_template_json());
        return;
    }

    if args.iter().any(|a| a == "--catalog") {
        match serde_json::to_string_pretty(&StaticCatalog::certificate()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("✗ {}", BuilderError::from(e));
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), BuilderError> {
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])?
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    };

    let config = match flag_value(args, "--config") {
        Some(path) => BuilderConfig::load(path)?,
        None => BuilderConfig::default(),
    };

    let mut editor = TemplateEditor::with_config(folio::Template::new("", ""), &config);
    editor.hydrate_json(&input)?;

    if let Some(path) = flag_value(args, "--script") {
        let steps = Step::parse_all(&fs::read_to_string(path)?)?;
        let summary = editor.run(&steps, &StaticCatalog::certificate())?;
        eprintln!(
            "✓ Ran {} steps ({} executed, {} undone, {} redone, {} skipped)",
            steps.len(),
            summary.executed,
            summary.undone,
            summary.redone,
            summary.skipped
        );
    }

    if args.iter().any(|a| a == "--layout") {
        println!("{}", serde_json::to_string_pretty(editor.layout())?);
    }

    match flag_value(args, "-o") {
        Some(path) => {
            editor.save_to(&mut JsonFile::new(path))?;
            eprintln!(
                "✓ Written {} fields to {}",
                editor.template().field_count(),
                path
            );
        }
        None if !args.iter().any(|a| a == "--layout") => {
            println!("{}", editor.template().to_json_pretty()?);
        }
        None => {}
    }

    for entry in editor.activity().entries() {
        eprintln!("  {:<10} {}", entry.action.display().label, entry.message);
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn example_template_json() -> &'static str {
    r##"{
  "id": "course-completion",
  "name": "Course completion certificate",
  "dataSourceId": "enrollments",
  "sections": {
    "header": [
      {
        "id": "logo",
        "fieldType": "image",
        "label": "Institution logo",
        "dataBindingKey": "institution.logo",
        "width": 0.25,
        "style": { "align": "left" },
        "position": 0
      },
      {
        "id": "institution",
        "fieldType": "text",
        "label": "Institution name",
        "dataBindingKey": "institution.name",
        "width": 0.75,
        "style": { "fontSize": 18, "fontWeight": 700 },
        "position": 1
      }
    ],
    "body": [
      {
        "id": "student",
        "fieldType": "text",
        "label": "Student name",
        "dataBindingKey": "student.fullName",
        "width": 1.0,
        "style": { "fontSize": 28, "align": "center" },
        "position": 0
      },
      {
        "id": "course",
        "fieldType": "text",
        "label": "Course",
        "dataBindingKey": "course.name",
        "width": 0.5,
        "position": 1
      },
      {
        "id": "period",
        "fieldType": "text",
        "label": "Period",
        "dataBindingKey": "period.name",
        "width": 0.5,
        "position": 2
      },
      {
        "id": "grade",
        "fieldType": "number",
        "label": "Final grade",
        "dataBindingKey": "student.grade",
        "width": 0.25,
        "config": { "decimals": 1 },
        "position": 3
      }
    ],
    "signature_area": [
      {
        "id": "director",
        "fieldType": "signature",
        "label": "Director signature",
        "dataBindingKey": "signatures.director",
        "width": 0.5,
        "style": { "align": "center" },
        "position": 0
      },
      {
        "id": "coordinator",
        "fieldType": "signature",
        "label": "Coordinator signature",
        "dataBindingKey": "signatures.coordinator",
        "width": 0.5,
        "style": { "align": "center" },
        "position": 1
      }
    ],
    "footer": [
      {
        "id": "issued",
        "fieldType": "date",
        "label": "Issue date",
        "dataBindingKey": "certificate.issuedAt",
        "width": 0.5,
        "config": { "format": "dd/MM/yyyy" },
        "position": 0
      },
      {
        "id": "verify",
        "fieldType": "qr",
        "label": "Verification code",
        "dataBindingKey": "certificate.verifyUrl",
        "width": 0.25,
        "position": 1
      },
      {
        "id": "page",
        "fieldType": "text",
        "label": "Page number",
        "dataBindingKey": "page.number",
        "width": 0.25,
        "style": { "fontSize": 8 },
        "position": 2
      }
    ]
  }
}
"##
}
