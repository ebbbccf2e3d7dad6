//! The `prepost init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create prepost.toml
    if std::path::Path::new("prepost.toml").exists() {
        println!("prepost.toml already exists, skipping.");
    } else {
        std::fs::write("prepost.toml", SAMPLE_CONFIG)?;
        println!("Created prepost.toml");
    }

    // Create example exam
    std::fs::create_dir_all("exams")?;
    let example_path = std::path::Path::new("exams/example.toml");
    if example_path.exists() {
        println!("exams/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_EXAM)?;
        println!("Created exams/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit prepost.toml if you want the sheets backend instead of a local file");
    println!("  2. Run: prepost validate --exam exams/example.toml");
    println!("  3. Run: prepost run --exam exams/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# prepost configuration

worksheet = "Data"
default_exam = "exams/example.toml"

# Local JSON-file store; swap for the sheets backend in production:
#
# [store]
# type = "sheets"
# api_key = "${PREPOST_SHEETS_KEY}"
# spreadsheet_id = "your-spreadsheet-id"

[store]
type = "file"
path = "./prepost-data"
"#;

const EXAMPLE_EXAM: &str = r#"[exam]
id = "example"
name = "Example Exam"
description = "A short example exam to get started"
material = """
Water boils at 100 degrees Celsius at sea level, and plants absorb
carbon dioxide during photosynthesis.
"""

[[questions]]
id = "q1"
text = "At what temperature does water boil at sea level?"
choices = ["A. 90 C", "B. 100 C", "C. 110 C", "D. 120 C"]
correct = "B"

[[questions]]
id = "q2"
text = "Which gas do plants absorb during photosynthesis?"
choices = ["A. Carbon dioxide", "B. Oxygen", "C. Nitrogen", "D. Helium"]
correct = "A"
"#;
