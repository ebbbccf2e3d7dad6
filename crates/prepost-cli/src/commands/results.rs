//! The `prepost results` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Table};

use prepost_core::gateway::StoreGateway;
use prepost_core::model::ExamRecord;
use prepost_core::repository::RecordRepository;
use prepost_core::session::degrade_to_empty;
use prepost_core::stats::summarize;
use prepost_store::config::load_config_from;
use prepost_store::create_store;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let store = create_store(&config.store)?;
    let gateway = StoreGateway::new(Arc::from(store), &config.worksheet);
    let repository = RecordRepository::new(gateway);

    // A pure listing degrades to an empty dataset when the store is down;
    // blocking here would strand the operator for no benefit.
    let records = degrade_to_empty(repository.fetch_all().await);

    if records.is_empty() {
        println!("No records found.");
        return Ok(());
    }

    print_records(&records);

    let summary = summarize(&records);
    println!(
        "\n{} examinee(s), {} completed the post-test.",
        summary.examinees, summary.completed_posttest
    );
    println!(
        "Mean pre-test {:.1}, mean post-test {:.1}, mean gain {:+.1}.",
        summary.mean_pretest, summary.mean_posttest, summary.mean_gain
    );

    Ok(())
}

fn print_records(records: &[ExamRecord]) {
    let mut table = Table::new();
    table.set_header(vec!["Name", "Pre-Test", "Post-Test", "Gain", "Taken At"]);

    for record in records {
        let (post, gain) = if record.posttest_score > 0 {
            (
                record.posttest_score.to_string(),
                format!(
                    "{:+}",
                    record.posttest_score as i64 - record.pretest_score as i64
                ),
            )
        } else {
            ("-".to_string(), "-".to_string())
        };

        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(record.pretest_score),
            Cell::new(post),
            Cell::new(gain),
            Cell::new(&record.timestamp),
        ]);
    }

    println!("{table}");
}
