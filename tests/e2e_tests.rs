//! End-to-end integration tests
//!
//! These tests validate the complete import pipeline through the CLI runner
//! using predefined CSV fixtures. Each fixture test:
//! 1. Copies input.csv from a fixture directory into a temporary directory
//! 2. Imports it into a fresh SQLite database
//! 3. Compares the written transactions (without generated ids) with expected.csv
//! 4. Checks that the input was removed
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path
//! - Whitespace padding
//! - Malformed rows
//! - Repeated, empty and differently-cased category names
//! - Header-only input
//!
//! The remaining tests cover re-imports, rows that fail the import, and two
//! imports racing on the same new categories.

#[cfg(test)]
mod tests {
    use clap::Parser;
    use ledger_import::cli::CliArgs;
    use ledger_import::gateway::{FsSource, SqliteStorage};
    use ledger_import::runner::run;
    use ledger_import::{Category, ImportCoordinator, ImportError, Transaction};
    use rstest::rstest;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn cli_args(input: &Path, database: &Path, extra: &[&str]) -> CliArgs {
        let mut args = vec![
            "ledger-import".to_string(),
            "--database".to_string(),
            database.to_str().unwrap().to_string(),
        ];
        args.extend(extra.iter().map(|a| a.to_string()));
        args.push(input.to_str().unwrap().to_string());
        CliArgs::try_parse_from(args).unwrap()
    }

    /// Drop the generated id columns so output can be compared with a fixture
    fn without_ids(output: &[u8]) -> String {
        let mut reader = csv::Reader::from_reader(output);
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["title", "type", "value", "category"])
            .unwrap();
        for record in reader.records() {
            let record = record.unwrap();
            writer
                .write_record([&record[1], &record[2], &record[3], &record[5]])
                .unwrap();
        }
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    fn stage_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn stored(database: &Path) -> (Vec<Category>, Vec<Transaction>) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let storage = SqliteStorage::open(database).unwrap();
            (
                storage.all_categories().await.unwrap(),
                storage.all_transactions().await.unwrap(),
            )
        })
    }

    /// Import a fixture's input.csv and compare with its expected.csv
    fn run_test_fixture(fixture_name: &str) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input = fs::read_to_string(format!("{}/input.csv", fixture_dir))
            .unwrap_or_else(|e| panic!("Failed to read input for {}: {}", fixture_name, e));
        let expected_output = fs::read_to_string(format!("{}/expected.csv", fixture_dir))
            .unwrap_or_else(|e| panic!("Failed to read expected for {}: {}", fixture_name, e));

        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input_path = stage_input(&dir, "input.csv", &input);
        let database = dir.path().join("ledger.db");

        let mut output = Vec::new();
        run(&cli_args(&input_path, &database, &[]), &mut output)
            .unwrap_or_else(|e| panic!("Failed to import {}: {}", fixture_name, e));

        let actual_output = without_ids(&output);
        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {}\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, actual_output, expected_output
        );
        assert!(!input_path.exists(), "input of {} was not removed", fixture_name);

        // every category title is created once and matches its transactions
        let (categories, transactions) = stored(&database);
        let mut titles: Vec<_> = categories.iter().map(|c| c.title.clone()).collect();
        titles.dedup();
        assert_eq!(titles.len(), categories.len());
        for transaction in &transactions {
            assert!(categories.contains(&transaction.category));
        }
    }

    #[rstest]
    #[case("happy_path")]
    #[case("whitespace_padding")]
    #[case("malformed_data")]
    #[case("duplicate_categories")]
    #[case("empty_category")]
    #[case("header_only")]
    #[case("case_sensitive_categories")]
    fn test_fixtures(#[case] fixture: &str) {
        run_test_fixture(fixture);
    }

    #[test]
    fn test_round_trip_creates_distinct_categories() {
        let dir = tempfile::tempdir().unwrap();
        let input = stage_input(
            &dir,
            "import.csv",
            "title,type,value,category\nSalary,income,1000,Job\nLunch,outcome,20,Food\n",
        );
        let database = dir.path().join("ledger.db");

        run(&cli_args(&input, &database, &[]), &mut Vec::new()).unwrap();

        let (categories, transactions) = stored(&database);
        let titles: Vec<_> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Food", "Job"]);
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].category.title, "Job");
        assert_eq!(transactions[1].category.title, "Food");
        assert_ne!(transactions[0].category.id, transactions[1].category.id);
    }

    #[test]
    fn test_second_import_reuses_existing_categories() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("ledger.db");
        let first = stage_input(
            &dir,
            "first.csv",
            "title,type,value,category\nSalary,income,1000,Job\nLunch,outcome,20,Food\n",
        );
        run(&cli_args(&first, &database, &[]), &mut Vec::new()).unwrap();
        let (before, _) = stored(&database);
        let food = before.iter().find(|c| c.title == "Food").unwrap().clone();

        let second = stage_input(
            &dir,
            "second.csv",
            "title,type,value,category\nDinner,outcome,35,Food\nBus,outcome,3,Transport\n",
        );
        run(&cli_args(&second, &database, &[]), &mut Vec::new()).unwrap();

        let (categories, transactions) = stored(&database);
        let titles: Vec<_> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Food", "Job", "Transport"]);
        assert_eq!(transactions.len(), 4);
        assert_eq!(transactions[2].category, food);
    }

    #[test]
    fn test_import_with_custom_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let input = stage_input(
            &dir,
            "import.csv",
            "title;type;value;category\nSalary;income;1000;Job\n",
        );
        let database = dir.path().join("ledger.db");

        let mut output = Vec::new();
        run(&cli_args(&input, &database, &["--delimiter", ";"]), &mut output).unwrap();

        assert_eq!(
            without_ids(&output),
            "title,type,value,category\nSalary,income,1000,Job\n"
        );
    }

    #[test]
    fn test_missing_input_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nonexistent.csv");
        let database = dir.path().join("ledger.db");

        let result = run(&cli_args(&input, &database, &[]), &mut Vec::new());

        assert!(matches!(result, Err(ImportError::SourceUnavailable { .. })));
        let (categories, transactions) = stored(&database);
        assert!(categories.is_empty());
        assert!(transactions.is_empty());
    }

    #[test]
    fn test_unreadable_row_keeps_input_and_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = stage_input(
            &dir,
            "import.csv",
            "title,type,value,category\nLunch,outcome,20,Food\nRefund,deposit,30,Shop\n",
        );
        let database = dir.path().join("ledger.db");

        let mut output = Vec::new();
        let result = run(&cli_args(&input, &database, &[]), &mut output);

        assert_eq!(
            result,
            Err(ImportError::InvalidRecord {
                line: 3,
                field: "type".to_string(),
                value: "deposit".to_string(),
            })
        );
        assert!(output.is_empty());
        assert!(input.exists());
        let (categories, transactions) = stored(&database);
        assert!(categories.is_empty());
        assert!(transactions.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_imports_create_each_category_once() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("ledger.db");
        let first = stage_input(
            &dir,
            "first.csv",
            "title,type,value,category\nLunch,outcome,20,Food\nRent,outcome,900,Home\n",
        );
        let second = stage_input(
            &dir,
            "second.csv",
            "title,type,value,category\nDinner,outcome,35,Food\nRepairs,outcome,80,Home\n",
        );

        // one connection per import, as two separate processes would have
        let first_import = ImportCoordinator::new(
            Arc::new(SqliteStorage::open(&database).unwrap()),
            Arc::new(FsSource),
        );
        let second_import = ImportCoordinator::new(
            Arc::new(SqliteStorage::open(&database).unwrap()),
            Arc::new(FsSource),
        );

        let (first_result, second_result) = tokio::join!(
            first_import.import_transactions(first.to_str().unwrap()),
            second_import.import_transactions(second.to_str().unwrap()),
        );
        let first_result = first_result.unwrap();
        let second_result = second_result.unwrap();

        assert_eq!(first_result[0].category, second_result[0].category);
        assert_eq!(first_result[1].category, second_result[1].category);
        assert!(!first.exists());
        assert!(!second.exists());

        let storage = SqliteStorage::open(&database).unwrap();
        let titles: Vec<_> = storage
            .all_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Food", "Home"]);
        assert_eq!(storage.all_transactions().await.unwrap().len(), 4);
    }
}
