use std::fs;

use rl_batch::{
    BATCH_CSV_HEADER, BatchError, FileReport, NullSink, SUMMARY_FILE, SWEEP_CSV_FILE,
    SWEEP_CSV_HEADER, SimulationConfig, SimulationRunner, detail_file_name,
};

fn config_in(dir: &std::path::Path) -> SimulationConfig {
    SimulationConfig::default()
        .with_batches(2, 10)
        .with_seed(2024)
        .with_output_dir(dir)
}

#[test]
fn writes_summary_and_tables() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());

    let runner = SimulationRunner::new(config.clone()).unwrap();
    let mut sink = FileReport::create(&config).unwrap();
    let report = runner.run(&mut sink).unwrap();
    drop(sink);

    let summary = fs::read_to_string(tmp.path().join(SUMMARY_FILE)).unwrap();
    assert!(summary.starts_with("=== Simulation Parameters ===\nSimulations: 2\nOdds: 300\n"));
    assert!(summary.contains("\nSimulation start.\n\n=== Batch #1 Summary ===\n"));
    assert!(summary.contains("=== Batch #2 Summary ===\n"));
    assert!(summary.contains("\n=== Simulation Averages === \nAverage Won: "));

    let batches = fs::read_to_string(tmp.path().join("gambling_simulation_data.csv")).unwrap();
    let lines: Vec<&str> = batches.lines().collect();
    assert_eq!(lines[0], BATCH_CSV_HEADER);
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1,"));
    assert!(lines[2].starts_with("2,"));

    let sweep = fs::read_to_string(tmp.path().join(SWEEP_CSV_FILE)).unwrap();
    let averages = &report.odds[0].averages;
    assert_eq!(
        sweep,
        format!(
            "{}\n300,{},{},{}\n",
            SWEEP_CSV_HEADER, averages.average_won, averages.average_lost, averages.average_profit
        )
    );

    // Detail files only with verbose output
    assert!(!tmp.path().join(detail_file_name(1)).exists());
}

#[test]
fn summary_keeps_last_odds_value() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config_in(tmp.path()).with_batches(1, 5);
    config.odds_sweep.start = 200;
    config.odds_sweep.end = 220;
    config.odds_sweep.step = 10;

    let runner = SimulationRunner::new(config.clone()).unwrap();
    let mut sink = FileReport::create(&config).unwrap();
    runner.run(&mut sink).unwrap();
    drop(sink);

    let summary = fs::read_to_string(tmp.path().join(SUMMARY_FILE)).unwrap();
    assert!(summary.contains("Odds: 220\n"));
    assert!(!summary.contains("Odds: 200\n"));

    let sweep = fs::read_to_string(tmp.path().join(SWEEP_CSV_FILE)).unwrap();
    let odds: Vec<&str> = sweep
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .collect();
    assert_eq!(odds, vec!["200", "210", "220"]);
}

#[test]
fn verbose_detail_logs_every_try() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path()).with_verbose_detail(true);

    let runner = SimulationRunner::new(config.clone()).unwrap();
    let mut sink = FileReport::create(&config).unwrap();
    let report = runner.run(&mut sink).unwrap();
    drop(sink);

    for stats in &report.odds[0].batches {
        let detail = fs::read_to_string(tmp.path().join(detail_file_name(stats.batch))).unwrap();

        let headers = detail
            .matches("Spin,Total Invested,Total Won,Profit/Loss\n")
            .count();
        assert_eq!(headers as u32, stats.tries);
        assert_eq!(detail.matches("Simulated time used: ").count() as u32, stats.tries);
        assert_eq!(detail.matches("MAX PROFIT: ").count() as u32, stats.tries);

        let winners = detail.matches("THIS IS A PROFIT TARGET WINNER").count()
            + detail.matches("TIME LIMIT POSITIVE SESSION").count();
        assert_eq!(winners as u32, stats.winning_tries);

        let rush_dumps = detail.matches("=== Bell Values From Rush ===").count();
        assert_eq!(rush_dumps as u64, stats.total_rushes);
    }
}

#[test]
fn verbose_and_quiet_runs_agree() {
    let tmp = tempfile::tempdir().unwrap();
    let quiet = config_in(tmp.path());
    let verbose = quiet.clone().with_verbose_detail(true);

    let plain = SimulationRunner::new(quiet).unwrap().run(&mut NullSink).unwrap();

    let mut sink = FileReport::create(&verbose).unwrap();
    let logged = SimulationRunner::new(verbose.clone()).unwrap().run(&mut sink).unwrap();

    assert_eq!(plain, logged);
}

#[test]
fn unwritable_output_dir_is_an_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();

    let config = config_in(&blocker.join("out"));
    let err = FileReport::create(&config).err().unwrap();
    assert!(matches!(err, BatchError::Io(_)));
}

#[test]
fn config_file_formats() {
    let tmp = tempfile::tempdir().unwrap();

    let yaml = tmp.path().join("sim.yaml");
    fs::write(&yaml, "batches: 4\nseed: 11\nodds_sweep:\n  start: 250\n  end: 250\n").unwrap();
    let config = SimulationConfig::from_file(&yaml).unwrap();
    assert_eq!(config.batches, 4);
    assert_eq!(config.seed, Some(11));
    assert_eq!(config.odds_sweep.values(), vec![250]);

    let json = tmp.path().join("sim.json");
    fs::write(&json, r#"{ "tries_per_batch": 7, "currency": "EUR" }"#).unwrap();
    let config = SimulationConfig::from_file(&json).unwrap();
    assert_eq!(config.tries_per_batch, 7);
    assert_eq!(config.currency, "EUR");

    let missing = SimulationConfig::from_file(tmp.path().join("missing.yaml"));
    assert!(matches!(missing, Err(BatchError::Read { .. })));
}
