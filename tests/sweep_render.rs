use nn_sweep::{
    default_registry, render, standard_entry, BenchConfig, BenchError, ChartOptions, Strategy,
    Sweep,
};

fn quick_config(output: std::path::PathBuf) -> BenchConfig {
    BenchConfig::builder()
        .sizes(vec![16, 64, 128])
        .repetitions(2)
        .naive_cutoff(Some(64))
        .output(output)
        .seed(2024)
        .chart_size(800, 600)
        .build()
        .unwrap()
}

#[test]
fn sweep_then_render_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("static").join("benchmarks.png");
    let cfg = quick_config(out.clone());
    let options = ChartOptions::from_config(&cfg);

    let registry = default_registry(&cfg);
    let report = Sweep::new(cfg, registry).run();

    assert_eq!(report.xs, vec![256, 4_096, 16_384]);
    assert!(report.failures().is_empty());
    assert_eq!(report.series("naive").unwrap().cells.len(), 2);
    for s in &report.series {
        if s.name != "naive" {
            assert_eq!(s.cells.len(), 3, "{}", s.name);
        }
    }

    render(&report, &out, &options).unwrap();

    let meta = std::fs::metadata(&out).unwrap();
    assert!(meta.len() > 0);
    let img = image::open(&out).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (800, 600));
}

#[test]
fn unwritable_destination_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is expected.
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let out = blocker.join("chart.png");

    let cfg = quick_config(out.clone());
    let options = ChartOptions::from_config(&cfg);
    let registry = vec![standard_entry(Strategy::NativeTreeSerial, None)];
    let report = Sweep::new(cfg, registry).run();

    let err = render(&report, &out, &options).unwrap_err();
    assert!(matches!(err, BenchError::Io(_) | BenchError::Image(_)));
}
