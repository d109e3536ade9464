use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use stacktop::output::{read_report, to_report, write_report};
use stacktop::render::BufferScreen;
use stacktop::sampler::ReplaySampler;
use stacktop::session::{Session, SessionConfig};
use tempfile::NamedTempFile;

#[test]
fn session_aggregation_survives_as_a_report() {
    let mut capture = NamedTempFile::new().unwrap();
    capture
        .write_all(
            concat!(
                "{\"frames\":[{\"function\":1,\"name\":\"main\",\"source\":\"a.php\",\"lineno\":10}]}\n",
                "{\"frames\":[{\"function\":1,\"name\":\"main\",\"source\":\"a.php\",\"lineno\":12}]}\n",
                "{\"frames\":[{\"function\":2,\"name\":\"strlen\"}]}\n",
            )
            .as_bytes(),
        )
        .unwrap();
    capture.flush().unwrap();

    let mut sampler = ReplaySampler::new(capture.path());
    let config = SessionConfig {
        frequency_hz: 100_000,
        ..SessionConfig::default()
    };
    let mut session = Session::new(config, BufferScreen::new());
    let interrupt = Arc::new(AtomicBool::new(false));

    let summary = session.run(&mut sampler, &interrupt).unwrap();
    let table = session.into_table();

    let report = to_report(&table, "a.php capture", summary.samples);
    assert_eq!(report.total_samples, 3);
    assert_eq!(report.total_hits, 3);

    let out = NamedTempFile::new().unwrap();
    write_report(&report, out.path()).unwrap();
    let loaded = read_report(out.path()).unwrap();

    assert_eq!(loaded.target, "a.php capture");
    assert_eq!(loaded.functions.len(), 2);
    assert_eq!(loaded.functions[0].name, "main");
    assert_eq!(loaded.functions[0].hits, 2);
    assert_eq!(loaded.functions[0].lines.len(), 2);
    assert_eq!(loaded.functions[1].name, "strlen");
    assert!(loaded.functions[1].source.is_none());
    assert!(loaded.functions[1].lines.is_empty());
}
