use divan::black_box;
use matter_ids_data_model::idl::Idl;
use miette::GraphicalReportHandler;

fn main() {
    // Run registered benchmarks.
    divan::main();
}

// Benchmark parsing the bundled standard clusters
#[divan::bench]
fn parse_standard_clusters() {
    if let Err(e) = Idl::parse(black_box(
        include_str!("../../matter-ids/idl/clusters.matter").into(),
    )) {
        let mut buf = String::new();
        GraphicalReportHandler::new()
            .render_report(&mut buf, &e)
            .unwrap();
        eprintln!("\n{}", buf);
    }
}

#[divan::bench]
fn validate_standard_clusters(bencher: divan::Bencher) {
    let idl = Idl::parse(include_str!("../../matter-ids/idl/clusters.matter").into())
        .expect("bundled IDL parses");

    bencher.bench(|| black_box(&idl).validate().is_ok());
}
